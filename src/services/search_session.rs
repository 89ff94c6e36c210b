use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::filters::SearchQuery;
use crate::models::party::RoomOccupancy;
use crate::models::search::{HotelSearchRequest, SearchContext, SearchPage, SearchResultSet};
use crate::services::provider_client::{HotelProviderApi, ProviderAuth, ProviderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Fetching,
    Ready,
    Exhausted,
    Errored,
}

#[derive(Debug)]
pub enum SessionError {
    /// No continuation token is held, or the provider already reported the
    /// last page. Callers recover by starting a new search.
    NoContinuationToken,
    /// A request is already in flight for this session.
    Busy,
    /// The fetch was cancelled (or the session restarted) while in flight;
    /// the late response was discarded.
    Cancelled,
    Provider(ProviderError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoContinuationToken => {
                write!(f, "no further pages available; start a new search")
            }
            SessionError::Busy => write!(f, "a search request is already in flight"),
            SessionError::Cancelled => write!(f, "the search was cancelled"),
            SessionError::Provider(err) => write!(f, "{}", err),
        }
    }
}

impl Error for SessionError {}

#[derive(Clone)]
struct SessionParams {
    context: SearchContext,
    occupancies: Vec<RoomOccupancy>,
    query: SearchQuery,
}

struct SessionInner {
    state: SessionState,
    /// Bumped on cancel and on every (re)start. A fetch only applies its
    /// response if the generation it captured is still current, so a late
    /// response for a retired fetch can never corrupt a newer one.
    generation: u64,
    trace_id: Option<String>,
    page_number: u32,
    has_next: bool,
    params: Option<SessionParams>,
}

/// One logical provider search: page-1 request, continuation-token capture,
/// token-reusing page-N requests, cancellation. The continuation token is
/// the provider `traceId` and is scoped to the context+query captured at
/// `start`; changing either requires a new `start`.
pub struct SearchSession<P> {
    provider: Arc<P>,
    inner: Mutex<SessionInner>,
}

impl<P: HotelProviderApi> SearchSession<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            inner: Mutex::new(SessionInner {
                state: SessionState::Idle,
                generation: 0,
                trace_id: None,
                page_number: 0,
                has_next: false,
                params: None,
            }),
        }
    }

    fn locked(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn state(&self) -> SessionState {
        self.locked().state
    }

    pub fn context(&self) -> Option<SearchContext> {
        self.locked().params.as_ref().map(|p| p.context.clone())
    }

    pub fn trace_id(&self) -> Option<String> {
        self.locked().trace_id.clone()
    }

    /// Fetch page 1, discarding any previously held continuation token and
    /// capturing the query for the rest of the session.
    pub async fn start(
        &self,
        auth: &ProviderAuth,
        context: SearchContext,
        occupancies: Vec<RoomOccupancy>,
        query: SearchQuery,
    ) -> Result<SearchPage, SessionError> {
        let generation;
        {
            let mut inner = self.locked();
            if inner.state == SessionState::Fetching {
                return Err(SessionError::Busy);
            }
            inner.generation += 1;
            generation = inner.generation;
            inner.trace_id = None;
            inner.page_number = 0;
            inner.has_next = false;
            inner.params = Some(SessionParams {
                context: context.clone(),
                occupancies: occupancies.clone(),
                query: query.clone(),
            });
            inner.state = SessionState::Fetching;
        }

        let request = HotelSearchRequest {
            occupancies,
            page: 1,
            nationality: context.nationality.clone(),
            trace_id: None,
            filter_by: query.filter_by,
            sort_by: query.sort_by,
        };
        let result = self.provider.search_hotels(auth, &context, &request).await;
        self.finish_fetch(generation, 1, result)
    }

    /// Fetch the next page, reusing the held continuation token and the
    /// page-1 occupancies/filter/sort verbatim.
    pub async fn next_page(&self, auth: &ProviderAuth) -> Result<SearchPage, SessionError> {
        let generation;
        let page;
        let trace_id;
        let params;
        {
            let mut inner = self.locked();
            if inner.state == SessionState::Fetching {
                return Err(SessionError::Busy);
            }
            trace_id = match inner.trace_id.clone() {
                Some(token) => token,
                None => return Err(SessionError::NoContinuationToken),
            };
            if !inner.has_next {
                return Err(SessionError::NoContinuationToken);
            }
            params = match inner.params.clone() {
                Some(params) => params,
                None => return Err(SessionError::NoContinuationToken),
            };
            generation = inner.generation;
            page = inner.page_number + 1;
            inner.state = SessionState::Fetching;
        }

        let request = HotelSearchRequest {
            occupancies: params.occupancies.clone(),
            page,
            nationality: params.context.nationality.clone(),
            trace_id: Some(trace_id),
            filter_by: params.query.filter_by.clone(),
            sort_by: params.query.sort_by.clone(),
        };
        let result = self.provider.search_hotels(auth, &params.context, &request).await;
        self.finish_fetch(generation, page, result)
    }

    /// Retire any in-flight fetch. Its response, if it still arrives, is
    /// discarded by the generation check. The held continuation token is
    /// left alone; `start` is what discards it.
    pub fn cancel(&self) {
        let mut inner = self.locked();
        inner.generation += 1;
        if inner.state == SessionState::Fetching {
            inner.state = SessionState::Idle;
        }
    }

    fn finish_fetch(
        &self,
        generation: u64,
        page: u32,
        result: Result<SearchResultSet, ProviderError>,
    ) -> Result<SearchPage, SessionError> {
        let mut inner = self.locked();
        if inner.generation != generation {
            log::info!("discarding stale search response for page {}", page);
            return Err(SessionError::Cancelled);
        }

        match result {
            Ok(result_set) => {
                if let Some(trace_id) = result_set.trace_id.clone() {
                    inner.trace_id = Some(trace_id);
                }
                inner.page_number = result_set.current_page.unwrap_or(page);
                inner.has_next = result_set.next_page.map(|next| next > 0).unwrap_or(false);
                inner.state = if inner.has_next {
                    SessionState::Ready
                } else {
                    SessionState::Exhausted
                };

                let hotel_count = result_set.data.len() as u64;
                Ok(SearchPage {
                    hotels: result_set.data,
                    continuation_token: inner.trace_id.clone(),
                    page_number: inner.page_number,
                    has_next_page: inner.has_next,
                    total_count: result_set.total_count.unwrap_or(hotel_count),
                    filtered_count: result_set.filtered_count.unwrap_or(hotel_count),
                })
            }
            Err(err) => {
                // Retryable: the held token survives a failed fetch.
                inner.state = SessionState::Errored;
                Err(SessionError::Provider(err))
            }
        }
    }
}
