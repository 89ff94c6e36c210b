use std::error::Error;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::models::rates::RoomRateAllocation;
use crate::models::selection::{
    CommitKind, CommitResult, ItineraryContext, ItineraryHotelRequest, NewHotelDetails,
    ProviderSelection, SelectRoomRequest,
};
use crate::services::provider_client::{HotelProviderApi, ProviderAuth, ProviderError};
use crate::services::rate_catalog::RateCatalog;
use crate::services::recommendation_service::{self, ResolveError};

#[derive(Debug)]
pub enum CommitError {
    /// `replace` needs the code of the hotel being swapped out.
    MissingReplacementTarget,
    /// Neither `date` nor `check_in` was supplied for the itinerary entry.
    MissingStayDate,
    Resolve(ResolveError),
    /// The provider no longer offers the selected rate; the user has to pick
    /// another recommendation, retrying the same allocation will not help.
    RateUnavailable { message: String },
    /// The provider rejected the room selection outright.
    Selection { message: String },
    /// The hotel was selected but the itinerary write was refused.
    ItineraryUpdate { message: String },
    Provider(ProviderError),
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitError::MissingReplacementTarget => {
                write!(f, "replacing a hotel requires the code of the hotel being replaced")
            }
            CommitError::MissingStayDate => {
                write!(f, "an itinerary date (or check-in) is required to commit a hotel")
            }
            CommitError::Resolve(err) => write!(f, "{}", err),
            CommitError::RateUnavailable { message } => write!(
                f,
                "the selected rate is no longer available, choose another room option: {}",
                message
            ),
            CommitError::Selection { message } => {
                write!(f, "room selection was rejected: {}", message)
            }
            CommitError::ItineraryUpdate { message } => {
                write!(f, "itinerary update failed: {}", message)
            }
            CommitError::Provider(err) => write!(f, "{}", err),
        }
    }
}

impl Error for CommitError {}

impl From<ResolveError> for CommitError {
    fn from(err: ResolveError) -> Self {
        CommitError::Resolve(err)
    }
}

/// Runs the two-step commit: provider room selection, then the itinerary
/// add/replace write. A failure in either step leaves the itinerary
/// untouched; only the explicit partial-success case is surfaced as a
/// success with a warning.
pub struct SelectionCommitter<P> {
    provider: Arc<P>,
}

impl<P: HotelProviderApi> SelectionCommitter<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Resolve, select, and commit a recommendation in one call. Inputs are
    /// validated before the first network call goes out.
    pub async fn execute(
        &self,
        auth: &ProviderAuth,
        kind: CommitKind,
        recommendation_id: &str,
        hotel_id: &str,
        catalog: &RateCatalog,
        itinerary: &ItineraryContext,
    ) -> Result<CommitResult, CommitError> {
        Self::validate(kind, itinerary)?;

        let allocation = recommendation_service::resolve(recommendation_id, catalog)?;
        let selection = self
            .select_room(auth, hotel_id, allocation.clone(), recommendation_id, catalog, itinerary)
            .await?;
        self.commit(auth, kind, &selection, &allocation, catalog, itinerary).await
    }

    pub async fn select_room(
        &self,
        auth: &ProviderAuth,
        hotel_id: &str,
        allocation: Vec<RoomRateAllocation>,
        recommendation_id: &str,
        catalog: &RateCatalog,
        itinerary: &ItineraryContext,
    ) -> Result<ProviderSelection, CommitError> {
        let date = itinerary.stay_date().ok_or(CommitError::MissingStayDate)?;

        let request = SelectRoomRequest {
            rooms_and_rate_allocations: allocation,
            recommendation_id: recommendation_id.to_string(),
            items: catalog.context.items.clone(),
            itinerary_code: catalog.context.itinerary_code.clone(),
            trace_id: catalog.context.trace_id.clone(),
            inquiry_token: auth.inquiry_token.clone(),
            city_name: itinerary.city_name.clone(),
            date: date.to_string(),
        };

        match self.provider.select_room(auth, hotel_id, &request).await {
            Ok(Some(selection)) => Ok(selection),
            Ok(None) => Err(CommitError::RateUnavailable {
                message: "provider returned no selection data".to_string(),
            }),
            Err(ProviderError::Api { status, message }) if status == 409 || status == 410 => {
                Err(CommitError::RateUnavailable { message })
            }
            Err(ProviderError::Api { status, message }) => Err(CommitError::Selection {
                message: format!("status {}: {}", status, message),
            }),
            Err(err) => Err(CommitError::Provider(err)),
        }
    }

    /// Write the selected hotel into the itinerary. Fields the provider's
    /// selection response omitted are reconciled from the catalog context,
    /// then from a synthetic placeholder, with every fallback tier logged.
    pub async fn commit(
        &self,
        auth: &ProviderAuth,
        kind: CommitKind,
        selection: &ProviderSelection,
        sent_allocation: &[RoomRateAllocation],
        catalog: &RateCatalog,
        itinerary: &ItineraryContext,
    ) -> Result<CommitResult, CommitError> {
        Self::validate(kind, itinerary)?;
        let date = itinerary.stay_date().ok_or(CommitError::MissingStayDate)?;

        let new_hotel_details = Self::reconcile(selection, sent_allocation, catalog);
        let hotel_name = new_hotel_details.hotel_name.clone();
        let final_allocation = new_hotel_details.rooms_and_rate_allocations.clone();

        let request = ItineraryHotelRequest {
            city_name: itinerary.city_name.clone(),
            date: date.to_string(),
            check_in: itinerary.check_in.map(|d| d.to_string()),
            check_out: itinerary.check_out.map(|d| d.to_string()),
            new_hotel_details,
            old_hotel_code: match kind {
                CommitKind::Replace => itinerary.old_hotel_code.clone(),
                CommitKind::Add => None,
            },
        };

        let response = self
            .provider
            .upsert_itinerary_hotel(
                auth,
                &itinerary.itinerary_token,
                kind == CommitKind::Replace,
                &request,
            )
            .await
            .map_err(CommitError::Provider)?;

        if !response.success {
            return Err(CommitError::ItineraryUpdate {
                message: response
                    .message
                    .unwrap_or_else(|| "provider reported failure".to_string()),
            });
        }

        let warning = if response.partial_success {
            let message = response.message.unwrap_or_else(|| {
                "the hotel was added but a dependent itinerary update failed".to_string()
            });
            log::warn!("partial commit success: {}", message);
            Some(message)
        } else {
            None
        };

        Ok(CommitResult { hotel_name, final_allocation, committed: true, warning })
    }

    fn validate(kind: CommitKind, itinerary: &ItineraryContext) -> Result<(), CommitError> {
        if kind == CommitKind::Replace
            && itinerary.old_hotel_code.as_deref().map_or(true, |code| code.trim().is_empty())
        {
            return Err(CommitError::MissingReplacementTarget);
        }
        Ok(())
    }

    fn reconcile(
        selection: &ProviderSelection,
        sent_allocation: &[RoomRateAllocation],
        catalog: &RateCatalog,
    ) -> NewHotelDetails {
        let context = &catalog.context;

        let items = match &selection.items {
            Some(items) if !items.is_empty() => items.clone(),
            _ => match &context.items {
                Some(items) => {
                    log::warn!("selection response omitted items, using catalog items");
                    items.clone()
                }
                None => {
                    log::warn!("no items from selection or catalog, sending empty placeholder");
                    Vec::new()
                }
            },
        };

        let itinerary_code = match (&selection.itinerary_code, &context.itinerary_code) {
            (Some(code), _) => code.clone(),
            (None, Some(code)) => {
                log::warn!("selection response omitted itinerary code, using catalog value");
                code.clone()
            }
            (None, None) => {
                let placeholder = format!("pending-{}", Uuid::new_v4());
                log::warn!(
                    "no itinerary code from selection or catalog, using placeholder {}",
                    placeholder
                );
                placeholder
            }
        };

        let hotel_name = match (&selection.hotel_name, &context.hotel_name) {
            (Some(name), _) => name.clone(),
            (None, Some(name)) => {
                log::warn!("selection response omitted hotel name, using catalog value");
                name.clone()
            }
            (None, None) => {
                log::warn!("no hotel name from selection or catalog, using placeholder");
                "Selected hotel".to_string()
            }
        };

        let hotel_code = match (&selection.hotel_code, &context.hotel_id) {
            (Some(code), _) => code.clone(),
            (None, Some(code)) => {
                log::warn!("selection response omitted hotel code, using catalog value");
                code.clone()
            }
            (None, None) => {
                log::warn!("no hotel code from selection or catalog, using placeholder");
                String::new()
            }
        };

        let rooms_and_rate_allocations = match &selection.rooms_and_rate_allocations {
            Some(allocations) if !allocations.is_empty() => allocations.clone(),
            _ => sent_allocation.to_vec(),
        };

        NewHotelDetails {
            hotel_code,
            hotel_name,
            itinerary_code,
            items,
            rooms_and_rate_allocations,
            trace_id: selection.trace_id.clone().or_else(|| context.trace_id.clone()),
        }
    }
}
