use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::ProviderConfig;
use crate::models::rates::{HotelDetailsEnvelope, RawHotelDetails};
use crate::models::search::{HotelSearchRequest, SearchContext, SearchResultSet, SearchResultsEnvelope};
use crate::models::selection::{
    ItineraryHotelRequest, ItineraryUpdateResponse, ProviderSelection, SelectRoomEnvelope,
    SelectRoomRequest,
};

/// Caller-supplied credentials, forwarded to the provider unchanged on every
/// call. Their semantics belong to the auth layer, not to this service.
#[derive(Debug, Clone)]
pub struct ProviderAuth {
    pub bearer_token: String,
    pub inquiry_token: String,
}

#[derive(Debug)]
pub enum ProviderError {
    Unreachable(reqwest::Error),
    Api { status: u16, message: String },
    Parse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Unreachable(err) => {
                write!(f, "booking provider unreachable, retry may succeed: {}", err)
            }
            ProviderError::Api { status, message } => {
                write!(f, "booking provider returned {}: {}", status, message)
            }
            ProviderError::Parse(msg) => {
                write!(f, "could not parse booking provider response: {}", msg)
            }
        }
    }
}

impl Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Unreachable(err)
    }
}

/// The booking-provider HTTP contract this engine consumes. Implemented by
/// the reqwest client below and by scripted mocks in tests.
pub trait HotelProviderApi {
    async fn search_hotels(
        &self,
        auth: &ProviderAuth,
        context: &SearchContext,
        request: &HotelSearchRequest,
    ) -> Result<SearchResultSet, ProviderError>;

    async fn fetch_hotel_details(
        &self,
        auth: &ProviderAuth,
        context: &SearchContext,
        hotel_id: &str,
        trace_id: Option<&str>,
    ) -> Result<RawHotelDetails, ProviderError>;

    async fn select_room(
        &self,
        auth: &ProviderAuth,
        hotel_id: &str,
        request: &SelectRoomRequest,
    ) -> Result<Option<ProviderSelection>, ProviderError>;

    async fn upsert_itinerary_hotel(
        &self,
        auth: &ProviderAuth,
        itinerary_token: &str,
        replace: bool,
        request: &ItineraryHotelRequest,
    ) -> Result<ItineraryUpdateResponse, ProviderError>;
}

#[derive(Clone)]
pub struct HotelProviderClient {
    client: Client,
    config: ProviderConfig,
}

impl HotelProviderClient {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|err| {
                log::warn!("falling back to default HTTP client: {}", err);
                Client::new()
            });

        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        auth: &ProviderAuth,
    ) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", auth.bearer_token))
            .header("X-Inquiry-Token", &auth.inquiry_token)
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown provider error".to_string());
            return Err(ProviderError::Api { status: status.as_u16(), message });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ProviderError::Parse(err.to_string()))
    }
}

impl HotelProviderApi for HotelProviderClient {
    async fn search_hotels(
        &self,
        auth: &ProviderAuth,
        context: &SearchContext,
        request: &HotelSearchRequest,
    ) -> Result<SearchResultSet, ProviderError> {
        let url = self.url(&format!(
            "/hotels/{}/{}/{}/{}",
            context.inquiry_token, context.city_name, context.check_in, context.check_out
        ));
        let correlation_id = Uuid::new_v4();
        log::info!("[{}] POST {} page {}", correlation_id, url, request.page);

        let response = self
            .authorize(self.client.post(&url), auth)
            .json(request)
            .send()
            .await?;
        let envelope: SearchResultsEnvelope = Self::read_json(response).await?;

        if !envelope.success {
            return Err(ProviderError::Api {
                status: 200,
                message: envelope
                    .message
                    .unwrap_or_else(|| "search request was not successful".to_string()),
            });
        }

        let result_set = envelope
            .data
            .map(|data| data.results)
            .unwrap_or_default()
            .into_iter()
            .next()
            .unwrap_or_default();
        log::info!(
            "[{}] page {} returned {} hotels",
            correlation_id,
            request.page,
            result_set.data.len()
        );
        Ok(result_set)
    }

    async fn fetch_hotel_details(
        &self,
        auth: &ProviderAuth,
        context: &SearchContext,
        hotel_id: &str,
        trace_id: Option<&str>,
    ) -> Result<RawHotelDetails, ProviderError> {
        let url = self.url(&format!("/hotels/{}/{}/details", context.inquiry_token, hotel_id));
        let correlation_id = Uuid::new_v4();
        log::info!("[{}] GET {}", correlation_id, url);

        let check_in = context.check_in.to_string();
        let mut request = self.client.get(&url).query(&[
            ("cityName", context.city_name.as_str()),
            ("checkIn", check_in.as_str()),
        ]);
        if let Some(trace_id) = trace_id {
            request = request.query(&[("traceId", trace_id)]);
        }

        let response = self.authorize(request, auth).send().await?;
        let envelope: HotelDetailsEnvelope = Self::read_json(response).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn select_room(
        &self,
        auth: &ProviderAuth,
        hotel_id: &str,
        request: &SelectRoomRequest,
    ) -> Result<Option<ProviderSelection>, ProviderError> {
        let url = self.url(&format!(
            "/hotels/{}/{}/select-room",
            request.inquiry_token, hotel_id
        ));
        let correlation_id = Uuid::new_v4();
        log::info!(
            "[{}] POST {} recommendation {}",
            correlation_id,
            url,
            request.recommendation_id
        );

        let response = self
            .authorize(self.client.post(&url), auth)
            .json(request)
            .send()
            .await?;
        let envelope: SelectRoomEnvelope = Self::read_json(response).await?;
        Ok(envelope.data)
    }

    async fn upsert_itinerary_hotel(
        &self,
        auth: &ProviderAuth,
        itinerary_token: &str,
        replace: bool,
        request: &ItineraryHotelRequest,
    ) -> Result<ItineraryUpdateResponse, ProviderError> {
        let url = self.url(&format!("/itinerary/{}/hotel", itinerary_token));
        let correlation_id = Uuid::new_v4();

        let builder = if replace {
            log::info!("[{}] PUT {}", correlation_id, url);
            self.client.put(&url)
        } else {
            log::info!("[{}] POST {}", correlation_id, url);
            self.client.post(&url)
        };

        let response = self.authorize(builder, auth).json(request).send().await?;
        Self::read_json(response).await
    }
}
