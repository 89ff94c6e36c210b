#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::NaiveDate;
use futures::channel::oneshot;
use serde_json::json;

use tripdesk_hotels_api::models::filters::{FilterState, SearchQuery, SortOrder};
use tripdesk_hotels_api::models::party::{PartyConfiguration, Room, RoomOccupancy};
use tripdesk_hotels_api::models::rates::RawHotelDetails;
use tripdesk_hotels_api::models::search::{
    HotelSearchRequest, HotelSummary, SearchContext, SearchResultSet,
};
use tripdesk_hotels_api::models::selection::{
    ItineraryContext, ItineraryHotelRequest, ItineraryUpdateResponse, ProviderSelection,
    SelectRoomRequest,
};
use tripdesk_hotels_api::services::filter_service;
use tripdesk_hotels_api::services::provider_client::{HotelProviderApi, ProviderAuth, ProviderError};

/// Scripted provider double: queued responses, recorded requests, and
/// optional gates that hold a search call in flight until released.
#[derive(Default)]
pub struct MockProvider {
    pub search_responses: Mutex<VecDeque<Result<SearchResultSet, ProviderError>>>,
    pub search_requests: Mutex<Vec<HotelSearchRequest>>,
    pub search_auths: Mutex<Vec<ProviderAuth>>,
    pub search_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    pub details_response: Mutex<Option<RawHotelDetails>>,
    pub select_responses: Mutex<VecDeque<Result<Option<ProviderSelection>, ProviderError>>>,
    pub select_requests: Mutex<Vec<SelectRoomRequest>>,
    pub itinerary_responses: Mutex<VecDeque<ItineraryUpdateResponse>>,
    pub itinerary_requests: Mutex<Vec<(String, bool, ItineraryHotelRequest)>>,
}

impl MockProvider {
    pub fn push_search(&self, result: Result<SearchResultSet, ProviderError>) {
        self.search_responses.lock().unwrap().push_back(result);
    }

    pub fn gate_next_search(&self, gate: oneshot::Receiver<()>) {
        self.search_gates.lock().unwrap().push_back(gate);
    }

    pub fn set_details(&self, raw: RawHotelDetails) {
        *self.details_response.lock().unwrap() = Some(raw);
    }

    pub fn push_select(&self, result: Result<Option<ProviderSelection>, ProviderError>) {
        self.select_responses.lock().unwrap().push_back(result);
    }

    pub fn push_itinerary(&self, response: ItineraryUpdateResponse) {
        self.itinerary_responses.lock().unwrap().push_back(response);
    }
}

impl HotelProviderApi for MockProvider {
    async fn search_hotels(
        &self,
        auth: &ProviderAuth,
        _context: &SearchContext,
        request: &HotelSearchRequest,
    ) -> Result<SearchResultSet, ProviderError> {
        self.search_auths.lock().unwrap().push(auth.clone());
        self.search_requests.lock().unwrap().push(request.clone());

        let gate = self.search_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.search_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchResultSet::default()))
    }

    async fn fetch_hotel_details(
        &self,
        _auth: &ProviderAuth,
        _context: &SearchContext,
        _hotel_id: &str,
        _trace_id: Option<&str>,
    ) -> Result<RawHotelDetails, ProviderError> {
        Ok(self.details_response.lock().unwrap().clone().unwrap_or_default())
    }

    async fn select_room(
        &self,
        _auth: &ProviderAuth,
        _hotel_id: &str,
        request: &SelectRoomRequest,
    ) -> Result<Option<ProviderSelection>, ProviderError> {
        self.select_requests.lock().unwrap().push(request.clone());
        self.select_responses.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn upsert_itinerary_hotel(
        &self,
        _auth: &ProviderAuth,
        itinerary_token: &str,
        replace: bool,
        request: &ItineraryHotelRequest,
    ) -> Result<ItineraryUpdateResponse, ProviderError> {
        self.itinerary_requests.lock().unwrap().push((
            itinerary_token.to_string(),
            replace,
            request.clone(),
        ));
        Ok(self
            .itinerary_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ItineraryUpdateResponse {
                success: true,
                message: None,
                partial_success: false,
            }))
    }
}

pub fn auth() -> ProviderAuth {
    ProviderAuth {
        bearer_token: "test-token".to_string(),
        inquiry_token: "inq-1".to_string(),
    }
}

pub fn context() -> SearchContext {
    SearchContext {
        city_name: "Lisbon".to_string(),
        check_in: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        check_out: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        inquiry_token: "inq-1".to_string(),
        nationality: "PT".to_string(),
    }
}

pub fn party() -> PartyConfiguration {
    PartyConfiguration {
        rooms: vec![Room { adults: vec![Some(30), Some(32)], children: vec![Some(6)] }],
    }
}

pub fn occupancies() -> Vec<RoomOccupancy> {
    vec![RoomOccupancy { num_of_adults: 2, child_ages: vec![6] }]
}

pub fn query() -> SearchQuery {
    filter_service::build(&FilterState::default(), SortOrder::default(), &context(), &party())
}

pub fn hotel(id: &str) -> HotelSummary {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Hotel {}", id),
        "starRating": 4,
        "availability": {
            "rate": { "finalRate": 120.0, "currency": "EUR" },
            "options": { "freeBreakfast": true, "refundable": true }
        }
    }))
    .unwrap()
}

pub fn result_set(
    trace_id: Option<&str>,
    current_page: u32,
    next_page: Option<u32>,
    hotels: Vec<HotelSummary>,
) -> SearchResultSet {
    let count = hotels.len() as u64;
    SearchResultSet {
        data: hotels,
        trace_id: trace_id.map(String::from),
        current_page: Some(current_page),
        next_page,
        total_count: Some(40),
        filtered_count: Some(count),
    }
}

/// A details payload with two rooms, two rates, and one two-rate
/// recommendation, plus the catalog-level context fields the commit step
/// falls back to.
pub fn raw_details() -> RawHotelDetails {
    serde_json::from_value(json!({
        "hotelId": "H1",
        "name": "Grand Tagus",
        "traceId": "T-details",
        "itineraryCode": "IT-77",
        "items": [{ "code": "item-1" }],
        "rooms": {
            "room-a": { "name": "Double Deluxe" },
            "room-b": { "name": "Twin Classic" }
        },
        "rates": {
            "r1": {
                "finalRate": 150.0,
                "currency": "EUR",
                "occupancies": [{ "roomId": "room-a", "numOfAdults": 2, "childAges": [6] }]
            },
            "r2": {
                "finalRate": 110.0,
                "currency": "EUR",
                "occupancies": [{ "roomId": "room-b", "numOfAdults": 1 }]
            }
        },
        "recommendations": {
            "REC": { "rateIds": ["r1", "r2"] }
        }
    }))
    .unwrap()
}

pub fn itinerary(old_hotel_code: Option<&str>) -> ItineraryContext {
    ItineraryContext {
        itinerary_token: "itin-9".to_string(),
        city_name: "Lisbon".to_string(),
        date: Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
        check_in: Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
        check_out: Some(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()),
        old_hotel_code: old_hotel_code.map(String::from),
    }
}
