use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::rates::RoomRateAllocation;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommitKind {
    #[default]
    Add,
    Replace,
}

/// Caller-held itinerary context for the commit step. `date` covers the
/// single-day entry form; multi-night callers send `check_in`/`check_out`
/// instead.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryContext {
    pub itinerary_token: String,
    pub city_name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub check_in: Option<NaiveDate>,
    #[serde(default)]
    pub check_out: Option<NaiveDate>,
    #[serde(default)]
    pub old_hotel_code: Option<String>,
}

impl ItineraryContext {
    pub fn stay_date(&self) -> Option<NaiveDate> {
        self.date.or(self.check_in)
    }
}

/// Body of `POST /hotels/{inquiryToken}/{hotelId}/select-room`.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SelectRoomRequest {
    pub rooms_and_rate_allocations: Vec<RoomRateAllocation>,
    pub recommendation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    pub inquiry_token: String,
    pub city_name: String,
    pub date: String,
}

/// The provider's select-room response. Any of these may be missing; the
/// commit step reconciles against the catalog context.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSelection {
    #[serde(default)]
    pub hotel_code: Option<String>,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub itinerary_code: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub rooms_and_rate_allocations: Option<Vec<RoomRateAllocation>>,
    #[serde(default)]
    pub trace_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SelectRoomEnvelope {
    #[serde(default)]
    pub data: Option<ProviderSelection>,
}

/// Reconciled hotel entry sent to the itinerary add/replace endpoint.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewHotelDetails {
    pub hotel_code: String,
    pub hotel_name: String,
    pub itinerary_code: String,
    pub items: Vec<serde_json::Value>,
    pub rooms_and_rate_allocations: Vec<RoomRateAllocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Body of `POST`/`PUT /itinerary/{itineraryToken}/hotel`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryHotelRequest {
    pub city_name: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
    pub new_hotel_details: NewHotelDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_hotel_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryUpdateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub partial_success: bool,
}

/// What the caller gets back from a completed commit. `warning` carries the
/// partial-success message when the provider added the hotel but failed a
/// dependent update.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    pub hotel_name: String,
    pub final_allocation: Vec<RoomRateAllocation>,
    pub committed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
