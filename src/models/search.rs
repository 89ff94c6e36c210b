use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::filters::{FilterBy, SortBy};
use crate::models::party::RoomOccupancy;

/// Immutable parameters of one logical search. Changing any of these starts a
/// new session; the continuation token of the old one is discarded.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchContext {
    pub city_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub inquiry_token: String,
    pub nationality: String,
}

impl SearchContext {
    /// Trip length in nights, never below 1.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days().max(1)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub count: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RatePreview {
    #[serde(default)]
    pub final_rate: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RateOptions {
    #[serde(default)]
    pub free_breakfast: bool,
    #[serde(default)]
    pub free_cancellation: bool,
    #[serde(default)]
    pub pay_at_hotel: bool,
    #[serde(default)]
    pub refundable: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HotelAvailability {
    #[serde(default)]
    pub rate: Option<RatePreview>,
    #[serde(default)]
    pub options: Option<RateOptions>,
}

/// One hotel in a search-result page, passed through to the caller mostly
/// untouched.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HotelSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub star_rating: Option<f32>,
    #[serde(default)]
    pub images: Vec<serde_json::Value>,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<ReviewSummary>,
    #[serde(default)]
    pub availability: Option<HotelAvailability>,
}

/// Body of `POST /hotels/{inquiryToken}/{city}/{checkIn}/{checkOut}`.
/// `trace_id` is absent on page 1 and echoes the previous response afterwards.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchRequest {
    pub occupancies: Vec<RoomOccupancy>,
    pub page: u32,
    pub nationality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<FilterBy>,
    pub sort_by: SortBy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchResultsEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<SearchResultsData>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchResultsData {
    #[serde(default)]
    pub results: Vec<SearchResultSet>,
}

/// One result set from the provider. Every field is optional on the wire;
/// missing counts default downstream.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultSet {
    #[serde(default)]
    pub data: Vec<HotelSummary>,
    #[serde(default)]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub filtered_count: Option<u64>,
}

/// Normalized page handed back to the caller.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub hotels: Vec<HotelSummary>,
    pub continuation_token: Option<String>,
    pub page_number: u32,
    pub has_next_page: bool,
    pub total_count: u64,
    pub filtered_count: u64,
}
