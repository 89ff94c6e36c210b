use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/*
    Raw hotel-details payload as the provider sends it. Every nested section
    is optional: the provider regularly omits whole blocks, and normalization
    (services::rate_catalog) turns whatever arrives into the three validated
    mappings below.
*/

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawHotelDetails {
    #[serde(default)]
    pub hotel_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub itinerary_code: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub rooms: Option<HashMap<String, RawRoom>>,
    #[serde(default)]
    pub rates: Option<HashMap<String, RawRate>>,
    #[serde(default)]
    pub recommendations: Option<HashMap<String, RawRecommendation>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawRoom {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub facilities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawRate {
    #[serde(default)]
    pub final_rate: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub refundable: Option<bool>,
    #[serde(default)]
    pub board_basis: Option<String>,
    #[serde(default)]
    pub occupancies: Option<Vec<RawRateOccupancy>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawRateOccupancy {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub num_of_adults: Option<u32>,
    #[serde(default)]
    pub child_ages: Option<Vec<u8>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawRecommendation {
    #[serde(default)]
    pub rate_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HotelDetailsEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<RawHotelDetails>,
}

/*
    Normalized catalog types. Referential integrity holds after
    normalization: a rate only references rooms that exist, a recommendation
    only references rates that exist.
*/

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub id: String,
    pub name: String,
    pub facilities: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RateOccupancyRef {
    pub room_id: Option<String>,
    pub num_of_adults: u32,
    pub child_ages: Vec<u8>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RateInfo {
    pub id: String,
    pub final_rate: f64,
    pub currency: Option<String>,
    pub refundable: Option<bool>,
    pub board_basis: Option<String>,
    pub occupancies: Vec<RateOccupancyRef>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub rate_ids: Vec<String>,
}

/// Derived listing entry for the recommendation picker. `mixed_currency` is
/// a data anomaly flag; the total is never averaged across currencies.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSummary {
    pub id: String,
    pub total_price: f64,
    pub currency: Option<String>,
    pub rates_count: usize,
    pub mixed_currency: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationOccupancy {
    pub adults: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_ages: Option<Vec<u8>>,
}

/// One entry of a resolved recommendation, ready for the provider's
/// room-selection endpoint. Resolution keeps these 1:1 and in order with the
/// recommendation's rate list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomRateAllocation {
    pub rate_id: String,
    pub room_id: String,
    pub occupancy: AllocationOccupancy,
}

/// Catalog-level context captured at details time. The commit step falls
/// back to these values when the provider's selection response omits them.
#[derive(Debug, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CatalogContext {
    pub hotel_id: Option<String>,
    pub hotel_name: Option<String>,
    pub trace_id: Option<String>,
    pub itinerary_code: Option<String>,
    pub items: Option<Vec<serde_json::Value>>,
}
