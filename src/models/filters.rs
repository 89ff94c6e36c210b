use std::collections::BTreeSet;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// UI-level price cap, expressed per night per adult. `Max` means the slider
/// is at its upper stop and no budget constraint is sent at all.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PricePoint {
    Amount(f64),
    #[default]
    Max,
}

impl Serialize for PricePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PricePoint::Amount(value) => serializer.serialize_f64(*value),
            PricePoint::Max => serializer.serialize_str("max"),
        }
    }
}

impl<'de> Deserialize<'de> for PricePoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(PricePoint::Amount)
                .ok_or_else(|| D::Error::custom("price point is not a finite number")),
            serde_json::Value::String(s) if s.eq_ignore_ascii_case("max") => Ok(PricePoint::Max),
            other => Err(D::Error::custom(format!("invalid price point: {}", other))),
        }
    }
}

/// Snapshot of the filter sidebar. The engine only consumes this; the UI owns
/// the live state.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub text_search: Option<String>,
    #[serde(default)]
    pub star_ratings: BTreeSet<u8>,
    #[serde(default)]
    pub review_rating_buckets: BTreeSet<u8>,
    #[serde(default)]
    pub amenity_flags: BTreeSet<String>,
    #[serde(default)]
    pub price_point: PricePoint,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    NameAsc,
}

impl SortOrder {
    pub fn provider_id(&self) -> u8 {
        match self {
            SortOrder::Relevance => 1,
            SortOrder::PriceAsc => 2,
            SortOrder::PriceDesc => 3,
            SortOrder::RatingDesc => 4,
            SortOrder::NameAsc => 5,
        }
    }

    pub fn provider_value(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::PriceAsc => "priceAsc",
            SortOrder::PriceDesc => "priceDesc",
            SortOrder::RatingDesc => "ratingDesc",
            SortOrder::NameAsc => "nameAsc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "Relevance",
            SortOrder::PriceAsc => "Price (low to high)",
            SortOrder::PriceDesc => "Price (high to low)",
            SortOrder::RatingDesc => "Rating",
            SortOrder::NameAsc => "Name",
        }
    }
}

/// The provider's `filterBy` fragment. Absence of a field, not an empty
/// value, is how the provider reads "no constraint", hence the blanket
/// `skip_serializing_if`.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterBy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_ratings: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_breakfast: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// The provider's `sortBy` fragment: discriminant id/value pair plus the
/// resolved absolute budget ceiling, all in one object.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SortBy {
    pub id: u8,
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_rate: Option<f64>,
}

/// The two query fragments a search request carries.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub filter_by: Option<FilterBy>,
    pub sort_by: SortBy,
}
