use std::error::Error;
use std::fmt;

use crate::models::rates::{AllocationOccupancy, RoomRateAllocation};
use crate::services::rate_catalog::RateCatalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    UnknownRecommendation(String),
    /// A rate in the recommendation cannot be fully resolved (missing rate,
    /// missing occupancy, or an unset room id). Partial allocations are
    /// never returned; the booking step would book the wrong rooms.
    IncompleteRateData { rate_id: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnknownRecommendation(id) => {
                write!(f, "unknown recommendation: {}", id)
            }
            ResolveError::IncompleteRateData { rate_id } => {
                write!(f, "rate {} is missing room or occupancy data", rate_id)
            }
        }
    }
}

impl Error for ResolveError {}

/// Resolve a chosen recommendation into the (room, rate, occupancy)
/// allocations the provider's room-selection endpoint expects, one per rate
/// id and in the recommendation's order.
pub fn resolve(
    recommendation_id: &str,
    catalog: &RateCatalog,
) -> Result<Vec<RoomRateAllocation>, ResolveError> {
    let recommendation = catalog
        .recommendations
        .get(recommendation_id)
        .ok_or_else(|| ResolveError::UnknownRecommendation(recommendation_id.to_string()))?;

    let mut allocations = Vec::with_capacity(recommendation.rate_ids.len());
    for rate_id in &recommendation.rate_ids {
        let incomplete = || ResolveError::IncompleteRateData { rate_id: rate_id.clone() };

        let rate = catalog.rates.get(rate_id).ok_or_else(incomplete)?;
        let occupancy = rate.occupancies.first().ok_or_else(incomplete)?;
        let room_id = occupancy.room_id.clone().ok_or_else(incomplete)?;

        allocations.push(RoomRateAllocation {
            rate_id: rate_id.clone(),
            room_id,
            occupancy: AllocationOccupancy {
                adults: occupancy.num_of_adults,
                child_ages: if occupancy.child_ages.is_empty() {
                    None
                } else {
                    Some(occupancy.child_ages.clone())
                },
            },
        });
    }

    Ok(allocations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(value: serde_json::Value) -> RateCatalog {
        RateCatalog::normalize(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_resolves_one_allocation_per_rate_in_order() {
        let catalog = catalog(json!({
            "rooms": { "room-a": {}, "room-b": {} },
            "rates": {
                "r1": { "finalRate": 100.0,
                        "occupancies": [{ "roomId": "room-a", "numOfAdults": 2, "childAges": [5] }] },
                "r2": { "finalRate": 90.0,
                        "occupancies": [{ "roomId": "room-b", "numOfAdults": 1 }] }
            },
            "recommendations": { "REC": { "rateIds": ["r1", "r2"] } }
        }));

        let allocations = resolve("REC", &catalog).unwrap();
        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].rate_id, "r1");
        assert_eq!(allocations[0].room_id, "room-a");
        assert_eq!(allocations[0].occupancy.adults, 2);
        assert_eq!(allocations[0].occupancy.child_ages, Some(vec![5]));
        assert_eq!(allocations[1].rate_id, "r2");
        assert_eq!(allocations[1].occupancy.child_ages, None);
    }

    #[test]
    fn test_missing_room_id_is_a_hard_fail_naming_the_rate() {
        let catalog = catalog(json!({
            "rooms": { "room-a": {} },
            "rates": {
                "r1": { "finalRate": 100.0,
                        "occupancies": [{ "roomId": "room-a", "numOfAdults": 2 }] },
                "r2": { "finalRate": 90.0, "occupancies": [{ "numOfAdults": 2 }] }
            },
            "recommendations": { "REC": { "rateIds": ["r1", "r2"] } }
        }));

        assert_eq!(
            resolve("REC", &catalog),
            Err(ResolveError::IncompleteRateData { rate_id: "r2".to_string() })
        );
    }

    #[test]
    fn test_rate_without_occupancies_is_incomplete() {
        let catalog = catalog(json!({
            "rooms": {},
            "rates": { "r1": { "finalRate": 80.0 } },
            "recommendations": { "REC": { "rateIds": ["r1"] } }
        }));

        assert_eq!(
            resolve("REC", &catalog),
            Err(ResolveError::IncompleteRateData { rate_id: "r1".to_string() })
        );
    }

    #[test]
    fn test_unknown_recommendation() {
        let catalog = catalog(json!({}));
        assert_eq!(
            resolve("nope", &catalog),
            Err(ResolveError::UnknownRecommendation("nope".to_string()))
        );
    }
}
