use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::models::rates::{
    CatalogContext, RateInfo, RateOccupancyRef, RawHotelDetails, Recommendation,
    RecommendationSummary, RoomInfo,
};

/// The normalized, addressable view of one hotel's nested rate data. Built
/// once per details fetch by the validating `normalize` constructor;
/// referential-integrity problems are caught here, not at every read site.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RateCatalog {
    pub rooms: HashMap<String, RoomInfo>,
    pub rates: HashMap<String, RateInfo>,
    pub recommendations: HashMap<String, Recommendation>,
    #[serde(skip)]
    pub context: CatalogContext,
}

impl RateCatalog {
    /// Normalize a raw details payload. Missing sections become empty
    /// mappings; a rate whose occupancy references an unknown room, and a
    /// recommendation referencing an unknown rate, are dropped with a
    /// warning rather than surfaced as valid options.
    pub fn normalize(raw: RawHotelDetails) -> RateCatalog {
        let context = CatalogContext {
            hotel_id: raw.hotel_id,
            hotel_name: raw.name,
            trace_id: raw.trace_id,
            itinerary_code: raw.itinerary_code,
            items: raw.items,
        };

        let rooms: HashMap<String, RoomInfo> = raw
            .rooms
            .unwrap_or_default()
            .into_iter()
            .map(|(id, room)| {
                let info = RoomInfo {
                    name: room.name.unwrap_or_else(|| format!("Room {}", id)),
                    facilities: room.facilities.unwrap_or_default(),
                    id: id.clone(),
                };
                (id, info)
            })
            .collect();

        let mut rates: HashMap<String, RateInfo> = HashMap::new();
        for (id, rate) in raw.rates.unwrap_or_default() {
            let occupancies: Vec<RateOccupancyRef> = rate
                .occupancies
                .unwrap_or_default()
                .into_iter()
                .map(|occupancy| RateOccupancyRef {
                    room_id: occupancy.room_id,
                    num_of_adults: occupancy.num_of_adults.unwrap_or(1),
                    child_ages: occupancy.child_ages.unwrap_or_default(),
                })
                .collect();

            let dangling_room = occupancies
                .iter()
                .filter_map(|occupancy| occupancy.room_id.as_deref())
                .find(|room_id| !rooms.contains_key(*room_id));
            if let Some(room_id) = dangling_room {
                log::warn!("dropping rate {}: references unknown room {}", id, room_id);
                continue;
            }

            if rate.final_rate.is_none() {
                log::warn!("rate {} carries no final rate, treating as 0", id);
            }

            rates.insert(
                id.clone(),
                RateInfo {
                    id,
                    final_rate: rate.final_rate.unwrap_or(0.0),
                    currency: rate.currency,
                    refundable: rate.refundable,
                    board_basis: rate.board_basis,
                    occupancies,
                },
            );
        }

        let mut recommendations: HashMap<String, Recommendation> = HashMap::new();
        for (id, recommendation) in raw.recommendations.unwrap_or_default() {
            let rate_ids = recommendation.rate_ids.unwrap_or_default();
            if rate_ids.is_empty() {
                log::warn!("dropping recommendation {}: no rates listed", id);
                continue;
            }
            if let Some(missing) = rate_ids.iter().find(|rate_id| !rates.contains_key(*rate_id)) {
                log::warn!("dropping recommendation {}: references unknown rate {}", id, missing);
                continue;
            }
            recommendations.insert(id.clone(), Recommendation { id, rate_ids });
        }

        RateCatalog { rooms, rates, recommendations, context }
    }

    /// Summaries for the recommendation picker, cheapest first. The total is
    /// the sum of member rates; the currency comes from the first resolvable
    /// rate, and mixing currencies inside one recommendation sets the
    /// anomaly flag instead of averaging.
    pub fn list_recommendations(&self) -> Vec<RecommendationSummary> {
        let mut summaries: Vec<RecommendationSummary> = self
            .recommendations
            .values()
            .map(|recommendation| {
                let mut total_price = 0.0;
                let mut currency: Option<String> = None;
                let mut mixed_currency = false;

                for rate_id in &recommendation.rate_ids {
                    if let Some(rate) = self.rates.get(rate_id) {
                        total_price += rate.final_rate;
                        match (&currency, &rate.currency) {
                            (None, Some(rate_currency)) => currency = Some(rate_currency.clone()),
                            (Some(held), Some(rate_currency)) if held != rate_currency => {
                                mixed_currency = true;
                            }
                            _ => {}
                        }
                    }
                }

                if mixed_currency {
                    log::warn!("recommendation {} mixes currencies", recommendation.id);
                }

                RecommendationSummary {
                    id: recommendation.id.clone(),
                    total_price,
                    currency,
                    rates_count: recommendation.rate_ids.len(),
                    mixed_currency,
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            a.total_price.partial_cmp(&b.total_price).unwrap_or(Ordering::Equal)
        });
        summaries
    }
}
