use crate::models::filters::{FilterBy, FilterState, PricePoint, SearchQuery, SortBy, SortOrder};
use crate::models::party::PartyConfiguration;
use crate::models::search::SearchContext;

/// Fixed amenity-flag to provider facility-name table. "freeBreakfast" is
/// not in here on purpose: the provider takes it as a boolean, not a
/// facility name.
const AMENITY_FACILITIES: &[(&str, &str)] = &[
    ("wifi", "WiFi"),
    ("pool", "Swimming Pool"),
    ("spa", "Spa"),
    ("gym", "Fitness Centre"),
    ("parking", "Parking"),
    ("restaurant", "Restaurant"),
    ("bar", "Bar"),
    ("airportShuttle", "Airport Shuttle"),
    ("laundry", "Laundry Service"),
];

const FREE_BREAKFAST_FLAG: &str = "freeBreakfast";

/// Build the provider `filterBy`/`sortBy` fragments from a filter snapshot.
/// Empty fields are omitted entirely; `sortBy` is always present and carries
/// the resolved budget ceiling.
pub fn build(
    filters: &FilterState,
    sort: SortOrder,
    context: &SearchContext,
    party: &PartyConfiguration,
) -> SearchQuery {
    let ceiling = budget_ceiling(filters.price_point, context, party);

    SearchQuery {
        filter_by: build_filter_by(filters),
        sort_by: SortBy {
            id: sort.provider_id(),
            value: sort.provider_value().to_string(),
            label: sort.label().to_string(),
            final_rate: ceiling,
        },
    }
}

/// The price point is per night, per adult. A finite value becomes an
/// absolute trip budget of `pricePoint * nights * totalAdults`; "max" sends
/// no ceiling at all. Both the add-hotel and change-hotel flows go through
/// this one conversion.
pub fn budget_ceiling(
    price_point: PricePoint,
    context: &SearchContext,
    party: &PartyConfiguration,
) -> Option<f64> {
    match price_point {
        PricePoint::Max => None,
        PricePoint::Amount(per_night_per_adult) => {
            let nights = context.nights() as f64;
            let adults = party.total_adults().max(1) as f64;
            Some(per_night_per_adult * nights * adults)
        }
    }
}

fn build_filter_by(filters: &FilterState) -> Option<FilterBy> {
    let mut filter_by = FilterBy::default();

    if let Some(name) = filters
        .text_search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        filter_by.hotel_name = Some(name.to_string());
    }

    if !filters.star_ratings.is_empty() {
        filter_by.ratings = Some(filters.star_ratings.iter().copied().collect());
    }

    // Review buckets go out descending-sorted.
    if !filters.review_rating_buckets.is_empty() {
        filter_by.review_ratings =
            Some(filters.review_rating_buckets.iter().rev().copied().collect());
    }

    let mut facilities = Vec::new();
    for flag in &filters.amenity_flags {
        if flag == FREE_BREAKFAST_FLAG {
            filter_by.free_breakfast = Some(true);
            continue;
        }
        match AMENITY_FACILITIES.iter().find(|(key, _)| key == flag) {
            Some((_, facility)) => facilities.push((*facility).to_string()),
            None => log::debug!("ignoring unknown amenity flag: {}", flag),
        }
    }
    if !facilities.is_empty() {
        filter_by.facilities = Some(facilities);
    }

    if let Some(property_type) = filters
        .property_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        filter_by.property_type = Some(property_type.to_string());
    }

    if !filters.tags.is_empty() {
        filter_by.tags = Some(filters.tags.iter().cloned().collect());
    }

    if filter_by == FilterBy::default() {
        None
    } else {
        Some(filter_by)
    }
}
