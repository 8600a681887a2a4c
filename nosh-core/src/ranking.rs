//! Catalog filtering and ranking.
//!
//! Three sort strategies, picked off the parsed filter:
//! - fastest: ETA asc, rating desc, distance asc
//! - cheap: featured price asc, rating desc, distance asc
//! - default: rating desc, distance asc
//! Missing distances always sort last within a tie.

use crate::catalog::{Cuisine, PriceLevel, Restaurant};
use crate::filter::SearchFilter;
use crate::geo::{haversine_mi, Coordinate};
use regex::Regex;
use std::cmp::Ordering;

/// Sort sentinel for ETA strings with no parseable minute count.
pub const ETA_SENTINEL: u32 = 999;

/// How many results a search surfaces.
pub const MAX_RESULTS: usize = 3;

/// One search hit with its per-query derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub restaurant: Restaurant,
    /// Absent when the device location is unknown.
    pub distance_mi: Option<f64>,
    /// Leading minute count of the ETA window, or [`ETA_SENTINEL`].
    pub eta_min: u32,
}

/// Filter and rank the catalog. Returns at most [`MAX_RESULTS`] results;
/// empty when nothing survives filtering.
pub fn rank(
    catalog: &[Restaurant],
    filter: &SearchFilter,
    location: Option<Coordinate>,
) -> Vec<RankedResult> {
    let survivors: Vec<&Restaurant> = catalog
        .iter()
        .filter(|r| matches_cuisine(r, filter) && matches_spicy(r, filter))
        .collect();

    // The price level prefers rather than vetoes: when no survivor sits at
    // the requested level, the level constraint is dropped so "cheapest
    // italian" still surfaces the only Italian place.
    let survivors = match filter.price {
        Some(level) => {
            let at_level: Vec<&Restaurant> = survivors
                .iter()
                .copied()
                .filter(|r| r.price == level)
                .collect();
            if at_level.is_empty() { survivors } else { at_level }
        }
        None => survivors,
    };

    let mut results: Vec<RankedResult> = survivors
        .into_iter()
        .map(|r| RankedResult {
            distance_mi: location.map(|loc| haversine_mi(loc, r.position)),
            eta_min: parse_eta_min(&r.eta),
            restaurant: r.clone(),
        })
        .collect();

    results.sort_by(|a, b| compare(a, b, filter));
    results.truncate(MAX_RESULTS);
    results
}

fn matches_cuisine(r: &Restaurant, filter: &SearchFilter) -> bool {
    filter.cuisines.is_empty() || filter.cuisines.iter().any(|c| r.has_cuisine(*c))
}

fn matches_spicy(r: &Restaurant, filter: &SearchFilter) -> bool {
    if !filter.spicy {
        return true;
    }
    r.has_cuisine(Cuisine::Spicy) || name_suggests_spice(&r.name)
}

fn name_suggests_spice(name: &str) -> bool {
    let n = name.to_lowercase();
    ["spice", "spicy", "curry", "hot"].iter().any(|kw| n.contains(kw))
}

fn compare(a: &RankedResult, b: &RankedResult, filter: &SearchFilter) -> Ordering {
    if filter.fastest {
        a.eta_min
            .cmp(&b.eta_min)
            .then_with(|| rating_desc(a, b))
            .then_with(|| distance_asc(a, b))
    } else if filter.price == Some(PriceLevel::Cheap) {
        a.restaurant
            .featured
            .price
            .total_cmp(&b.restaurant.featured.price)
            .then_with(|| rating_desc(a, b))
            .then_with(|| distance_asc(a, b))
    } else {
        rating_desc(a, b).then_with(|| distance_asc(a, b))
    }
}

fn rating_desc(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.restaurant.rating.total_cmp(&a.restaurant.rating)
}

fn distance_asc(a: &RankedResult, b: &RankedResult) -> Ordering {
    match (a.distance_mi, b.distance_mi) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// First integer in an ETA window like "25-35 min"; sentinel when absent.
fn parse_eta_min(eta: &str) -> u32 {
    let lead = || -> Option<u32> {
        let re = Regex::new(r"\d+").ok()?;
        re.find(eta)?.as_str().parse().ok()
    };
    lead().unwrap_or(ETA_SENTINEL)
}
