//! Free-text query parsing into a structured search filter.
//!
//! Deterministic keyword matching, no LLM: the fixed vocabulary below is the
//! whole contract. Unknown words simply don't constrain the search.

use crate::catalog::{Cuisine, PriceLevel};
use regex::Regex;

/// Parsed search constraints. Constructed fresh per query, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    /// Canonical cuisine tags, deduplicated. Empty = no constraint.
    pub cuisines: Vec<Cuisine>,
    pub price: Option<PriceLevel>,
    pub fastest: bool,
    pub spicy: bool,
}

impl SearchFilter {
    /// True when the query matched nothing; such a filter matches everything.
    pub fn is_unconstrained(&self) -> bool {
        self.cuisines.is_empty() && self.price.is_none() && !self.fastest && !self.spicy
    }
}

/// Keyword -> canonical tag. "salad" and "healthy" both map to Healthy.
const CUISINE_KEYWORDS: &[(&str, Cuisine)] = &[
    ("italian", Cuisine::Italian),
    ("pizza", Cuisine::Pizza),
    ("indian", Cuisine::Indian),
    ("salad", Cuisine::Healthy),
    ("healthy", Cuisine::Healthy),
    ("spicy", Cuisine::Spicy),
];

/// Parse a free-text query. Case-insensitive; empty or fully-unmatched input
/// yields the unconstrained filter.
pub fn parse(query: &str) -> SearchFilter {
    let q = query.to_lowercase();

    let mut cuisines = Vec::new();
    for (keyword, tag) in CUISINE_KEYWORDS {
        if q.contains(keyword) && !cuisines.contains(tag) {
            cuisines.push(*tag);
        }
    }

    SearchFilter {
        cuisines,
        price: parse_price(&q),
        fastest: wants_fastest(&q),
        spicy: q.contains("spicy") || q.contains("heat"),
    }
}

/// First matching tier wins: cheap, then moderate, then premium.
fn parse_price(q: &str) -> Option<PriceLevel> {
    let has_token = |t: &str| q.split_whitespace().any(|w| w == t);

    if q.contains("cheap") || has_token("$") {
        Some(PriceLevel::Cheap)
    } else if q.contains("moderate") || has_token("$$") {
        Some(PriceLevel::Moderate)
    } else if q.contains("premium") || q.contains("expensive") || has_token("$$$") {
        Some(PriceLevel::Premium)
    } else {
        None
    }
}

fn wants_fastest(q: &str) -> bool {
    Regex::new(r"\b(fast|quick)(est)?\b")
        .map(|re| re.is_match(q))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_unconstrained() {
        let f = parse("");
        assert!(f.is_unconstrained());

        let f = parse("surprise me with dinner");
        assert!(f.is_unconstrained());
    }

    /// Regression test: the "cheapest italian" acceptance query.
    #[test]
    fn cheapest_italian() {
        let f = parse("cheapest italian");
        assert_eq!(f.cuisines, vec![Cuisine::Italian]);
        assert_eq!(f.price, Some(PriceLevel::Cheap));
        assert!(!f.fastest);
        assert!(!f.spicy);
    }

    /// Regression test: the "fastest salad" acceptance query.
    #[test]
    fn fastest_salad() {
        let f = parse("fastest salad");
        assert_eq!(f.cuisines, vec![Cuisine::Healthy]);
        assert!(f.fastest);
        assert_eq!(f.price, None);
    }

    #[test]
    fn salad_and_healthy_dedupe_to_one_tag() {
        let f = parse("a healthy salad please");
        assert_eq!(f.cuisines, vec![Cuisine::Healthy]);
    }

    #[test]
    fn dollar_tokens_set_price() {
        assert_eq!(parse("show me $ food").price, Some(PriceLevel::Cheap));
        assert_eq!(parse("something $$ tonight").price, Some(PriceLevel::Moderate));
        // "$$$" is not a "$$" token
        assert_eq!(parse("$$$ date night").price, Some(PriceLevel::Premium));
        assert_eq!(parse("expensive").price, Some(PriceLevel::Premium));
    }

    #[test]
    fn spicy_sets_both_cuisine_and_preference() {
        let f = parse("something spicy");
        assert_eq!(f.cuisines, vec![Cuisine::Spicy]);
        assert!(f.spicy);

        // "heat" alone is a spice preference without a cuisine tag
        let f = parse("i want some heat");
        assert!(f.spicy);
        assert!(f.cuisines.is_empty());
    }

    #[test]
    fn quick_counts_as_fastest() {
        assert!(parse("quick lunch").fastest);
        assert!(parse("the quickest option").fastest);
        assert!(!parse("breakfast").fastest);
    }
}
