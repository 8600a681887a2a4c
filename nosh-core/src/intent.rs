//! Chat intent classification and add-from-text resolution.
//!
//! Priority-ordered, first match wins; the categories are not mutually
//! exclusive ("add a quick pizza" is an add, not a search).

use crate::catalog::Restaurant;
use crate::ranking::RankedResult;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ClearHistory,
    Help,
    ViewCart,
    AddToCart,
    Search,
}

/// Classify one chat message.
pub fn classify(text: &str) -> Intent {
    let q = text.trim().to_lowercase();

    if q == "clear" || q == "reset" {
        return Intent::ClearHistory;
    }

    if q.starts_with("help")
        || q.starts_with('?')
        || q.contains("what can you do")
        || q.contains("how to")
        || q.contains("how do")
    {
        return Intent::Help;
    }

    if matches_pattern(&q, r"\b(show|view|open)\b.*\bcart\b") {
        return Intent::ViewCart;
    }

    if matches_pattern(&q, r"\b(add|order|buy|put)\b") {
        return Intent::AddToCart;
    }

    Intent::Search
}

fn matches_pattern(q: &str, pattern: &str) -> bool {
    Regex::new(pattern).map(|re| re.is_match(q)).unwrap_or(false)
}

/// A resolved add-to-cart target: a restaurant's featured item.
#[derive(Debug, Clone, PartialEq)]
pub struct AddTarget {
    pub restaurant: String,
    pub item: String,
    pub price: f64,
}

impl AddTarget {
    fn featured_of(r: &Restaurant) -> Self {
        Self {
            restaurant: r.name.clone(),
            item: r.featured.name.clone(),
            price: r.featured.price,
        }
    }
}

/// Name fragments that imply one of the seed restaurants.
const RESTAURANT_HINTS: &[(&str, &str)] = &[
    ("pizza", "Mario's Pizzeria"),
    ("margherita", "Mario's Pizzeria"),
    ("salad", "Green Garden"),
    ("caesar", "Green Garden"),
    ("curry", "Spice Route"),
];

/// Resolve an add request, trying in order: a positional reference into the
/// last search results, a restaurant name substring, then keyword hints.
/// `None` means the caller should ask a clarifying question.
pub fn resolve_add(
    text: &str,
    last_results: &[RankedResult],
    catalog: &[Restaurant],
) -> Option<AddTarget> {
    let q = text.trim().to_lowercase();

    // "#2" or a bare "2", 1-based into the remembered results
    if let Some(idx) = positional_reference(&q) {
        if let Some(hit) = last_results.get(idx) {
            return Some(AddTarget::featured_of(&hit.restaurant));
        }
    }

    if let Some(r) = catalog.iter().find(|r| q.contains(&r.name.to_lowercase())) {
        return Some(AddTarget::featured_of(r));
    }

    for (hint, name) in RESTAURANT_HINTS {
        if q.contains(hint) {
            if let Some(r) = catalog.iter().find(|r| r.name == *name) {
                return Some(AddTarget::featured_of(r));
            }
        }
    }

    None
}

fn positional_reference(q: &str) -> Option<usize> {
    let re = Regex::new(r"\b([1-3])\b").ok()?;
    let n: usize = re.captures(q)?[1].parse().ok()?;
    Some(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_restaurants;
    use crate::filter::SearchFilter;
    use crate::ranking::rank;

    #[test]
    fn clear_and_reset_win_over_everything() {
        assert_eq!(classify("clear"), Intent::ClearHistory);
        assert_eq!(classify("  RESET  "), Intent::ClearHistory);
        // only the exact word, not a sentence containing it
        assert_ne!(classify("clear my cart please"), Intent::ClearHistory);
    }

    #[test]
    fn help_patterns() {
        assert_eq!(classify("help"), Intent::Help);
        assert_eq!(classify("?"), Intent::Help);
        assert_eq!(classify("what can you do"), Intent::Help);
        assert_eq!(classify("how do i order food"), Intent::Help);
    }

    #[test]
    fn cart_view_patterns() {
        assert_eq!(classify("show my cart"), Intent::ViewCart);
        assert_eq!(classify("open the cart"), Intent::ViewCart);
        assert_eq!(classify("view cart"), Intent::ViewCart);
        // an add mentioning the cart is still an add
        assert_eq!(classify("put a pizza in my cart"), Intent::AddToCart);
    }

    #[test]
    fn add_verbs_and_search_fallback() {
        assert_eq!(classify("add the caesar salad"), Intent::AddToCart);
        assert_eq!(classify("order a margherita"), Intent::AddToCart);
        assert_eq!(classify("buy dinner"), Intent::AddToCart);
        assert_eq!(classify("cheapest italian"), Intent::Search);
        assert_eq!(classify(""), Intent::Search);
    }

    /// Regression test: after a search returning R1..R3, "add #2" resolves
    /// to the second result's featured item.
    #[test]
    fn positional_add_uses_last_results() {
        let catalog = seed_restaurants();
        let results = rank(&catalog, &SearchFilter::default(), None);
        assert_eq!(results.len(), 3);

        let target = resolve_add("add #2", &results, &catalog).unwrap();
        assert_eq!(target.restaurant, results[1].restaurant.name);
        assert_eq!(target.item, results[1].restaurant.featured.name);

        let target = resolve_add("add 1", &results, &catalog).unwrap();
        assert_eq!(target.restaurant, results[0].restaurant.name);
    }

    #[test]
    fn positional_out_of_range_falls_through() {
        let catalog = seed_restaurants();
        // no remembered results: "#2" cannot resolve positionally
        assert_eq!(resolve_add("add #2", &[], &catalog), None);
    }

    #[test]
    fn restaurant_name_substring_resolves() {
        let catalog = seed_restaurants();
        let target = resolve_add("order from spice route please", &[], &catalog).unwrap();
        assert_eq!(target.restaurant, "Spice Route");
        assert_eq!(target.item, "Chicken Curry");
    }

    #[test]
    fn keyword_hints_resolve() {
        let catalog = seed_restaurants();
        let cases = [
            ("add a margherita", "Mario's Pizzeria"),
            ("order the caesar", "Green Garden"),
            ("buy me a chicken curry", "Spice Route"),
        ];
        for (text, want) in cases {
            let target = resolve_add(text, &[], &catalog).unwrap();
            assert_eq!(target.restaurant, want, "for {text:?}");
        }
    }

    #[test]
    fn unresolvable_add_returns_none() {
        let catalog = seed_restaurants();
        assert_eq!(resolve_add("add some sushi", &[], &catalog), None);
    }
}
