//! Seed restaurant catalog.
//!
//! Read-only demo data: three San Francisco restaurants with one featured
//! menu item each. The pipeline never mutates these records.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cuisine tags carried by restaurants and search filters.
///
/// `Salads` is a display-only alias: it canonicalizes to `Healthy` for
/// matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cuisine {
    Italian,
    Pizza,
    Indian,
    Healthy,
    Salads,
    Spicy,
}

impl Cuisine {
    /// The tag used for matching.
    pub fn canonical(self) -> Cuisine {
        match self {
            Cuisine::Salads => Cuisine::Healthy,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cuisine::Italian => "Italian",
            Cuisine::Pizza => "Pizza",
            Cuisine::Indian => "Indian",
            Cuisine::Healthy => "Healthy",
            Cuisine::Salads => "Salads",
            Cuisine::Spicy => "Spicy",
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Three-level price scale, ordered cheap < moderate < premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceLevel {
    Cheap,
    Moderate,
    Premium,
}

impl PriceLevel {
    pub fn symbol(self) -> &'static str {
        match self {
            PriceLevel::Cheap => "$",
            PriceLevel::Moderate => "$$",
            PriceLevel::Premium => "$$$",
        }
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The single promoted menu item on a restaurant card; also the default
/// add-to-cart target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedItem {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: u32,
    pub name: String,
    pub cuisines: Vec<Cuisine>,
    pub price: PriceLevel,
    /// 0-5 stars.
    pub rating: f64,
    /// Delivery window as shown to users, e.g. "25-35 min".
    pub eta: String,
    pub position: Coordinate,
    pub featured: FeaturedItem,
}

impl Restaurant {
    /// Cuisine match on canonical tags, so "salad" queries hit `Salads`.
    pub fn has_cuisine(&self, tag: Cuisine) -> bool {
        let want = tag.canonical();
        self.cuisines.iter().any(|c| c.canonical() == want)
    }
}

/// The demo seed data.
pub fn seed_restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant {
            id: 1,
            name: "Mario's Pizzeria".to_string(),
            cuisines: vec![Cuisine::Italian, Cuisine::Pizza],
            price: PriceLevel::Moderate,
            rating: 4.8,
            eta: "25-35 min".to_string(),
            position: Coordinate::new(37.781, -122.41),
            featured: FeaturedItem {
                name: "Margherita Pizza".to_string(),
                price: 18.99,
            },
        },
        Restaurant {
            id: 2,
            name: "Green Garden".to_string(),
            cuisines: vec![Cuisine::Healthy, Cuisine::Salads],
            price: PriceLevel::Premium,
            rating: 4.9,
            eta: "15-25 min".to_string(),
            position: Coordinate::new(37.786, -122.407),
            featured: FeaturedItem {
                name: "Caesar Salad".to_string(),
                price: 14.99,
            },
        },
        Restaurant {
            id: 3,
            name: "Spice Route".to_string(),
            cuisines: vec![Cuisine::Indian, Cuisine::Spicy],
            price: PriceLevel::Cheap,
            rating: 4.6,
            eta: "30-40 min".to_string(),
            position: Coordinate::new(37.776, -122.415),
            featured: FeaturedItem {
                name: "Chicken Curry".to_string(),
                price: 12.99,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_catalog_shape() {
        let seeds = seed_restaurants();
        assert_eq!(seeds.len(), 3);
        assert!(seeds.iter().all(|r| !r.cuisines.is_empty()));
        assert!(seeds.iter().all(|r| r.rating > 0.0 && r.rating <= 5.0));
        assert!(seeds.iter().all(|r| r.featured.price > 0.0));
    }

    #[test]
    fn salads_canonicalizes_to_healthy() {
        let seeds = seed_restaurants();
        let garden = &seeds[1];
        assert!(garden.has_cuisine(Cuisine::Healthy));
        assert!(garden.has_cuisine(Cuisine::Salads));
        assert!(!garden.has_cuisine(Cuisine::Pizza));
    }

    #[test]
    fn price_levels_are_ordered() {
        assert!(PriceLevel::Cheap < PriceLevel::Moderate);
        assert!(PriceLevel::Moderate < PriceLevel::Premium);
        assert_eq!(PriceLevel::Premium.symbol(), "$$$");
    }
}
