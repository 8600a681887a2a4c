//! nosh-core: the chat-intent-to-cart pipeline for Nosh Navigator.
//!
//! Pure, deterministic logic: free text -> parsed filter -> ranked
//! restaurants -> cart mutations. No I/O and no ambient clock; callers pass
//! `DateTime<Utc>` where freshness matters. Renderers (the chat TUI, the
//! one-shot CLI commands) and collaborators (location lookup, completion
//! proxy, account service) live in nosh-cli.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod filter;
pub mod geo;
pub mod intent;
pub mod ranking;
pub mod reveal;
pub mod session;

pub use cart::{CartLine, CartStore};
pub use catalog::{seed_restaurants, Cuisine, FeaturedItem, PriceLevel, Restaurant};
pub use checkout::{order_number, totals, Totals, DELIVERY_FEE, TAX_RATE};
pub use filter::SearchFilter;
pub use geo::{
    haversine_mi, CacheStore, CachedLocation, Coordinate, LocationCache, MemoryStore,
    LOCATION_TTL_MINUTES,
};
pub use intent::{classify, resolve_add, AddTarget, Intent};
pub use ranking::{rank, RankedResult, ETA_SENTINEL, MAX_RESULTS};
pub use reveal::RevealEffect;
pub use session::{
    format_distance, render_result, ChatSession, ChatTurn, Effect, Reply, Speaker,
    NO_MATCH_REPLY,
};
