//! Session-scoped conversation state and the intent router.
//!
//! All mutable chat state (cart, history, last results, turn counter) lives
//! on [`ChatSession`] rather than in module globals, so independent sessions
//! can coexist and a whole conversation can be driven synchronously in
//! tests. Renderers are collaborators: they pass text in, get a reply plus
//! an optional side effect back, and decide how to present both.

use crate::cart::CartStore;
use crate::catalog::{seed_restaurants, Restaurant};
use crate::filter;
use crate::geo::Coordinate;
use crate::intent::{self, Intent};
use crate::ranking::{self, RankedResult};

/// Side effects a renderer must apply after showing a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Navigate to the cart view.
    OpenCart,
    /// The conversation transcript was wiped.
    HistoryCleared,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub effect: Option<Effect>,
    /// Token for cancelling stale reveal effects from earlier turns.
    pub turn: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

pub const NO_MATCH_REPLY: &str =
    "I couldn't find a spot matching that. Try \"pizza\", \"salad\", or \"something spicy\".";

const CLARIFY_REPLY: &str =
    "Which one would you like? Say \"add #1\" after a search, or name the restaurant.";

const HELP_REPLY: &str = "Here's what I can do:\n\
- find food: \"cheapest italian\", \"fastest salad\", \"something spicy\"\n\
- add to your cart: \"add #1\" after a search, or \"order the caesar salad\"\n\
- \"show my cart\" to review your order\n\
- \"clear\" to start over";

pub struct ChatSession {
    catalog: Vec<Restaurant>,
    pub cart: CartStore,
    history: Vec<ChatTurn>,
    last_results: Vec<RankedResult>,
    turn: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_catalog(seed_restaurants())
    }

    pub fn with_catalog(catalog: Vec<Restaurant>) -> Self {
        Self {
            catalog,
            cart: CartStore::new(),
            history: Vec::new(),
            last_results: Vec::new(),
            turn: 0,
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn last_results(&self) -> &[RankedResult] {
        &self.last_results
    }

    /// The current turn token; increments on every processed message.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn catalog(&self) -> &[Restaurant] {
        &self.catalog
    }

    /// Route one user message. Never fails: every problem becomes a reply
    /// string (clarifying prompt, "no match", ...).
    pub fn process(&mut self, text: &str, location: Option<Coordinate>) -> Reply {
        self.turn += 1;
        self.history.push(ChatTurn {
            speaker: Speaker::User,
            text: text.to_string(),
        });

        let (text, effect) = match intent::classify(text) {
            Intent::ClearHistory => {
                self.history.clear();
                self.last_results.clear();
                (
                    "Conversation cleared. What are you hungry for?".to_string(),
                    Some(Effect::HistoryCleared),
                )
            }
            Intent::Help => (HELP_REPLY.to_string(), None),
            Intent::ViewCart => ("Opening your cart now.".to_string(), Some(Effect::OpenCart)),
            Intent::AddToCart => {
                match intent::resolve_add(text, &self.last_results, &self.catalog) {
                    Some(target) => {
                        self.cart.add(&target.restaurant, &target.item, target.price);
                        (
                            format!("Added {} from {} to your cart!", target.item, target.restaurant),
                            None,
                        )
                    }
                    None => (CLARIFY_REPLY.to_string(), None),
                }
            }
            Intent::Search => (self.run_search(text, location), None),
        };

        self.history.push(ChatTurn {
            speaker: Speaker::Assistant,
            text: text.clone(),
        });

        Reply {
            text,
            effect,
            turn: self.turn,
        }
    }

    fn run_search(&mut self, text: &str, location: Option<Coordinate>) -> String {
        let parsed = filter::parse(text);
        let results = ranking::rank(&self.catalog, &parsed, location);
        if results.is_empty() {
            self.last_results.clear();
            return NO_MATCH_REPLY.to_string();
        }

        let lines: Vec<String> = results
            .iter()
            .enumerate()
            .map(|(i, r)| render_result(i + 1, r))
            .collect();
        self.last_results = results;
        lines.join("\n")
    }
}

/// One result line: position, name, cuisines, price level, rating, ETA,
/// distance (em dash when unknown), and the featured-item prompt.
pub fn render_result(position: usize, result: &RankedResult) -> String {
    let r = &result.restaurant;
    let cuisines = r
        .cuisines
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "{}. {} ({}) {} · ⭐ {} · {} · {} · try the {} (${:.2})",
        position,
        r.name,
        cuisines,
        r.price.symbol(),
        r.rating,
        r.eta,
        format_distance(result.distance_mi),
        r.featured.name,
        r.featured.price,
    )
}

/// "0.42 mi" under a mile, "3.1 mi" above, "—" when unknown.
pub fn format_distance(distance_mi: Option<f64>) -> String {
    match distance_mi {
        Some(d) if d < 1.0 => format!("{d:.2} mi"),
        Some(d) => format!("{d:.1} mi"),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> Coordinate {
        Coordinate::new(37.783, -122.41)
    }

    #[test]
    fn search_renders_one_line_per_result() {
        let mut session = ChatSession::new();
        let reply = session.process("where can i eat", Some(here()));
        assert_eq!(reply.text.lines().count(), 3);
        assert!(reply.text.starts_with("1. Green Garden"));
        assert!(reply.text.contains("mi"));
        assert_eq!(reply.effect, None);
        assert_eq!(session.last_results().len(), 3);
    }

    #[test]
    fn search_without_location_shows_placeholder() {
        let mut session = ChatSession::new();
        let reply = session.process("pizza", None);
        assert!(reply.text.contains("—"));
    }

    /// Regression test: search then "add #2" adds the second result's
    /// featured item.
    #[test]
    fn positional_add_after_search() {
        let mut session = ChatSession::new();
        session.process("show me dinner options", None);
        let second = session.last_results()[1].restaurant.clone();

        let reply = session.process("add #2", None);
        assert!(reply.text.contains(&second.featured.name));
        assert_eq!(session.cart.lines().len(), 1);
        assert_eq!(session.cart.lines()[0].restaurant, second.name);
    }

    #[test]
    fn unresolvable_add_asks_for_clarification() {
        let mut session = ChatSession::new();
        let reply = session.process("add some sushi", None);
        assert_eq!(reply.text, CLARIFY_REPLY);
        assert!(session.cart.is_empty());
    }

    #[test]
    fn no_match_search_replies_without_results() {
        let mut session = ChatSession::new();
        session.process("anything good", None);
        assert!(!session.last_results().is_empty());

        // Pizza-only cuisine plus a spice preference matches nothing
        let reply = session.process("pizza with heat", None);
        assert_eq!(reply.text, NO_MATCH_REPLY);
        assert!(session.last_results().is_empty());
    }

    /// Regression test: "clear" resets conversation state regardless of
    /// prior content.
    #[test]
    fn clear_wipes_history_and_results() {
        let mut session = ChatSession::new();
        session.process("salad", Some(here()));
        session.process("add #1", None);
        assert!(!session.history().is_empty());

        let reply = session.process("clear", None);
        assert_eq!(reply.effect, Some(Effect::HistoryCleared));
        assert!(session.last_results().is_empty());
        // only the acknowledgement survives
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].speaker, Speaker::Assistant);
        // the cart is not conversation state
        assert_eq!(session.cart.lines().len(), 1);
    }

    #[test]
    fn cart_request_emits_navigation_effect() {
        let mut session = ChatSession::new();
        let reply = session.process("show my cart", None);
        assert_eq!(reply.effect, Some(Effect::OpenCart));
    }

    #[test]
    fn help_lists_capabilities() {
        let mut session = ChatSession::new();
        let reply = session.process("what can you do", None);
        assert!(reply.text.contains("add #1"));
        assert!(reply.text.contains("clear"));
    }

    #[test]
    fn turn_token_increments_every_message() {
        let mut session = ChatSession::new();
        assert_eq!(session.process("pizza", None).turn, 1);
        assert_eq!(session.process("clear", None).turn, 2);
        assert_eq!(session.process("help", None).turn, 3);
    }
}
