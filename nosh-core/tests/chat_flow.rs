//! End-to-end conversation: search, add by position, review, checkout.

use nosh_core::{checkout, ChatSession, Coordinate, Effect};

fn downtown() -> Coordinate {
    Coordinate::new(37.783, -122.41)
}

/// Drive a whole ordering conversation through one session.
#[test]
fn full_ordering_conversation() {
    let mut session = ChatSession::new();

    // 1. Search with a location: three ranked lines, best rating first.
    let reply = session.process("what's good around here", Some(downtown()));
    assert_eq!(reply.text.lines().count(), 3);
    assert!(reply.text.starts_with("1. Green Garden"));
    assert_eq!(reply.turn, 1);

    // 2. Add the second result twice; quantities merge.
    let second = session.last_results()[1].restaurant.clone();
    session.process("add #2", None);
    let reply = session.process("add #2", None);
    assert!(reply.text.contains(&second.featured.name));
    assert_eq!(session.cart.lines().len(), 1);
    assert_eq!(session.cart.lines()[0].quantity, 2);

    // 3. A narrower search replaces the remembered results.
    let reply = session.process("fastest salad", Some(downtown()));
    assert!(reply.text.contains("Green Garden"));
    assert_eq!(session.last_results().len(), 1);

    let reply = session.process("add #1", None);
    assert!(reply.text.contains("Caesar Salad"));
    assert_eq!(session.cart.lines().len(), 2);

    // 4. Review the cart.
    let reply = session.process("show my cart", None);
    assert_eq!(reply.effect, Some(Effect::OpenCart));

    let subtotal = session.cart.subtotal();
    assert!((subtotal - (2.0 * second.featured.price + 14.99)).abs() < 1e-9);

    // 5. Checkout math and the post-payment clear.
    let totals = checkout::totals(subtotal);
    assert_eq!(totals.delivery_fee, 2.99);
    assert!((totals.total - (subtotal + 2.99 + subtotal * 0.08875)).abs() < 1e-9);

    session.cart.clear();
    assert!(session.cart.is_empty());
    assert_eq!(checkout::totals(session.cart.subtotal()).total, 0.0);
}

/// A location-less session works end to end; distance renders as a dash.
#[test]
fn conversation_without_location() {
    let mut session = ChatSession::new();

    let reply = session.process("indian food", None);
    assert!(reply.text.starts_with("1. Spice Route"));
    assert!(reply.text.contains("—"));

    let reply = session.process("add the chicken curry", None);
    assert!(reply.text.contains("Spice Route"));
    assert_eq!(session.cart.item_count(), 1);
}

/// Clearing mid-conversation drops the positional anchor for adds.
#[test]
fn clear_forgets_search_results() {
    let mut session = ChatSession::new();
    session.process("pizza", None);
    assert!(!session.last_results().is_empty());

    session.process("clear", None);

    // "#1" can no longer resolve positionally, and "1" names no restaurant.
    let reply = session.process("add #1", None);
    assert!(session.cart.is_empty(), "unexpected add: {}", reply.text);
}
