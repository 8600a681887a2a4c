//! Cart line items and subtotal math.

use serde::{Deserialize, Serialize};

/// One cart row. Quantity is always >= 1 while the line exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: u64,
    pub restaurant: String,
    pub item: String,
    pub price: f64,
    pub quantity: u32,
}

/// Ordered cart contents.
///
/// Invariant: no two lines share the same (restaurant, item) pair; repeat
/// adds increment the existing line instead.
#[derive(Debug, Default, Clone)]
pub struct CartStore {
    lines: Vec<CartLine>,
    next_id: u64,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of an item. Returns the id of the affected line.
    pub fn add(&mut self, restaurant: &str, item: &str, price: f64) -> u64 {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.restaurant == restaurant && l.item == item)
        {
            line.quantity += 1;
            return line.id;
        }

        self.next_id += 1;
        self.lines.push(CartLine {
            id: self.next_id,
            restaurant: restaurant.to_string(),
            item: item.to_string(),
            price,
            quantity: 1,
        });
        self.next_id
    }

    /// Delete a line; unknown ids are a no-op.
    pub fn remove(&mut self, id: u64) {
        self.lines.retain(|l| l.id != id);
    }

    /// Adjust a line's quantity by `delta`; dropping to zero or below
    /// removes the line.
    pub fn update_quantity(&mut self, id: u64, delta: i32) {
        let Some(idx) = self.lines.iter().position(|l| l.id == id) else {
            return;
        };
        let quantity = i64::from(self.lines[idx].quantity) + i64::from(delta);
        if quantity <= 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = quantity as u32;
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.price * f64::from(l.quantity))
            .sum()
    }

    /// Total units across all lines (the cart badge number).
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Empty the cart (after checkout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
