//! Typewriter reveal for assistant replies.
//!
//! The session's turn counter doubles as a cancellation token: a reveal
//! created for turn N goes permanently quiet once the conversation moves
//! past N. The effect owns no timer; the renderer drives `step` on its own
//! cadence.

#[derive(Debug, Clone)]
pub struct RevealEffect {
    turn: u64,
    text: String,
    total_chars: usize,
    shown_chars: usize,
    chars_per_tick: usize,
}

impl RevealEffect {
    pub fn new(turn: u64, text: impl Into<String>, chars_per_tick: usize) -> Self {
        let text = text.into();
        Self {
            turn,
            total_chars: text.chars().count(),
            text,
            shown_chars: 0,
            chars_per_tick: chars_per_tick.max(1),
        }
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn is_done(&self) -> bool {
        self.shown_chars >= self.total_chars
    }

    /// Advance one tick and return the visible prefix. `None` when the
    /// token is stale or the text is already fully revealed.
    pub fn step(&mut self, current_turn: u64) -> Option<&str> {
        if current_turn != self.turn || self.is_done() {
            return None;
        }
        self.shown_chars = (self.shown_chars + self.chars_per_tick).min(self.total_chars);
        Some(self.visible())
    }

    /// The currently revealed prefix (on a char boundary).
    pub fn visible(&self) -> &str {
        match self.text.char_indices().nth(self.shown_chars) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }
}
