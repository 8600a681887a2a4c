//! Client for the chat-completion proxy.
//!
//! POST /api/chat with role/content messages, `{ "text": ... }` back.
//! Callers substitute [`APOLOGY_REPLY`] for any failure; proxy trouble must
//! never surface as an error in the conversation.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use nosh_core::{ChatTurn, Speaker};

use crate::config::ApiSection;

/// Shown whenever the proxy cannot produce a reply.
pub const APOLOGY_REPLY: &str =
    "Sorry, I'm having trouble thinking right now. Please try again in a moment.";

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    text: Option<String>,
}

pub async fn chat_complete(api: &ApiSection, messages: &[ChatMessage]) -> Result<String> {
    let url = format!("{}/api/chat", api.base_url.trim_end_matches('/'));
    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .json(&ChatRequest { messages })
        .send()
        .await
        .context("completion proxy request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("completion proxy error: {status} {txt}");
    }

    let out: ChatResponse = resp.json().await.context("parse proxy response")?;
    let text = out.text.unwrap_or_default().trim().to_string();
    if text.is_empty() {
        bail!("completion proxy returned empty text");
    }
    Ok(text)
}

/// Synchronous wrapper for use inside the TUI event loop.
///
/// The CLI uses #[tokio::main], so we're usually already inside a runtime;
/// creating a nested runtime and calling block_on would panic. Reuse the
/// running handle when there is one.
pub fn chat_complete_blocking(api: &ApiSection, messages: &[ChatMessage]) -> Result<String> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        tokio::task::block_in_place(|| handle.block_on(chat_complete(api, messages)))
    } else {
        let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
        rt.block_on(chat_complete(api, messages))
    }
}

/// Convert recent session history into proxy messages, newest-last.
pub fn to_messages(history: &[ChatTurn], max_turns: usize) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(max_turns);
    history[start..]
        .iter()
        .map(|t| ChatMessage {
            role: match t.speaker {
                Speaker::User => "user",
                Speaker::Assistant => "assistant",
            }
            .to_string(),
            content: t.text.clone(),
        })
        .collect()
}
