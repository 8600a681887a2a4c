//! Interactive ordering chat (ratatui).
//!
//! The TUI is a renderer over `nosh_core::ChatSession`: it forwards
//! messages, applies side effects (cart view, history wipe), and plays the
//! typewriter reveal. A new turn always cancels an in-flight reveal via the
//! session's turn token.

use anyhow::Result;
use chrono::Datelike;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use std::io::{self, Stdout};
use std::path::PathBuf;

use nosh_core::{checkout, ChatSession, Coordinate, Effect, RevealEffect};

use crate::api;
use crate::config::Config;

#[derive(Clone, Debug)]
struct Msg {
    role: Role,
    content: String,
}

#[derive(Clone, Debug, PartialEq)]
enum Role {
    User,
    Assistant,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum View {
    Conversation,
    Cart,
}

struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    fn open_today() -> Result<Self> {
        let dir = crate::state::chat_dir()?;
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let path = dir.join(format!("{today}.md"));
        Ok(Self { path })
    }

    fn append_system(&mut self, msg: &str) -> Result<()> {
        self.append("system", msg)
    }

    fn append_user(&mut self, msg: &str) -> Result<()> {
        self.append("user", msg)
    }

    fn append_assistant(&mut self, msg: &str) -> Result<()> {
        self.append("assistant", msg)
    }

    fn append(&mut self, role: &str, msg: &str) -> Result<()> {
        use std::io::Write;
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            f,
            "- {} [{}] {}",
            chrono::Utc::now().to_rfc3339(),
            role,
            msg.replace('\n', " ")
        )?;
        Ok(())
    }
}

pub async fn run_chat(cfg: &Config) -> Result<()> {
    // Resolve once up front; the lookup is bounded and a miss just means
    // distance-less results.
    let location = crate::location::resolve(cfg).await;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = chat_loop(&mut terminal, cfg, location);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn chat_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cfg: &Config,
    location: Option<Coordinate>,
) -> Result<()> {
    let mut session = ChatSession::new();
    let mut messages: Vec<Msg> = vec![Msg {
        role: Role::Assistant,
        content: "Hey! I'm Nosh. Tell me what you're craving, or ask \"what can you do\"."
            .to_string(),
    }];

    let mut input = String::new();
    let mut view = View::Conversation;
    let mut reveal: Option<RevealEffect> = None;
    let mut show_help = true;

    let mut log = ChatLog::open_today()?;
    log.append_system("session_start")?;

    loop {
        // Advance the typewriter before drawing; a stale or finished effect
        // drops out and the full message shows from `messages`.
        if let Some(fx) = reveal.as_mut() {
            if fx.step(session.turn()).is_none() {
                reveal = None;
            }
        }

        terminal.draw(|f| {
            let size = f.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(5),
                    Constraint::Min(5),
                    Constraint::Length(3),
                ])
                .split(size);

            let splash = Paragraph::new(Text::from(vec![
                Line::from(Span::styled(
                    "Nosh Navigator",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::raw("")),
                Line::from(Span::styled(
                    ">_ nosh chat",
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(Span::styled(
                    "type ? for shortcuts",
                    Style::default().fg(Color::Gray),
                )),
            ]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(splash, chunks[0]);

            let body = match view {
                View::Conversation => {
                    conversation_lines(&messages, reveal.as_ref(), show_help)
                }
                View::Cart => cart_lines(&session),
            };
            let title = match view {
                View::Conversation => "conversation",
                View::Cart => "your cart (Esc to go back)",
            };
            let history = Paragraph::new(Text::from(body))
                .block(Block::default().borders(Borders::ALL).title(title))
                .wrap(Wrap { trim: false });
            f.render_widget(history, chunks[1]);

            let input_widget = Paragraph::new(input.as_str())
                .block(Block::default().borders(Borders::ALL).title("message"))
                .style(Style::default().fg(Color::White));
            f.render_widget(input_widget, chunks[2]);
        })?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => match view {
                        View::Cart => view = View::Conversation,
                        View::Conversation => break,
                    },
                    KeyCode::Char('?') if input.is_empty() => {
                        show_help = !show_help;
                    }
                    KeyCode::Enter => {
                        let trimmed = input.trim().to_string();
                        input.clear();
                        if trimmed.is_empty() {
                            continue;
                        }

                        if let Some(outcome) = handle_slash(&trimmed, &mut session) {
                            match outcome {
                                SlashOutcome::Quit => break,
                                SlashOutcome::OpenCart => view = View::Cart,
                                SlashOutcome::Reply(reply) => {
                                    log.append_assistant(&reply)?;
                                    messages.push(Msg {
                                        role: Role::Assistant,
                                        content: reply,
                                    });
                                }
                            }
                            continue;
                        }

                        log.append_user(&trimmed)?;
                        messages.push(Msg {
                            role: Role::User,
                            content: trimmed.clone(),
                        });

                        let reply = session.process(&trimmed, location);

                        // Deterministic routing first; the remote proxy only
                        // fields queries the catalog had no answer for, and
                        // any proxy trouble becomes the apology string.
                        let text = if reply.text == nosh_core::NO_MATCH_REPLY && cfg.api.enabled {
                            let context =
                                api::to_messages(session.history(), cfg.chat.max_turns_context);
                            api::chat_complete_blocking(&cfg.api, &context)
                                .unwrap_or_else(|_| api::APOLOGY_REPLY.to_string())
                        } else {
                            reply.text.clone()
                        };

                        match reply.effect {
                            Some(Effect::OpenCart) => view = View::Cart,
                            Some(Effect::HistoryCleared) => messages.clear(),
                            None => {}
                        }

                        log.append_assistant(&text)?;
                        reveal = Some(RevealEffect::new(
                            reply.turn,
                            text.clone(),
                            cfg.chat.reveal_chars_per_tick,
                        ));
                        messages.push(Msg {
                            role: Role::Assistant,
                            content: text,
                        });
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                    }
                    _ => {}
                }
            }
        }
    }

    log.append_system("session_end")?;
    Ok(())
}

enum SlashOutcome {
    Reply(String),
    OpenCart,
    Quit,
}

fn handle_slash(input: &str, session: &mut ChatSession) -> Option<SlashOutcome> {
    if !input.starts_with('/') {
        return None;
    }
    Some(match input {
        "/help" => SlashOutcome::Reply(
            "Commands:\n\
- /cart (review your order)\n\
- /checkout (pay and clear the cart)\n\
- /quit\n\
\nOr just talk: \"cheapest italian\", \"add #1\", \"show my cart\", \"clear\"."
                .to_string(),
        ),
        "/cart" => SlashOutcome::OpenCart,
        "/checkout" => SlashOutcome::Reply(checkout_reply(session)),
        "/quit" => SlashOutcome::Quit,
        _ => SlashOutcome::Reply("Unknown command. Try /help".to_string()),
    })
}

fn checkout_reply(session: &mut ChatSession) -> String {
    if session.cart.is_empty() {
        return "Your cart is empty. Search for something tasty first!".to_string();
    }
    let totals = checkout::totals(session.cart.subtotal());
    let number = checkout::order_number(chrono::Local::now().year(), rand::random::<u32>());
    session.cart.clear();
    format!(
        "Payment processed! Order {} confirmed, ${:.2} paid. Your food is on the way.",
        number, totals.total
    )
}

fn conversation_lines<'a>(
    messages: &'a [Msg],
    reveal: Option<&'a RevealEffect>,
    show_help: bool,
) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = Vec::new();
    if show_help {
        lines.push(Line::from(Span::styled(
            "Shortcuts: Enter=send, Esc=quit, ?=toggle help",
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::raw("Commands: /help /cart /checkout /quit"));
        lines.push(Line::raw(""));
    }

    let last_idx = messages.len().saturating_sub(1);
    for (i, m) in messages.iter().enumerate() {
        let (tag, color) = match m.role {
            Role::User => ("you", Color::Cyan),
            Role::Assistant => ("nosh", Color::Green),
        };

        // The newest assistant message types itself out.
        let content = match reveal {
            Some(fx) if i == last_idx && m.role == Role::Assistant => fx.visible(),
            _ => m.content.as_str(),
        };

        for (j, part) in content.split('\n').enumerate() {
            if j == 0 {
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", tag), Style::default().fg(color)),
                    Span::raw(part.to_string()),
                ]));
            } else {
                lines.push(Line::raw(part.to_string()));
            }
        }
        lines.push(Line::raw(""));
    }
    lines
}

fn cart_lines(session: &ChatSession) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    if session.cart.is_empty() {
        lines.push(Line::raw("Your cart is empty."));
        lines.push(Line::raw(""));
        lines.push(Line::raw("Try: \"add #1\" after a search, or /help."));
        return lines;
    }

    for item in session.cart.lines() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} x{}", item.item, item.quantity),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  ({})  ${:.2}",
                item.restaurant,
                item.price * f64::from(item.quantity)
            )),
        ]));
    }

    let totals = checkout::totals(session.cart.subtotal());
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!("Subtotal      ${:.2}", totals.subtotal)));
    lines.push(Line::raw(format!("Delivery fee  ${:.2}", totals.delivery_fee)));
    lines.push(Line::raw(format!("Tax           ${:.2}", totals.tax)));
    lines.push(Line::from(Span::styled(
        format!("Total         ${:.2}", totals.total),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::raw("/checkout to pay, Esc to keep browsing."));
    lines
}
