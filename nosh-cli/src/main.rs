use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

mod api;
mod auth;
mod chat;
mod config;
mod location;
mod state;
mod term;

use nosh_core::{filter, haversine_mi, ranking, seed_restaurants, session, Coordinate};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "nosh", version, about = "Nosh Navigator terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive ordering chat
    Chat,

    /// One-shot search against the restaurant catalog
    Search {
        /// Free-text query, e.g. "cheapest italian"
        query: Vec<String>,
    },

    /// List the restaurants nearby with distances
    Nearby,

    /// Show the resolved device location, or pin one
    Locate {
        /// Pin a manual coordinate, e.g. --set 37.781,-122.41
        #[arg(long)]
        set: Option<String>,
    },

    /// Account service commands
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Write the default config to ~/.nosh/config.toml
    Init,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Create an account (password is read from stdin)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },

    /// Sign in with a username or email (password is read from stdin)
    Login { login: String },

    /// Show the signed-in profile, if any
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    match cli.command {
        Command::Chat => chat::run_chat(&cfg).await?,
        Command::Search { query } => run_search(&cfg, &query.join(" ")).await?,
        Command::Nearby => run_nearby(&cfg).await?,
        Command::Locate { set } => run_locate(&cfg, set).await?,
        Command::Auth { command } => run_auth(&cfg, command).await?,
        Command::Init => config::init_config()?,
    }

    Ok(())
}

async fn run_search(cfg: &Config, query: &str) -> Result<()> {
    if query.trim().is_empty() {
        bail!("empty query (try: nosh search cheapest italian)");
    }

    let location = location::resolve(cfg).await;
    if location.is_none() {
        term::info("No location available; distances hidden.");
    }

    let parsed = filter::parse(query);
    let results = ranking::rank(&seed_restaurants(), &parsed, location);
    if results.is_empty() {
        term::info(nosh_core::NO_MATCH_REPLY);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!("{}", session::render_result(i + 1, result));
    }
    Ok(())
}

async fn run_nearby(cfg: &Config) -> Result<()> {
    let location = location::resolve(cfg).await;
    match location {
        Some(c) => term::success(format!("Showing distances from {:.3},{:.3}", c.lat, c.lng)),
        None => term::info("Location unavailable; showing the default area."),
    }

    for r in seed_restaurants() {
        let distance = location.map(|loc| haversine_mi(loc, r.position));
        let cuisines = r
            .cuisines
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join("/");
        println!(
            "{} ({}) {} · ⭐ {} · {} · {} · {} ${:.2}",
            r.name,
            cuisines,
            r.price.symbol(),
            r.rating,
            r.eta,
            session::format_distance(distance),
            r.featured.name,
            r.featured.price,
        );
    }
    Ok(())
}

async fn run_locate(cfg: &Config, set: Option<String>) -> Result<()> {
    if let Some(raw) = set {
        let coord = Coordinate::parse(&raw).context("parse --set")?;
        location::pin(coord)?;
        term::success(format!("Pinned location {:.3},{:.3}", coord.lat, coord.lng));
        return Ok(());
    }

    match location::resolve(cfg).await {
        Some(c) => term::success(format!("Current location: {:.4},{:.4}", c.lat, c.lng)),
        None => term::error(
            "Could not access a location. Pin one with: nosh locate --set LAT,LNG",
        ),
    }
    Ok(())
}

async fn run_auth(cfg: &Config, command: AuthCommand) -> Result<()> {
    let client = auth::AuthClient::new(&cfg.auth)?;

    match command {
        AuthCommand::Register {
            name,
            username,
            email,
        } => {
            let password = prompt_password("Choose a password")?;
            let outcome = client.register(&name, &username, &email, &password).await?;
            if outcome.is_ok() {
                term::success(format!("Account created. Welcome, {username}!"));
            } else {
                term::error(outcome.describe());
            }
        }

        AuthCommand::Login { login } => {
            let password = prompt_password("Password")?;
            let outcome = client.login(&login, &password).await?;
            if outcome.is_ok() {
                term::success(outcome.describe());
            } else {
                term::error(outcome.describe());
            }
        }

        AuthCommand::Whoami => match client.me().await? {
            Some(user) => {
                let name = user.name.as_deref().unwrap_or(&user.username);
                term::success(format!("{} <{}>", name, user.email));
            }
            None => term::info("Not signed in."),
        },
    }
    Ok(())
}

fn prompt_password(label: &str) -> Result<String> {
    use std::io::Write;

    print!("{label}: ");
    std::io::stdout().flush().context("flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("read password")?;
    let password = line.trim().to_string();
    if password.is_empty() {
        bail!("empty password");
    }
    Ok(password)
}
