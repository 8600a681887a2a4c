//! Client for the account service.
//!
//! Talks to register.php, login.php, and me.php: JSON bodies, a
//! cookie-tracked session, structured error strings. Nothing in the
//! ordering pipeline depends on being signed in.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::json;

use crate::config::AuthSection;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Structured outcomes of register/login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Ok(UserProfile),
    InvalidInput,
    InvalidEmail,
    UsernameTaken,
    EmailTaken,
    NotFound,
    BadCredentials,
}

impl AuthOutcome {
    /// User-facing one-liner for each outcome.
    pub fn describe(&self) -> String {
        match self {
            AuthOutcome::Ok(user) => format!("Signed in as {}.", user.username),
            AuthOutcome::InvalidInput => {
                "Missing or invalid fields (password must be 6+ characters).".to_string()
            }
            AuthOutcome::InvalidEmail => "That email address doesn't look valid.".to_string(),
            AuthOutcome::UsernameTaken => "That username is taken.".to_string(),
            AuthOutcome::EmailTaken => "That email is already registered.".to_string(),
            AuthOutcome::NotFound => "No account with that username or email.".to_string(),
            AuthOutcome::BadCredentials => "Wrong password.".to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AuthOutcome::Ok(_))
    }
}

pub struct AuthClient {
    base_url: String,
    client: reqwest::Client,
}

impl AuthClient {
    pub fn new(cfg: &AuthSection) -> Result<Self> {
        // the service tracks the signed-in session with a cookie
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn register(
        &self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome> {
        let body = json!({
            "name": name,
            "username": username,
            "email": email,
            "password": password,
        });
        let raw = self.post("register.php", &body).await?;
        parse_outcome(&raw)
    }

    /// Sign in with a username or an email address.
    pub async fn login(&self, login: &str, password: &str) -> Result<AuthOutcome> {
        let body = json!({ "login": login, "password": password });
        let raw = self.post("login.php", &body).await?;
        parse_outcome(&raw)
    }

    /// The signed-in profile, or `None` without a live session cookie.
    pub async fn me(&self) -> Result<Option<UserProfile>> {
        let url = format!("{}/me.php", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("session check request")?;
        let raw = resp.text().await.context("read session check response")?;

        #[derive(Deserialize)]
        struct MeBody {
            auth: bool,
            #[serde(default)]
            user: Option<UserProfile>,
        }

        let body: MeBody = serde_json::from_str(&raw).context("parse session check response")?;
        Ok(if body.auth { body.user } else { None })
    }

    async fn post(&self, endpoint: &str, body: &serde_json::Value) -> Result<String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("request {endpoint}"))?;
        // error outcomes ride on 4xx statuses with JSON bodies, so read the
        // body regardless of status
        resp.text()
            .await
            .with_context(|| format!("read {endpoint} response"))
    }
}

/// Map a register/login response body onto an outcome.
fn parse_outcome(raw: &str) -> Result<AuthOutcome> {
    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        ok: bool,
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        email: Option<String>,
    }

    let body: Body = serde_json::from_str(raw).context("parse auth response")?;
    if body.ok {
        return Ok(AuthOutcome::Ok(UserProfile {
            name: body.name,
            username: body.username.unwrap_or_default(),
            email: body.email.unwrap_or_default(),
            created_at: None,
        }));
    }

    match body.error.as_deref() {
        Some("invalid_input") => Ok(AuthOutcome::InvalidInput),
        Some("invalid_email") => Ok(AuthOutcome::InvalidEmail),
        Some("username_taken") => Ok(AuthOutcome::UsernameTaken),
        Some("email_taken") => Ok(AuthOutcome::EmailTaken),
        Some("not_found") => Ok(AuthOutcome::NotFound),
        Some("bad_credentials") => Ok(AuthOutcome::BadCredentials),
        other => bail!("unexpected auth response: {other:?}"),
    }
}
