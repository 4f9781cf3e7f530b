//! Client for the remote scanning service.
//!
//! The service speaks JSON over HTTP POST. Scans are authenticated with
//! HTTP basic auth; account management calls are not.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::finding::FindingRecord;
use crate::task::TaskRecord;
use reqwest::blocking::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

pub const SCAN_PATH: &str = "/scan-tasks";
pub const REGISTER_PATH: &str = "/accounts/register";
pub const ACTIVATE_PATH: &str = "/accounts/activate";

pub const USERNAME_ENV: &str = "SCANNER_USERNAME";
pub const PASSWORD_ENV: &str = "SCANNER_PASSWORD";

/// Basic-auth credentials for the scanning service.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Reads [`USERNAME_ENV`] and [`PASSWORD_ENV`], prompting on the
    /// terminal for whichever is unset or empty. The password prompt does
    /// not echo.
    pub fn from_env_or_prompt() -> Result<Self> {
        let username = match env_value(USERNAME_ENV) {
            Some(username) => username,
            None => dialoguer::Input::<String>::new()
                .with_prompt("Username")
                .interact_text()?,
        };
        let password = match env_value(PASSWORD_ENV) {
            Some(password) => password,
            None => prompt_password()?,
        };
        Ok(Credentials { username, password })
    }
}

/// Prompts for a password without echoing it.
pub fn prompt_password() -> Result<String> {
    Ok(dialoguer::Password::new().with_prompt("Password").interact()?)
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[derive(serde::Deserialize)]
struct MessageResponse {
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ActivateRequest<'a> {
    username: &'a str,
    verification_code: &'a str,
}

/// Blocking JSON client bound to one service endpoint.
pub struct Client {
    http: HttpClient,
    base_url: String,
    credentials: Option<Credentials>,
}

impl Client {
    /// Builds a client for `config.endpoint()` with the configured timeout.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("steampunk-scanner/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Client {
            http,
            base_url: config.endpoint().trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    /// Attaches basic-auth credentials to every request.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` as JSON to `path` and decodes the JSON answer.
    ///
    /// # Errors
    ///
    /// [`Error::RemoteCall`] for a non-success status, carrying the
    /// service's `msg` when the body has one. [`Error::Transport`] when the
    /// request fails or the answer cannot be decoded.
    pub fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");

        let mut request = self.http.post(&url).json(body);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<MessageResponse>()
                .ok()
                .and_then(|body| body.msg)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            return Err(Error::RemoteCall {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<R>()?)
    }

    /// Submits normalized tasks for scanning.
    ///
    /// Element *i* of the answer describes element *i* of `tasks`; the
    /// service must keep that order, nothing else ties the two together.
    pub fn scan_tasks(&self, tasks: &[TaskRecord]) -> Result<Vec<FindingRecord>> {
        self.post(SCAN_PATH, tasks)
    }

    /// Registers a new account and returns the service's message.
    pub fn register(&self, username: &str, password: &str) -> Result<String> {
        let response: MessageResponse =
            self.post(REGISTER_PATH, &RegisterRequest { username, password })?;
        Ok(response.msg.unwrap_or_default())
    }

    /// Activates a pending account and returns the service's message.
    pub fn activate(&self, username: &str, verification_code: &str) -> Result<String> {
        let response: MessageResponse = self.post(
            ACTIVATE_PATH,
            &ActivateRequest {
                username,
                verification_code,
            },
        )?;
        Ok(response.msg.unwrap_or_default())
    }
}
