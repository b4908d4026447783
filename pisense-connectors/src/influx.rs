//! InfluxDB 1.x connector over HTTP
//!
//! Each batch handed over by a poll loop becomes one
//! `POST {url}/write?db={database}&precision=ms` request carrying line
//! protocol. Points without a timestamp are stamped by the server on arrival.
//!
//! The connector is deliberately thin: one attempt per batch, no buffering.
//! A failed write comes back as a [`SinkError`] and the loop moves on.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info};
use serde::Deserialize;

use pisense_core::errors::SinkError;
use pisense_core::point::Point;
use pisense_core::traits::Sink;

use crate::line_protocol::encode_batch;
use crate::ConnectorError;

/// Timestamp precision sent with every write; points carry milliseconds
const PRECISION: &str = "ms";

/// Authentication methods
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InfluxAuth {
    /// No authentication
    #[default]
    None,
    /// HTTP basic authentication
    Basic { username: String, password: String },
    /// `Authorization: Token ...`
    Token { token: String },
}

impl InfluxAuth {
    /// Value of the `Authorization` header, if any
    fn header(&self) -> Option<String> {
        match self {
            InfluxAuth::None => None,
            InfluxAuth::Basic { username, password } => {
                let credentials = STANDARD.encode(format!("{}:{}", username, password));
                Some(format!("Basic {}", credentials))
            }
            InfluxAuth::Token { token } => Some(format!("Token {}", token)),
        }
    }
}

/// InfluxDB connection settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfluxConfig {
    /// Server base URL, e.g. `http://localhost:8086`
    pub url: String,
    /// Target database
    pub database: String,
    #[serde(default)]
    pub auth: InfluxAuth,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("PiSense/{}", env!("CARGO_PKG_VERSION"))
}

impl InfluxConfig {
    /// Create new configuration for a server and database
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            auth: InfluxAuth::None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Set basic authentication
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = InfluxAuth::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set token authentication
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.auth = InfluxAuth::Token { token: token.into() };
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check the settings before any request is made
    pub fn validate(&self) -> Result<(), ConnectorError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ConnectorError::Config("URL must start with http:// or https://".into()));
        }
        if self.database.is_empty() {
            return Err(ConnectorError::Config("database name must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConnectorError::Config("timeout must be at least one second".into()));
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), path)
    }
}

/// Sink writing points to InfluxDB
pub struct InfluxSink {
    config: InfluxConfig,
    agent: ureq::Agent,
}

impl InfluxSink {
    /// Create new InfluxDB sink
    pub fn new(config: InfluxConfig) -> Result<Self, ConnectorError> {
        config.validate()?;

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build();

        Ok(Self { config, agent })
    }

    pub fn config(&self) -> &InfluxConfig {
        &self.config
    }

    /// Create the target database
    ///
    /// The server treats this as a no-op when the database already exists.
    pub fn create_database(&self) -> Result<(), SinkError> {
        let query = format!("CREATE DATABASE \"{}\"", self.config.database.replace('"', "\\\""));
        let request = self.authorized(self.agent.post(&self.config.endpoint("query")));

        request.send_form(&[("q", query.as_str())]).map_err(map_error)?;
        info!("InfluxDB - database {} ready", self.config.database);
        Ok(())
    }

    fn authorized(&self, request: ureq::Request) -> ureq::Request {
        match self.config.auth.header() {
            Some(value) => request.set("Authorization", &value),
            None => request,
        }
    }
}

impl Sink for InfluxSink {
    fn write(&self, points: &[Point]) -> Result<(), SinkError> {
        if points.is_empty() {
            return Ok(());
        }

        let body = encode_batch(points)?;
        let request = self
            .authorized(self.agent.post(&self.config.endpoint("write")))
            .query("db", &self.config.database)
            .query("precision", PRECISION)
            .set("Content-Type", "text/plain; charset=utf-8");

        request.send_string(&body).map_err(map_error)?;
        debug!("InfluxDB - wrote {} points", points.len());
        Ok(())
    }
}

fn map_error(err: ureq::Error) -> SinkError {
    match err {
        ureq::Error::Status(status, response) => SinkError::Rejected {
            status,
            message: response.into_string().unwrap_or_default().trim().to_owned(),
        },
        ureq::Error::Transport(transport) => SinkError::Transport(transport.to_string()),
    }
}
