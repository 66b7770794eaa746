//! Gateway environment and client configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::{ApnsError, Result};

/// APNS environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Development/sandbox environment.
    Sandbox,
    /// Production environment.
    Production,
}

impl Environment {
    /// Gateway base URL.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api.development.push.apple.com",
            Self::Production => "https://api.push.apple.com",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => f.write_str("sandbox"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// `0` is the sandbox, `1` production.
impl TryFrom<u8> for Environment {
    type Error = ApnsError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Sandbox),
            1 => Ok(Self::Production),
            other => Err(ApnsError::invalid(format!(
                "Environment must be one of production or sandbox, got {other}"
            ))),
        }
    }
}

impl FromStr for Environment {
    type Err = ApnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" | "development" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(ApnsError::invalid(format!(
                "Environment must be one of production or sandbox, got '{other}'"
            ))),
        }
    }
}

impl TryFrom<&str> for Environment {
    type Error = ApnsError;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Verify the gateway's certificate chain. Off by default.
    pub verify_peer: bool,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Gateway port (443 or 2197).
    pub port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            verify_peer: false,
            user_agent: format!("apns-client/{}", env!("CARGO_PKG_VERSION")),
            port: 443,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load overrides from `APNS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through `lookup`.
    ///
    /// Recognised keys: `APNS_TIMEOUT_SECS`, `APNS_VERIFY_PEER`,
    /// `APNS_USER_AGENT`, `APNS_PORT`. Missing keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(secs) = lookup("APNS_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_var("APNS_TIMEOUT_SECS", &secs)?);
        }
        if let Some(verify) = lookup("APNS_VERIFY_PEER") {
            config.verify_peer = parse_bool("APNS_VERIFY_PEER", &verify)?;
        }
        if let Some(agent) = lookup("APNS_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(port) = lookup("APNS_PORT") {
            config.port = parse_var("APNS_PORT", &port)?;
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ApnsError::invalid(format!("{key} has an invalid value: '{value}'")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ApnsError::invalid(format!(
            "{key} has an invalid value: '{value}'"
        ))),
    }
}

/// Builder for client configuration.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Enable or disable gateway certificate verification.
    pub fn verify_peer(mut self, verify: bool) -> Self {
        self.config.verify_peer = verify;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the gateway port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
