//! Notification message model.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, TimeZone};
use serde_json::{Map, Value};

use crate::payload::{self, APS_KEY};
use crate::{Alert, ApnsError, Result};

/// Length of a device token in hex characters.
pub const TOKEN_LENGTH: usize = 64;

/// A notification addressed to one device of one application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    id: Option<String>,
    bundle_id: Option<String>,
    token: Option<String>,
    expire: Option<i64>,
    alert: Option<Alert>,
    badge: Option<u32>,
    sound: Option<String>,
    mutable_content: Option<i64>,
    content_available: Option<i64>,
    category: Option<String>,
    url_args: Option<Vec<String>>,
    custom: Option<Map<String, Value>>,
}

impl Message {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Correlation identifier.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Set the correlation identifier.
    ///
    /// When it is a UUID it is also sent as the `apns-id` request header.
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    /// Bundle identifier of the receiving application.
    pub fn bundle_id(&self) -> Option<&str> {
        self.bundle_id.as_deref()
    }

    /// Set the bundle identifier (the request topic).
    pub fn set_bundle_id(&mut self, bundle_id: impl Into<String>) -> Result<&mut Self> {
        let bundle_id = bundle_id.into();
        if bundle_id.is_empty() {
            return Err(ApnsError::invalid("App Bundle Id must not be an empty string"));
        }
        self.bundle_id = Some(bundle_id);
        Ok(self)
    }

    /// Device token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Set the device token: exactly 64 hex characters, any case.
    pub fn set_token(&mut self, token: impl Into<String>) -> Result<&mut Self> {
        let token = token.into();
        if !token.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ApnsError::invalid(format!(
                "Device token must only contain hexadecimal characters. Token given: \"{token}\""
            )));
        }
        if token.len() != TOKEN_LENGTH {
            return Err(ApnsError::invalid(format!(
                "Device token must be {TOKEN_LENGTH} characters, token length given: {}",
                token.len()
            )));
        }
        self.token = Some(token);
        Ok(self)
    }

    /// Expiration as Unix seconds.
    pub fn expire(&self) -> Option<i64> {
        self.expire
    }

    /// Set the expiration from an instant or a Unix timestamp.
    pub fn set_expire(&mut self, expire: impl IntoExpiration) -> Result<&mut Self> {
        self.expire = Some(expire.into_unix_seconds()?);
        Ok(self)
    }

    /// Alert content.
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Set or clear the alert. A plain string becomes an alert with that body.
    pub fn set_alert<A: Into<Alert>>(&mut self, alert: Option<A>) -> &mut Self {
        self.alert = alert.map(Into::into);
        self
    }

    /// Badge count.
    pub fn badge(&self) -> Option<u32> {
        self.badge
    }

    /// Set the badge.
    ///
    /// Only `None` is accepted; every count, zero included, is rejected.
    pub fn set_badge(&mut self, badge: Option<u32>) -> Result<&mut Self> {
        if badge.is_some() {
            return Err(ApnsError::invalid("Badge must be null"));
        }
        self.badge = None;
        Ok(self)
    }

    /// Sound name.
    pub fn sound(&self) -> Option<&str> {
        self.sound.as_deref()
    }

    /// Set the sound name.
    pub fn set_sound(&mut self, sound: Option<&str>) -> Result<&mut Self> {
        if sound == Some("") {
            return Err(ApnsError::invalid("Sound must be null or a non empty string"));
        }
        self.sound = sound.map(str::to_string);
        Ok(self)
    }

    /// Mutable content flag.
    pub fn mutable_content(&self) -> Option<i64> {
        self.mutable_content
    }

    /// Set the mutable content flag; the only accepted value is 1.
    pub fn set_mutable_content(&mut self, value: Option<i64>) -> Result<&mut Self> {
        if matches!(value, Some(v) if v != 1) {
            return Err(ApnsError::invalid("Mutable Content supports only 1 as integer value"));
        }
        self.mutable_content = value;
        Ok(self)
    }

    /// Content available flag.
    pub fn content_available(&self) -> Option<i64> {
        self.content_available
    }

    /// Set the content available flag.
    pub fn set_content_available(&mut self, value: Option<i64>) -> &mut Self {
        self.content_available = value;
        self
    }

    /// Notification category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Set the category. `None` and the empty string are rejected.
    pub fn set_category(&mut self, category: Option<&str>) -> Result<&mut Self> {
        match category {
            Some(c) if !c.is_empty() => {
                self.category = Some(c.to_string());
                Ok(self)
            }
            _ => Err(ApnsError::invalid("Category must be null or a string")),
        }
    }

    /// URL arguments.
    pub fn url_args(&self) -> Option<&[String]> {
        self.url_args.as_deref()
    }

    /// Set the URL arguments.
    pub fn set_url_args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.url_args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Custom top-level payload data.
    pub fn custom(&self) -> Option<&Map<String, Value>> {
        self.custom.as_ref()
    }

    /// Set custom top-level payload data.
    pub fn set_custom<I, K>(&mut self, custom: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let custom: Map<String, Value> = custom.into_iter().map(|(k, v)| (k.into(), v)).collect();
        if custom.contains_key(APS_KEY) {
            return Err(ApnsError::ReservedKey(APS_KEY.to_string()));
        }
        self.custom = Some(custom);
        Ok(self)
    }

    /// The wire payload object.
    pub fn payload(&self) -> Result<Value> {
        payload::encode(self)
    }

    /// The wire payload as JSON text. Non-ASCII text is not escaped.
    pub fn payload_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.payload()?)?)
    }
}

/// Values that normalise to an expiration in Unix seconds.
pub trait IntoExpiration {
    /// Convert into Unix seconds.
    fn into_unix_seconds(self) -> Result<i64>;
}

impl IntoExpiration for i64 {
    fn into_unix_seconds(self) -> Result<i64> {
        Ok(self)
    }
}

impl IntoExpiration for i32 {
    fn into_unix_seconds(self) -> Result<i64> {
        Ok(self.into())
    }
}

impl IntoExpiration for u32 {
    fn into_unix_seconds(self) -> Result<i64> {
        Ok(self.into())
    }
}

impl IntoExpiration for u64 {
    fn into_unix_seconds(self) -> Result<i64> {
        i64::try_from(self)
            .map_err(|_| ApnsError::invalid("Expiration does not fit a unix timestamp"))
    }
}

impl<Tz: TimeZone> IntoExpiration for DateTime<Tz> {
    fn into_unix_seconds(self) -> Result<i64> {
        Ok(self.timestamp())
    }
}

impl IntoExpiration for SystemTime {
    fn into_unix_seconds(self) -> Result<i64> {
        let secs = match self.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        };
        Ok(secs)
    }
}

impl IntoExpiration for &str {
    fn into_unix_seconds(self) -> Result<i64> {
        self.trim().parse::<i64>().map_err(|_| {
            ApnsError::invalid("Expiration must be a DateTime object or a unix timestamp")
        })
    }
}

impl IntoExpiration for Value {
    fn into_unix_seconds(self) -> Result<i64> {
        match &self {
            Value::Number(n) => n.as_i64().ok_or_else(|| {
                ApnsError::invalid("Expiration must be a DateTime object or a unix timestamp")
            }),
            Value::String(s) => s.as_str().into_unix_seconds(),
            _ => Err(ApnsError::invalid(
                "Expiration must be a DateTime object or a unix timestamp",
            )),
        }
    }
}

/// Check a token without building a message.
pub fn is_valid_token(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_hexdigit())
}
