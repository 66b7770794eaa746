//! Wire payload encoding.

use serde::Serialize;
use serde_json::Value;

use crate::{Message, Result};

/// Reserved top-level key holding the system fields.
pub const APS_KEY: &str = "aps";

#[derive(Serialize)]
struct Aps<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    alert: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    badge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'a str>,
    #[serde(rename = "mutable-content", skip_serializing_if = "Option::is_none")]
    mutable_content: Option<i64>,
    #[serde(rename = "content-available", skip_serializing_if = "Option::is_none")]
    content_available: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(rename = "url-args", skip_serializing_if = "Option::is_none")]
    url_args: Option<&'a [String]>,
}

impl<'a> Aps<'a> {
    fn from_message(message: &'a Message) -> Self {
        // An alert whose wire form is an empty string carries nothing.
        let alert = message
            .alert()
            .and_then(|a| a.payload())
            .filter(|v| v.as_str() != Some(""));

        Self {
            alert,
            badge: message.badge(),
            sound: message.sound(),
            mutable_content: message.mutable_content(),
            content_available: message.content_available(),
            category: message.category(),
            url_args: message.url_args(),
        }
    }

    fn into_value(self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Build the payload object for a message.
///
/// Custom keys come first; the `aps` key is written last and always present,
/// as `{}` when no system field is set.
pub(crate) fn encode(message: &Message) -> Result<Value> {
    let mut payload = message.custom().cloned().unwrap_or_default();
    payload.remove(APS_KEY);
    payload.insert(APS_KEY.to_string(), Aps::from_message(message).into_value()?);
    Ok(Value::Object(payload))
}
