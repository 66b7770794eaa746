//! The human-visible part of a notification.

use serde_json::{Map, Value};

use crate::{ApnsError, Result};

/// Wire key for each alert field, in payload order.
const WIRE_KEYS: [&str; 9] = [
    "body",
    "action",
    "action-loc-key",
    "loc-key",
    "loc-args",
    "launch-image",
    "title",
    "title-loc-key",
    "title-loc-args",
];

/// Alert content of a notification.
///
/// Every populated field holds a scalar (string, number or bool) or a list
/// of scalars. Setters validate their input and leave the alert untouched
/// on failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alert {
    body: Option<Value>,
    action: Option<Value>,
    action_loc_key: Option<String>,
    loc_key: Option<String>,
    loc_args: Option<Vec<Value>>,
    launch_image: Option<Value>,
    title: Option<Value>,
    title_loc_key: Option<String>,
    title_loc_args: Option<Vec<Value>>,
}

impl Alert {
    /// Create an alert with just a body.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Some(Value::String(body.into())),
            ..Default::default()
        }
    }

    /// Message body.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Set the body. `Value::Null` clears it.
    pub fn set_body(&mut self, body: impl Into<Value>) -> Result<&mut Self> {
        self.body = scalar("Body", body.into())?;
        Ok(self)
    }

    /// Action button label.
    pub fn action(&self) -> Option<&Value> {
        self.action.as_ref()
    }

    /// Set the action label. `Value::Null` clears it.
    pub fn set_action(&mut self, action: impl Into<Value>) -> Result<&mut Self> {
        self.action = scalar("Action", action.into())?;
        Ok(self)
    }

    /// Action localization key.
    pub fn action_loc_key(&self) -> Option<&str> {
        self.action_loc_key.as_deref()
    }

    /// Set the action localization key.
    pub fn set_action_loc_key(&mut self, key: Option<&str>) -> Result<&mut Self> {
        self.action_loc_key = non_empty("ActionLocKey", key)?;
        Ok(self)
    }

    /// Localization key.
    pub fn loc_key(&self) -> Option<&str> {
        self.loc_key.as_deref()
    }

    /// Set the localization key.
    pub fn set_loc_key(&mut self, key: Option<&str>) -> Result<&mut Self> {
        self.loc_key = non_empty("LocKey", key)?;
        Ok(self)
    }

    /// Localization arguments.
    pub fn loc_args(&self) -> Option<&[Value]> {
        self.loc_args.as_deref()
    }

    /// Set the localization arguments.
    pub fn set_loc_args<I, V>(&mut self, args: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.loc_args = Some(scalar_list("Arguments", args)?);
        Ok(self)
    }

    /// Launch image file name.
    pub fn launch_image(&self) -> Option<&Value> {
        self.launch_image.as_ref()
    }

    /// Set the launch image. `Value::Null` clears it.
    pub fn set_launch_image(&mut self, image: impl Into<Value>) -> Result<&mut Self> {
        self.launch_image = scalar("Launch image", image.into())?;
        Ok(self)
    }

    /// Title.
    pub fn title(&self) -> Option<&Value> {
        self.title.as_ref()
    }

    /// Set the title. `Value::Null` clears it.
    pub fn set_title(&mut self, title: impl Into<Value>) -> Result<&mut Self> {
        self.title = scalar("Title", title.into())?;
        Ok(self)
    }

    /// Title localization key.
    pub fn title_loc_key(&self) -> Option<&str> {
        self.title_loc_key.as_deref()
    }

    /// Clear the title localization key.
    ///
    /// Any non-null key is rejected; only `None` is accepted. This keeps the
    /// validation the client has always shipped with.
    pub fn set_title_loc_key(&mut self, key: Option<&str>) -> Result<&mut Self> {
        if key.is_some() {
            return Err(ApnsError::invalid("TitleLocKey must be null OR a scalar value"));
        }
        self.title_loc_key = None;
        Ok(self)
    }

    /// Title localization arguments.
    pub fn title_loc_args(&self) -> Option<&[Value]> {
        self.title_loc_args.as_deref()
    }

    /// Set the title localization arguments.
    pub fn set_title_loc_args<I, V>(&mut self, args: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.title_loc_args = Some(scalar_list("Title Arguments", args)?);
        Ok(self)
    }

    fn fields(&self) -> [Option<Value>; 9] {
        let text = |s: &Option<String>| s.clone().map(Value::String);
        let list = |l: &Option<Vec<Value>>| l.clone().map(Value::Array);
        [
            self.body.clone(),
            self.action.clone(),
            text(&self.action_loc_key),
            text(&self.loc_key),
            list(&self.loc_args),
            self.launch_image.clone(),
            self.title.clone(),
            text(&self.title_loc_key),
            list(&self.title_loc_args),
        ]
    }

    /// Wire form of the alert.
    ///
    /// `None` when nothing is set, the bare body when the body is the only
    /// populated field, otherwise an object with hyphenated keys.
    pub fn payload(&self) -> Option<Value> {
        let alert: Map<String, Value> = WIRE_KEYS
            .iter()
            .zip(self.fields())
            .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
            .collect();

        match alert.len() {
            0 => None,
            1 if self.body.is_some() => self.body.clone(),
            _ => Some(Value::Object(alert)),
        }
    }
}

impl From<&str> for Alert {
    fn from(body: &str) -> Self {
        Self::new(body)
    }
}

impl From<String> for Alert {
    fn from(body: String) -> Self {
        Self::new(body)
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn scalar(field: &str, value: Value) -> Result<Option<Value>> {
    match value {
        Value::Null => Ok(None),
        v if is_scalar(&v) => Ok(Some(v)),
        _ => Err(ApnsError::invalid(format!(
            "{field} must be null OR a scalar value"
        ))),
    }
}

fn non_empty(field: &str, key: Option<&str>) -> Result<Option<String>> {
    match key {
        Some("") => Err(ApnsError::invalid(format!(
            "{field} must be null OR a non empty string value"
        ))),
        other => Ok(other.map(str::to_string)),
    }
}

fn scalar_list<I, V>(field: &str, args: I) -> Result<Vec<Value>>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    args.into_iter()
        .map(Into::into)
        .map(|v| {
            if is_scalar(&v) {
                Ok(v)
            } else {
                Err(ApnsError::invalid(format!(
                    "{field} must only contain scalar values"
                )))
            }
        })
        .collect()
}
