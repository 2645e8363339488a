//! `WWW-Authenticate` challenge formatting for `unauthorized` errors.

use serde_json::{Map, Value};

use crate::error::Error;

/// Authentication scheme passed to `unauthorized`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// A single scheme name, combined with attributes and the error message.
    Scheme(String),
    /// Pre-formatted challenges, joined verbatim with `", "`.
    Challenges(Vec<String>),
}

impl From<&str> for AuthScheme {
    fn from(scheme: &str) -> Self {
        Self::Scheme(scheme.to_owned())
    }
}

impl From<String> for AuthScheme {
    fn from(scheme: String) -> Self {
        Self::Scheme(scheme)
    }
}

impl From<Vec<String>> for AuthScheme {
    fn from(challenges: Vec<String>) -> Self {
        Self::Challenges(challenges)
    }
}

impl From<Vec<&str>> for AuthScheme {
    fn from(challenges: Vec<&str>) -> Self {
        Self::Challenges(challenges.into_iter().map(str::to_owned).collect())
    }
}

/// Challenge attributes passed to `unauthorized` along with a single scheme.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAttributes {
    /// Token68-style value appended after the scheme.
    Raw(String),
    /// `name="value"` pairs, rendered in insertion order. `null` values render
    /// as empty strings.
    Map(Map<String, Value>),
}

impl From<Map<String, Value>> for AuthAttributes {
    fn from(map: Map<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl From<&str> for AuthAttributes {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_owned())
    }
}

/// Formatted challenge plus what it contributes to the error object.
#[derive(Debug)]
pub struct Challenge {
    pub header: String,
    pub payload_attributes: Option<Value>,
    pub is_missing: bool,
}

pub fn build_challenge(
    message: &str,
    scheme: &AuthScheme,
    attributes: Option<&AuthAttributes>,
) -> Result<Challenge, Error> {
    let scheme = match scheme {
        AuthScheme::Challenges(challenges) => {
            return Ok(Challenge {
                header: challenges.join(", "),
                payload_attributes: None,
                is_missing: false,
            });
        }
        AuthScheme::Scheme(scheme) => scheme,
    };

    let mut header = scheme.clone();
    let mut payload_attributes =
        (attributes.is_some() || !message.is_empty()).then(|| Value::Object(Map::new()));

    match attributes {
        Some(AuthAttributes::Raw(raw)) => {
            header.push(' ');
            header.push_str(&escape_header_attribute(raw)?);
            payload_attributes = Some(Value::String(raw.clone()));
        }
        Some(AuthAttributes::Map(map)) => {
            for (i, (name, value)) in map.iter().enumerate() {
                if i > 0 {
                    header.push(',');
                }
                let value = if value.is_null() {
                    Value::String(String::new())
                } else {
                    value.clone()
                };
                let rendered = escape_header_attribute(&attribute_text(&value))?;
                header.push(' ');
                header.push_str(name);
                header.push_str("=\"");
                header.push_str(&rendered);
                header.push('"');
                if let Some(Value::Object(attrs)) = payload_attributes.as_mut() {
                    attrs.insert(name.clone(), value);
                }
            }
        }
        None => {}
    }

    let is_missing = message.is_empty();
    if !is_missing {
        if attributes.is_some() {
            header.push(',');
        }
        header.push_str(" error=\"");
        header.push_str(&escape_header_attribute(message)?);
        header.push('"');
        if let Some(Value::Object(attrs)) = payload_attributes.as_mut() {
            attrs.insert("error".to_owned(), Value::String(message.to_owned()));
        }
    }

    Ok(Challenge {
        header,
        payload_attributes,
        is_missing,
    })
}

fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Escape a quoted-string header attribute.
///
/// Only printable ASCII is accepted. Backslashes and double quotes are escaped.
pub fn escape_header_attribute(value: &str) -> Result<String, Error> {
    if !value.chars().all(|c| matches!(c, ' '..='~')) {
        return Err(Error::InvalidAttribute {
            value: value.to_owned(),
        });
    }
    Ok(value.replace('\\', "\\\\").replace('"', "\\\""))
}
