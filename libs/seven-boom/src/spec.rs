//! Declarative description of the extra payload fields.
//!
//! A caller lists the extra arguments once, as [`ArgumentSpec`] records, and
//! [`canonicalize`] turns them into an immutable [`ArgumentSpecification`]:
//! - entries are sorted by `order` (stable, so ties keep input order)
//! - `timeThrown` and `guid` without an explicit default get built-in providers
//! - empty, reserved and duplicate names are rejected

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

/// Name of the built-in timestamp field.
pub const TIME_THROWN: &str = "timeThrown";

/// Name of the built-in unique identifier field.
pub const GUID: &str = "guid";

/// Payload keys owned by the underlying error object.
pub const RESERVED_NAMES: [&str; 4] = ["statusCode", "error", "message", "attributes"];

/// Zero-argument function producing a default value at call time.
pub type ProviderFn = dyn Fn() -> anyhow::Result<Value> + Send + Sync;

/// Specification error, raised while canonicalizing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("argument name must not be empty")]
    EmptyName,
    #[error("argument '{name}' is declared more than once")]
    DuplicateName { name: String },
    #[error("argument '{name}' collides with a payload field of the error object")]
    ReservedName { name: String },
}

/// Default value of an extra argument.
#[derive(Clone)]
pub enum DefaultValue {
    /// Written as is.
    Constant(Value),
    /// Invoked on every call that does not supply the argument.
    Computed(Arc<ProviderFn>),
}

impl DefaultValue {
    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    #[must_use]
    pub fn computed<F>(provider: F) -> Self
    where
        F: Fn() -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(provider))
    }

    /// Produce the value for one call.
    ///
    /// # Errors
    /// Returns whatever a computed provider returns, untouched.
    pub fn resolve(&self) -> anyhow::Result<Value> {
        match self {
            Self::Constant(value) => Ok(value.clone()),
            Self::Computed(provider) => provider(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Configuration files can only express constants.
impl<'de> Deserialize<'de> for DefaultValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::Constant)
    }
}

/// One extra argument: its payload key, its slot order and its default.
///
/// `default: null` in configuration means "no default", which lets the
/// built-in providers apply to `timeThrown` and `guid`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,
    pub order: i64,
    #[serde(default)]
    pub default: Option<DefaultValue>,
}

impl ArgumentSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, order: i64) -> Self {
        Self {
            name: name.into(),
            order,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_constant(self, value: impl Into<Value>) -> Self {
        self.with_default(DefaultValue::constant(value))
    }

    #[must_use]
    pub fn with_computed<F>(self, provider: F) -> Self
    where
        F: Fn() -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.with_default(DefaultValue::computed(provider))
    }

    /// `true` for the names that only `create` and `wrap` also receive.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        is_builtin_name(&self.name)
    }
}

pub(crate) fn is_builtin_name(name: &str) -> bool {
    name == TIME_THROWN || name == GUID
}

/// Canonical, order-sorted list of extra arguments.
///
/// Cheap to clone; the entries are shared.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSpecification {
    entries: Arc<[ArgumentSpec]>,
}

impl ArgumentSpecification {
    /// The vanilla specification: no extra fields at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArgumentSpec> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgumentSpec> {
        self.entries.iter().find(|arg| arg.name == name)
    }

    /// Argument names in slot order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|arg| arg.name.as_str())
    }
}

impl<'a> IntoIterator for &'a ArgumentSpecification {
    type Item = &'a ArgumentSpec;
    type IntoIter = std::slice::Iter<'a, ArgumentSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Normalize a raw argument list into an [`ArgumentSpecification`].
///
/// # Errors
/// Returns [`SpecError`] for an empty, reserved or duplicated name.
pub fn canonicalize<I>(raw: I) -> Result<ArgumentSpecification, SpecError>
where
    I: IntoIterator<Item = ArgumentSpec>,
{
    let mut entries: Vec<ArgumentSpec> = raw.into_iter().collect();

    let mut seen = HashSet::with_capacity(entries.len());
    for arg in &entries {
        if arg.name.is_empty() {
            return Err(SpecError::EmptyName);
        }
        if RESERVED_NAMES.contains(&arg.name.as_str()) {
            return Err(SpecError::ReservedName {
                name: arg.name.clone(),
            });
        }
        if !seen.insert(arg.name.as_str()) {
            return Err(SpecError::DuplicateName {
                name: arg.name.clone(),
            });
        }
    }

    entries.sort_by_key(|arg| arg.order);
    for arg in &mut entries {
        if arg.default.is_none() {
            arg.default = builtin_default(&arg.name);
        }
    }

    Ok(ArgumentSpecification {
        entries: entries.into(),
    })
}

fn builtin_default(name: &str) -> Option<DefaultValue> {
    match name {
        TIME_THROWN => Some(DefaultValue::computed(|| Ok(Value::String(now_iso8601())))),
        GUID => Some(DefaultValue::computed(|| {
            Ok(Value::String(Uuid::new_v4().to_string()))
        })),
        _ => None,
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.sssZ`.
fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
