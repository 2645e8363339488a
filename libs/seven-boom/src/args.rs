//! Call-time arguments of a decorated constructor.

use std::collections::BTreeMap;

use boom::{AuthAttributes, AuthScheme, StatusInput, WrapTarget};
use serde_json::Value;

use crate::constructor::Shape;

/// The underlying constructor's own positional arguments, one variant per
/// [`Shape`].
#[derive(Debug, Clone)]
pub enum CoreArgs {
    Standard {
        message: Option<String>,
        data: Option<Value>,
    },
    Unauthorized {
        message: Option<String>,
        scheme: Option<AuthScheme>,
        attributes: Option<AuthAttributes>,
    },
    MethodNotAllowed {
        message: Option<String>,
        data: Option<Value>,
        allow: Option<Vec<String>>,
    },
    Create {
        status: StatusInput,
        message: Option<String>,
        data: Option<Value>,
    },
    Wrap {
        target: WrapTarget,
        status: Option<StatusInput>,
        message: Option<String>,
    },
}

impl CoreArgs {
    /// `(message, data)` for the plain status constructors.
    #[must_use]
    pub fn standard(message: Option<&str>, data: Option<Value>) -> Self {
        Self::Standard {
            message: message.map(str::to_owned),
            data,
        }
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Standard { .. } => Shape::MessageData,
            Self::Unauthorized { .. } => Shape::Unauthorized,
            Self::MethodNotAllowed { .. } => Shape::MethodNotAllowed,
            Self::Create { .. } => Shape::Create,
            Self::Wrap { .. } => Shape::Wrap,
        }
    }
}

impl Default for CoreArgs {
    fn default() -> Self {
        Self::Standard {
            message: None,
            data: None,
        }
    }
}

/// Extra arguments, resolved against the argument specification.
///
/// Slots are positional, in specification order. `None` marks an omitted slot
/// and falls back to the default, while `Some(Value::Null)` is an explicit
/// null that gets written as is. Named values override the positional slot
/// with the same name.
///
/// ```
/// use seven_boom::ExtraArgs;
///
/// // first slot omitted, second slot set
/// let extras = ExtraArgs::new().skip().push("val3");
/// assert_eq!(extras.positional_len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraArgs {
    positional: Vec<Option<Value>>,
    named: BTreeMap<String, Value>,
    public: Option<Value>,
}

impl ExtraArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from positional slots.
    #[must_use]
    pub fn positional<I, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = Option<V>>,
        V: Into<Value>,
    {
        Self {
            positional: slots.into_iter().map(|slot| slot.map(Into::into)).collect(),
            ..Self::default()
        }
    }

    /// Provide the next positional slot.
    #[must_use]
    pub fn push(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(Some(value.into()));
        self
    }

    /// Leave the next positional slot out.
    #[must_use]
    pub fn skip(mut self) -> Self {
        self.positional.push(None);
        self
    }

    /// Provide an argument by name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// Public data merged into the error's `data` under `public`.
    ///
    /// Two objects are merged key by key. Otherwise the incoming value
    /// replaces the existing `public` entry, and when `data` itself is not an
    /// object the public data is dropped. Both cases log a warning.
    #[must_use]
    pub fn with_public(mut self, public: impl Into<Value>) -> Self {
        self.public = Some(public.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty() && self.public.is_none()
    }

    #[must_use]
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    #[must_use]
    pub fn public(&self) -> Option<&Value> {
        self.public.as_ref()
    }

    pub fn named_keys(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// Value explicitly supplied for the argument at `slot` called `name`.
    #[must_use]
    pub fn explicit(&self, slot: usize, name: &str) -> Option<&Value> {
        self.named
            .get(name)
            .or_else(|| self.positional.get(slot).and_then(Option::as_ref))
    }
}
