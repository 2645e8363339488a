//! Decoration engine
//!
//! A [`DecoratedConstructor`] calls the underlying constructor with its own
//! arguments only, then writes the resolved extra fields into the payload of
//! the very error object it got back. Status, headers and classification
//! flags are never touched.

use boom::Boom;
use serde_json::{Map, Value};

use crate::args::{CoreArgs, ExtraArgs};
use crate::constructor::{Constructor, Shape};
use crate::error::Error;
use crate::spec::{ArgumentSpec, ArgumentSpecification};

/// Key of `data` receiving the caller's public data.
pub const PUBLIC_KEY: &str = "public";

/// Bind `constructor` to `spec`.
#[must_use]
pub fn decorate(constructor: Constructor, spec: &ArgumentSpecification) -> DecoratedConstructor {
    DecoratedConstructor {
        constructor,
        spec: spec.clone(),
    }
}

/// An error constructor bound to an argument specification.
#[derive(Debug, Clone)]
pub struct DecoratedConstructor {
    constructor: Constructor,
    spec: ArgumentSpecification,
}

impl DecoratedConstructor {
    #[must_use]
    pub fn constructor(&self) -> Constructor {
        self.constructor
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.constructor.name()
    }

    #[must_use]
    pub fn specification(&self) -> &ArgumentSpecification {
        &self.spec
    }

    /// Formal parameter list: the constructor's own parameters, then one slot
    /// per extra argument and the trailing public data slot.
    #[must_use]
    pub fn parameters(&self) -> Vec<&str> {
        let shape = self.constructor.shape();
        let mut params = shape.parameters().to_vec();
        if shape.takes_extra_args() {
            params.extend(self.spec.names());
            params.push("publicData");
        }
        params
    }

    /// Build the error and decorate its payload.
    ///
    /// # Errors
    /// - [`Error::ShapeMismatch`] when `args` do not fit this constructor
    /// - [`Error::Boom`] when the underlying constructor fails
    /// - [`Error::DefaultProvider`] when a computed default fails
    pub fn call(&self, args: CoreArgs, extras: &ExtraArgs) -> Result<Boom, Error> {
        let shape = self.constructor.shape();
        let actual = args.shape();
        if actual != shape {
            return Err(Error::ShapeMismatch {
                constructor: self.name(),
                expected: shape,
                actual,
            });
        }

        if !shape.takes_extra_args() {
            if !extras.is_empty() {
                tracing::warn!(
                    constructor = self.name(),
                    "extra arguments are not accepted by this constructor and were ignored"
                );
            }
            let mut boom = invoke(self.constructor, args)?;
            self.apply_builtin(&mut boom)?;
            return Ok(boom);
        }

        self.warn_unmatched(extras);
        let mut boom = invoke(self.constructor, args)?;
        if let Some(public) = extras.public() {
            merge_public(&mut boom, public);
        }
        for (slot, arg) in self.spec.iter().enumerate() {
            let value = match extras.explicit(slot, &arg.name) {
                Some(value) => Some(value.clone()),
                None => resolve_default(arg)?,
            };
            if let Some(value) = value {
                tracing::trace!(constructor = self.name(), argument = %arg.name, "payload field set");
                boom.payload_mut().insert(arg.name.clone(), value);
            }
        }
        Ok(boom)
    }

    /// `create` and `wrap` only carry `timeThrown` and `guid`, resolved anew on
    /// every call, including when `wrap` hands back an existing error.
    fn apply_builtin(&self, boom: &mut Boom) -> Result<(), Error> {
        for arg in self.spec.iter().filter(|arg| arg.is_builtin()) {
            if let Some(value) = resolve_default(arg)? {
                boom.payload_mut().insert(arg.name.clone(), value);
            }
        }
        Ok(())
    }

    fn warn_unmatched(&self, extras: &ExtraArgs) {
        if extras.positional_len() > self.spec.len() {
            tracing::warn!(
                constructor = self.name(),
                supplied = extras.positional_len(),
                accepted = self.spec.len(),
                "surplus extra arguments ignored"
            );
        }
        for name in extras.named_keys() {
            if self.spec.get(name).is_none() {
                tracing::warn!(
                    constructor = self.name(),
                    argument = name,
                    "extra argument is not in the specification and was ignored"
                );
            }
        }
    }
}

fn resolve_default(arg: &ArgumentSpec) -> Result<Option<Value>, Error> {
    arg.default
        .as_ref()
        .map(|default| {
            default.resolve().map_err(|source| Error::DefaultProvider {
                argument: arg.name.clone(),
                source,
            })
        })
        .transpose()
}

fn merge_public(boom: &mut Boom, public: &Value) {
    let data = boom.data_mut();
    match data {
        None => {
            let mut map = Map::new();
            map.insert(PUBLIC_KEY.to_owned(), public.clone());
            *data = Some(Value::Object(map));
        }
        Some(Value::Object(map)) => match (map.get_mut(PUBLIC_KEY), public) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                existing.extend(incoming.clone());
            }
            (Some(existing), _) => {
                tracing::warn!("public data is not an object on both sides; replaced, not merged");
                *existing = public.clone();
            }
            (None, _) => {
                map.insert(PUBLIC_KEY.to_owned(), public.clone());
            }
        },
        Some(_) => {
            tracing::warn!("error data is not an object; public data dropped");
        }
    }
}

/// Call the underlying constructor. The shape has already been checked.
fn invoke(constructor: Constructor, args: CoreArgs) -> Result<Boom, Error> {
    let boom = match args {
        CoreArgs::Standard { message, data } => {
            let Some(build) = constructor.standard_fn() else {
                return Err(mismatch(constructor, Shape::MessageData));
            };
            build(message.as_deref(), data)
        }
        CoreArgs::Unauthorized {
            message,
            scheme,
            attributes,
        } => Boom::unauthorized(message.as_deref(), scheme.as_ref(), attributes.as_ref())?,
        CoreArgs::MethodNotAllowed {
            message,
            data,
            allow,
        } => Boom::method_not_allowed(message.as_deref(), data, allow.as_deref())?,
        CoreArgs::Create {
            status,
            message,
            data,
        } => Boom::create(status, message.as_deref(), data)?,
        CoreArgs::Wrap {
            target,
            status,
            message,
        } => Boom::wrap(target, status.as_ref(), message.as_deref())?,
    };
    Ok(boom)
}

fn mismatch(constructor: Constructor, actual: Shape) -> Error {
    Error::ShapeMismatch {
        constructor: constructor.name(),
        expected: constructor.shape(),
        actual,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::spec::{GUID, TIME_THROWN, canonicalize};
    use serde_json::json;

    fn spec(args: Vec<ArgumentSpec>) -> ArgumentSpecification {
        canonicalize(args).unwrap()
    }

    #[test]
    fn parameters_list_fixed_then_extra_slots() {
        let spec = spec(vec![
            ArgumentSpec::new("errorCode", 1),
            ArgumentSpec::new(GUID, 2),
        ]);
        let unauthorized = decorate(Constructor::Unauthorized, &spec);
        assert_eq!(
            unauthorized.parameters(),
            ["message", "scheme", "attributes", "errorCode", "guid", "publicData"]
        );
        let create = decorate(Constructor::Create, &spec);
        assert_eq!(create.parameters(), ["statusCode", "message", "data"]);
    }

    #[test]
    fn shape_mismatch_is_rejected_before_construction() {
        let decorated = decorate(Constructor::Create, &ArgumentSpecification::empty());
        let err = decorated
            .call(CoreArgs::default(), &ExtraArgs::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "constructor 'create' takes (statusCode, message, data), got (message, data)"
        );
    }

    #[test]
    fn explicit_null_is_written_and_omission_leaves_no_key() {
        let spec = spec(vec![
            ArgumentSpec::new("a", 1),
            ArgumentSpec::new("b", 2),
        ]);
        let decorated = decorate(Constructor::BadRequest, &spec);
        let boom = decorated
            .call(CoreArgs::default(), &ExtraArgs::new().push(Value::Null))
            .unwrap();
        assert_eq!(boom.output().payload().get("a"), Some(&Value::Null));
        assert!(!boom.output().payload().contains_key("b"));
    }

    #[test]
    fn public_data_merges_into_data() {
        let decorated = decorate(Constructor::BadRequest, &ArgumentSpecification::empty());
        let extras = ExtraArgs::new().with_public(json!({ "hint": "retry" }));

        let fresh = decorated.call(CoreArgs::default(), &extras).unwrap();
        assert_eq!(fresh.data(), Some(&json!({ "public": { "hint": "retry" } })));

        let args = CoreArgs::standard(
            Some("m"),
            Some(json!({ "key": "val", "public": { "code": 7 } })),
        );
        let merged = decorated.call(args, &extras).unwrap();
        assert_eq!(
            merged.data(),
            Some(&json!({ "key": "val", "public": { "code": 7, "hint": "retry" } }))
        );
    }

    #[test]
    fn non_object_public_data_replaces_and_non_object_data_is_kept() {
        let decorated = decorate(Constructor::BadRequest, &ArgumentSpecification::empty());

        let args = CoreArgs::standard(None, Some(json!({ "public": "old" })));
        let extras = ExtraArgs::new().with_public(json!({ "hint": "retry" }));
        let replaced = decorated.call(args, &extras).unwrap();
        assert_eq!(replaced.data(), Some(&json!({ "public": { "hint": "retry" } })));

        let args = CoreArgs::standard(None, Some(json!({ "public": { "code": 7 } })));
        let scalar = decorated
            .call(args, &ExtraArgs::new().with_public("note"))
            .unwrap();
        assert_eq!(scalar.data(), Some(&json!({ "public": "note" })));

        let args = CoreArgs::standard(None, Some(json!([1, 2])));
        let kept = decorated.call(args, &extras).unwrap();
        assert_eq!(kept.data(), Some(&json!([1, 2])));
    }

    #[test]
    fn failing_provider_propagates() {
        let spec = spec(vec![ArgumentSpec::new("x", 1).with_computed(|| {
            Err(anyhow::anyhow!("provider exploded"))
        })]);
        let decorated = decorate(Constructor::NotFound, &spec);
        let err = decorated
            .call(CoreArgs::default(), &ExtraArgs::new())
            .unwrap_err();
        match err {
            Error::DefaultProvider { argument, source } => {
                assert_eq!(argument, "x");
                assert_eq!(source.to_string(), "provider exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wrap_of_existing_error_refreshes_builtins() {
        let spec = spec(vec![
            ArgumentSpec::new(GUID, 1),
            ArgumentSpec::new(TIME_THROWN, 2),
        ]);
        let bad_request = decorate(Constructor::BadRequest, &spec);
        let original = bad_request
            .call(CoreArgs::default(), &ExtraArgs::new())
            .unwrap();
        let guid = original.output().payload()[GUID].clone();

        let wrap = decorate(Constructor::Wrap, &spec);
        let wrapped = wrap
            .call(
                CoreArgs::Wrap {
                    target: original.into(),
                    status: None,
                    message: None,
                },
                &ExtraArgs::new(),
            )
            .unwrap();
        assert_ne!(wrapped.output().payload()[GUID], guid);
        assert!(wrapped.output().payload()[TIME_THROWN].is_string());
        assert_eq!(wrapped.status_code(), 400);
    }
}
