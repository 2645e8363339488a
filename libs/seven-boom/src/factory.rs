//! Error factory
//!
//! Holds the table of decorated constructors. The table is built on the side
//! and published with a single atomic swap, so readers either see the old
//! table or the new one, never a partial one. A failed [`ErrorFactory::initialize`]
//! leaves the previous table in place.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use boom::{AuthAttributes, AuthScheme, Boom, StatusInput, WrapTarget};
use serde_json::Value;

use crate::args::{CoreArgs, ExtraArgs};
use crate::config::SevenBoomConfig;
use crate::constructor::Constructor;
use crate::engine::{DecoratedConstructor, decorate};
use crate::error::Error;
use crate::spec::{ArgumentSpec, ArgumentSpecification, canonicalize};

struct Registry {
    spec: ArgumentSpecification,
    constructors: BTreeMap<Constructor, DecoratedConstructor>,
}

impl Registry {
    fn build(spec: ArgumentSpecification) -> Self {
        let constructors = Constructor::ALL
            .iter()
            .map(|ctor| (*ctor, decorate(*ctor, &spec)))
            .collect();
        Self { spec, constructors }
    }
}

/// Registry of decorated error constructors.
///
/// Starts uninitialized; every lookup fails with [`Error::NotInitialized`]
/// until [`ErrorFactory::initialize`] succeeds once.
pub struct ErrorFactory {
    registry: ArcSwapOption<Registry>,
}

impl Default for ErrorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ErrorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.load();
        f.debug_struct("ErrorFactory")
            .field("specification", &registry.as_ref().map(|r| &r.spec))
            .finish()
    }
}

impl ErrorFactory {
    /// Create an uninitialized factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: ArcSwapOption::empty(),
        }
    }

    /// Factory initialized with no extra arguments.
    #[must_use]
    pub fn vanilla() -> Self {
        let factory = Self::new();
        factory.install(ArgumentSpecification::empty());
        factory
    }

    /// Factory initialized with `args`.
    ///
    /// # Errors
    /// Returns [`Error::Spec`] when `args` do not canonicalize.
    pub fn with_arguments<I>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = ArgumentSpec>,
    {
        let factory = Self::new();
        factory.initialize(args)?;
        Ok(factory)
    }

    /// Factory initialized from the `arguments` list of a loaded configuration.
    ///
    /// # Errors
    /// Returns [`Error::Spec`] when the configured arguments do not canonicalize.
    pub fn from_config(config: &SevenBoomConfig) -> Result<Self, Error> {
        Self::with_arguments(config.arguments.iter().cloned())
    }

    /// (Re)build every decorated constructor from `args`.
    ///
    /// An empty list gives vanilla behavior. On error the previous table, if
    /// any, stays active.
    ///
    /// # Errors
    /// Returns [`Error::Spec`] when `args` do not canonicalize.
    pub fn initialize<I>(&self, args: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = ArgumentSpec>,
    {
        let spec = canonicalize(args)?;
        self.install(spec);
        Ok(())
    }

    fn install(&self, spec: ArgumentSpecification) {
        let registry = Registry::build(spec);
        tracing::debug!(
            arguments = ?registry.spec.names().collect::<Vec<_>>(),
            constructors = registry.constructors.len(),
            "error factory initialized"
        );
        self.registry.store(Some(Arc::new(registry)));
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.registry.load().is_some()
    }

    /// Active argument specification.
    ///
    /// # Errors
    /// Returns [`Error::NotInitialized`] before the first successful initialization.
    pub fn specification(&self) -> Result<ArgumentSpecification, Error> {
        Ok(self.registry()?.spec.clone())
    }

    /// Decorated constructor by its conventional name, e.g. `"badRequest"`.
    ///
    /// # Errors
    /// - [`Error::NotInitialized`] before the first successful initialization
    /// - [`Error::UnknownConstructor`] when `name` is not a constructor
    pub fn get(&self, name: &str) -> Result<DecoratedConstructor, Error> {
        let constructor: Constructor = name.parse()?;
        self.get_constructor(constructor)
    }

    /// Decorated constructor for `constructor`.
    ///
    /// # Errors
    /// Returns [`Error::NotInitialized`] before the first successful initialization.
    pub fn get_constructor(&self, constructor: Constructor) -> Result<DecoratedConstructor, Error> {
        self.registry()?
            .constructors
            .get(&constructor)
            .cloned()
            .ok_or_else(|| Error::UnknownConstructor {
                name: constructor.name().to_owned(),
            })
    }

    /// Look up `name` and call it.
    ///
    /// # Errors
    /// See [`ErrorFactory::get`] and [`DecoratedConstructor::call`].
    pub fn call(&self, name: &str, args: CoreArgs, extras: &ExtraArgs) -> Result<Boom, Error> {
        self.get(name)?.call(args, extras)
    }

    fn registry(&self) -> Result<Arc<Registry>, Error> {
        self.registry.load_full().ok_or(Error::NotInitialized)
    }

    fn call_constructor(
        &self,
        constructor: Constructor,
        args: CoreArgs,
        extras: &ExtraArgs,
    ) -> Result<Boom, Error> {
        self.get_constructor(constructor)?.call(args, extras)
    }

    /// 401 with an optional `WWW-Authenticate` challenge.
    ///
    /// # Errors
    /// See [`DecoratedConstructor::call`].
    pub fn unauthorized(
        &self,
        message: Option<&str>,
        scheme: Option<AuthScheme>,
        attributes: Option<AuthAttributes>,
        extras: &ExtraArgs,
    ) -> Result<Boom, Error> {
        let args = CoreArgs::Unauthorized {
            message: message.map(str::to_owned),
            scheme,
            attributes,
        };
        self.call_constructor(Constructor::Unauthorized, args, extras)
    }

    /// 405 with an optional `Allow` header.
    ///
    /// # Errors
    /// See [`DecoratedConstructor::call`].
    pub fn method_not_allowed(
        &self,
        message: Option<&str>,
        data: Option<Value>,
        allow: Option<Vec<String>>,
        extras: &ExtraArgs,
    ) -> Result<Boom, Error> {
        let args = CoreArgs::MethodNotAllowed {
            message: message.map(str::to_owned),
            data,
            allow,
        };
        self.call_constructor(Constructor::MethodNotAllowed, args, extras)
    }

    /// Error with an arbitrary status. Only `timeThrown` and `guid` are added.
    ///
    /// # Errors
    /// See [`DecoratedConstructor::call`].
    pub fn create(
        &self,
        status: impl Into<StatusInput>,
        message: Option<&str>,
        data: Option<Value>,
    ) -> Result<Boom, Error> {
        let args = CoreArgs::Create {
            status: status.into(),
            message: message.map(str::to_owned),
            data,
        };
        self.call_constructor(Constructor::Create, args, &ExtraArgs::new())
    }

    /// Wrap an error. Only `timeThrown` and `guid` are added; an existing
    /// `Boom` comes back as is, with both fields resolved again.
    ///
    /// # Errors
    /// See [`DecoratedConstructor::call`].
    pub fn wrap(
        &self,
        target: impl Into<WrapTarget>,
        status: Option<StatusInput>,
        message: Option<&str>,
    ) -> Result<Boom, Error> {
        let args = CoreArgs::Wrap {
            target: target.into(),
            status,
            message: message.map(str::to_owned),
        };
        self.call_constructor(Constructor::Wrap, args, &ExtraArgs::new())
    }
}

macro_rules! standard_methods {
    ($($method:ident => $variant:ident, $doc:literal;)+) => {
        impl ErrorFactory {
            $(
                #[doc = $doc]
                ///
                /// # Errors
                /// See [`DecoratedConstructor::call`].
                pub fn $method(
                    &self,
                    message: Option<&str>,
                    data: Option<Value>,
                    extras: &ExtraArgs,
                ) -> Result<Boom, Error> {
                    self.call_constructor(
                        Constructor::$variant,
                        CoreArgs::standard(message, data),
                        extras,
                    )
                }
            )+
        }
    };
}

standard_methods! {
    bad_request => BadRequest, "400 Bad Request";
    payment_required => PaymentRequired, "402 Payment Required";
    forbidden => Forbidden, "403 Forbidden";
    not_found => NotFound, "404 Not Found";
    not_acceptable => NotAcceptable, "406 Not Acceptable";
    proxy_auth_required => ProxyAuthRequired, "407 Proxy Authentication Required";
    client_timeout => ClientTimeout, "408 Request Time-out";
    conflict => Conflict, "409 Conflict";
    resource_gone => ResourceGone, "410 Gone";
    length_required => LengthRequired, "411 Length Required";
    precondition_failed => PreconditionFailed, "412 Precondition Failed";
    entity_too_large => EntityTooLarge, "413 Request Entity Too Large";
    uri_too_long => UriTooLong, "414 Request-URI Too Large";
    unsupported_media_type => UnsupportedMediaType, "415 Unsupported Media Type";
    range_not_satisfiable => RangeNotSatisfiable, "416 Requested Range Not Satisfiable";
    expectation_failed => ExpectationFailed, "417 Expectation Failed";
    teapot => Teapot, "418 I'm a Teapot";
    bad_data => BadData, "422 Unprocessable Entity";
    locked => Locked, "423 Locked";
    precondition_required => PreconditionRequired, "428 Precondition Required";
    too_many_requests => TooManyRequests, "429 Too Many Requests";
    illegal => Illegal, "451 Unavailable For Legal Reasons";
    internal => Internal, "500 with the message hidden from the payload";
    bad_implementation => BadImplementation, "500 flagged as a developer error";
    not_implemented => NotImplemented, "501 Not Implemented";
    bad_gateway => BadGateway, "502 Bad Gateway";
    server_unavailable => ServerUnavailable, "503 Service Unavailable";
    gateway_timeout => GatewayTimeout, "504 Gateway Time-out";
}
