//! Static table of the supported error constructors and their argument shapes.

use std::fmt;
use std::str::FromStr;

use boom::Boom;
use serde_json::Value;

use crate::error::Error;

/// Fixed positional parameters of an underlying constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `(message, data)`
    MessageData,
    /// `(message, scheme, attributes)`
    Unauthorized,
    /// `(message, data, allow)`
    MethodNotAllowed,
    /// `(statusCode, message, data)`
    Create,
    /// `(error, statusCode, message)`
    Wrap,
}

impl Shape {
    #[must_use]
    pub const fn parameters(self) -> &'static [&'static str] {
        match self {
            Self::MessageData => &["message", "data"],
            Self::Unauthorized => &["message", "scheme", "attributes"],
            Self::MethodNotAllowed => &["message", "data", "allow"],
            Self::Create => &["statusCode", "message", "data"],
            Self::Wrap => &["error", "statusCode", "message"],
        }
    }

    /// Whether the shape takes the caller's extra argument slots.
    ///
    /// `create` and `wrap` only ever receive `timeThrown` and `guid`.
    #[must_use]
    pub const fn takes_extra_args(self) -> bool {
        !matches!(self, Self::Create | Self::Wrap)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.parameters().join(", "))
    }
}

type StandardFn = fn(Option<&str>, Option<Value>) -> Boom;

macro_rules! constructor_table {
    (
        standard { $($std_variant:ident => $std_name:literal, $std_fn:path;)+ }
        special { $($sp_variant:ident => $sp_name:literal, $sp_shape:ident;)+ }
    ) => {
        /// Every error constructor the factory decorates.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Constructor {
            $($std_variant,)+
            $($sp_variant,)+
        }

        impl Constructor {
            pub const ALL: &'static [Self] = &[$(Self::$std_variant,)+ $(Self::$sp_variant,)+];

            /// Conventional name in lower camel case, e.g. `badRequest`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$std_variant => $std_name,)+
                    $(Self::$sp_variant => $sp_name,)+
                }
            }

            #[must_use]
            pub const fn shape(self) -> Shape {
                match self {
                    $(Self::$std_variant => Shape::MessageData,)+
                    $(Self::$sp_variant => Shape::$sp_shape,)+
                }
            }

            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($std_name => Some(Self::$std_variant),)+
                    $($sp_name => Some(Self::$sp_variant),)+
                    _ => None,
                }
            }

            pub(crate) fn standard_fn(self) -> Option<StandardFn> {
                match self {
                    $(Self::$std_variant => Some($std_fn as StandardFn),)+
                    _ => None,
                }
            }
        }
    };
}

constructor_table! {
    standard {
        BadRequest => "badRequest", Boom::bad_request;
        PaymentRequired => "paymentRequired", Boom::payment_required;
        Forbidden => "forbidden", Boom::forbidden;
        NotFound => "notFound", Boom::not_found;
        NotAcceptable => "notAcceptable", Boom::not_acceptable;
        ProxyAuthRequired => "proxyAuthRequired", Boom::proxy_auth_required;
        ClientTimeout => "clientTimeout", Boom::client_timeout;
        Conflict => "conflict", Boom::conflict;
        ResourceGone => "resourceGone", Boom::resource_gone;
        LengthRequired => "lengthRequired", Boom::length_required;
        PreconditionFailed => "preconditionFailed", Boom::precondition_failed;
        EntityTooLarge => "entityTooLarge", Boom::entity_too_large;
        UriTooLong => "uriTooLong", Boom::uri_too_long;
        UnsupportedMediaType => "unsupportedMediaType", Boom::unsupported_media_type;
        RangeNotSatisfiable => "rangeNotSatisfiable", Boom::range_not_satisfiable;
        ExpectationFailed => "expectationFailed", Boom::expectation_failed;
        Teapot => "teapot", Boom::teapot;
        BadData => "badData", Boom::bad_data;
        Locked => "locked", Boom::locked;
        PreconditionRequired => "preconditionRequired", Boom::precondition_required;
        TooManyRequests => "tooManyRequests", Boom::too_many_requests;
        Illegal => "illegal", Boom::illegal;
        Internal => "internal", Boom::internal;
        BadImplementation => "badImplementation", Boom::bad_implementation;
        NotImplemented => "notImplemented", Boom::not_implemented;
        BadGateway => "badGateway", Boom::bad_gateway;
        ServerUnavailable => "serverUnavailable", Boom::server_unavailable;
        GatewayTimeout => "gatewayTimeout", Boom::gateway_timeout;
    }
    special {
        Unauthorized => "unauthorized", Unauthorized;
        MethodNotAllowed => "methodNotAllowed", MethodNotAllowed;
        Create => "create", Create;
        Wrap => "wrap", Wrap;
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Constructor {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| Error::UnknownConstructor {
            name: name.to_owned(),
        })
    }
}
