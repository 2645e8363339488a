//! The error object and its constructors.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use http::header::{ALLOW, HeaderName, HeaderValue, WWW_AUTHENTICATE};
use http::HeaderMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::auth::{AuthAttributes, AuthScheme, build_challenge};
use crate::error::Error;
use crate::status::{StatusInput, reason_phrase};

/// Public, serializable body of an error response.
pub type Payload = Map<String, Value>;

/// Message shown in place of the real one for plain 500 errors.
pub const INTERNAL_MESSAGE: &str = "An internal server error occurred";

const DEFAULT_WRAP_STATUS: u16 = 500;

/// Custom serializer for `HeaderMap` as a flat `name -> value` object
fn serialize_headers<S>(headers: &HeaderMap, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(
        headers
            .iter()
            .map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes()))),
    )
}

/// Response-facing part of a [`Boom`]: status, headers and payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    status_code: u16,
    #[serde(serialize_with = "serialize_headers")]
    headers: HeaderMap,
    payload: Payload,
}

impl Output {
    fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: HeaderMap::new(),
            payload: Payload::new(),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// An HTTP-friendly error.
///
/// The status code, headers and classification flags are fixed at
/// construction. Only the payload map can be extended afterwards, through
/// [`Boom::payload_mut`].
#[derive(Debug, Clone)]
pub struct Boom {
    message: String,
    data: Option<Value>,
    is_server: bool,
    is_developer_error: bool,
    is_missing: bool,
    output: Output,
    source: Option<Arc<dyn StdError + Send + Sync>>,
}

/// Input accepted by [`Boom::wrap`].
#[derive(Debug, Clone)]
pub enum WrapTarget {
    /// Already a `Boom`: returned as is.
    Boom(Box<Boom>),
    /// Any other error: converted, keeping the original as `source`.
    Foreign(Arc<dyn StdError + Send + Sync>),
}

impl WrapTarget {
    pub fn foreign<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Foreign(Arc::new(error))
    }
}

impl From<Boom> for WrapTarget {
    fn from(boom: Boom) -> Self {
        Self::Boom(Box::new(boom))
    }
}

impl Boom {
    fn create_unchecked(status_code: u16, message: Option<&str>, data: Option<Value>) -> Self {
        let boom = Self {
            message: message.unwrap_or_default().to_owned(),
            data: data.filter(|d| !d.is_null()),
            is_server: false,
            is_developer_error: false,
            is_missing: false,
            output: Output::new(status_code),
            source: None,
        };
        boom.initialize(None)
    }

    fn initialize(mut self, message: Option<&str>) -> Self {
        self.is_server = self.output.status_code >= 500;
        self.reformat();

        let prefix = match message.filter(|m| !m.is_empty()) {
            Some(m) => Some(m.to_owned()),
            None if self.message.is_empty() => Some(reason_phrase(self.output.status_code).to_owned()),
            None => None,
        };
        if let Some(prefix) = prefix {
            self.message = if self.message.is_empty() {
                prefix
            } else {
                format!("{prefix}: {}", self.message)
            };
        }
        self
    }

    fn reformat(&mut self) {
        let status = self.output.status_code;
        let payload = &mut self.output.payload;
        payload.insert("statusCode".to_owned(), Value::from(status));
        payload.insert(
            "error".to_owned(),
            Value::String(reason_phrase(status).to_owned()),
        );
        if status == 500 {
            payload.insert(
                "message".to_owned(),
                Value::String(INTERNAL_MESSAGE.to_owned()),
            );
        } else if !self.message.is_empty() {
            payload.insert("message".to_owned(), Value::String(self.message.clone()));
        }
    }

    fn set_header(&mut self, name: HeaderName, value: &str) -> Result<(), Error> {
        let value = HeaderValue::from_str(value).map_err(|source| Error::InvalidHeaderValue {
            name: name.clone(),
            source,
        })?;
        self.output.headers.insert(name, value);
        Ok(())
    }

    /// Build an error for an arbitrary status code.
    ///
    /// # Errors
    /// Returns [`Error::InvalidStatusCode`] when `status` does not resolve to
    /// an integer of at least 400.
    pub fn create(
        status: impl Into<StatusInput>,
        message: Option<&str>,
        data: Option<Value>,
    ) -> Result<Self, Error> {
        let status_code = status.into().resolve()?;
        Ok(Self::create_unchecked(status_code, message, data))
    }

    /// Turn any error into a `Boom`. An existing `Boom` is returned untouched,
    /// whatever `status` and `message` say.
    ///
    /// # Errors
    /// Returns [`Error::InvalidStatusCode`] when a foreign error is wrapped
    /// with an invalid `status`.
    pub fn wrap(
        target: WrapTarget,
        status: Option<&StatusInput>,
        message: Option<&str>,
    ) -> Result<Self, Error> {
        let source = match target {
            WrapTarget::Boom(boom) => return Ok(*boom),
            WrapTarget::Foreign(source) => source,
        };
        let status_code = match status {
            Some(status) => status.resolve()?,
            None => DEFAULT_WRAP_STATUS,
        };

        let boom = Self {
            message: source.to_string(),
            data: None,
            is_server: false,
            is_developer_error: false,
            is_missing: false,
            output: Output::new(status_code),
            source: Some(source),
        };
        Ok(boom.initialize(message))
    }

    /// 401 Unauthorized, optionally with a `WWW-Authenticate` challenge.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAttribute`] when an attribute or the message is
    /// not printable ASCII, or [`Error::InvalidHeaderValue`] when a
    /// pre-formatted challenge cannot be used as a header value.
    pub fn unauthorized(
        message: Option<&str>,
        scheme: Option<&AuthScheme>,
        attributes: Option<&AuthAttributes>,
    ) -> Result<Self, Error> {
        let mut boom = Self::create_unchecked(401, message, None);
        let Some(scheme) = scheme else {
            return Ok(boom);
        };

        let challenge = build_challenge(message.unwrap_or_default(), scheme, attributes)?;
        if let Some(attributes) = challenge.payload_attributes {
            boom.output
                .payload
                .insert("attributes".to_owned(), attributes);
        }
        boom.is_missing = challenge.is_missing;
        boom.set_header(WWW_AUTHENTICATE, &challenge.header)?;
        Ok(boom)
    }

    /// 405 Method Not Allowed, optionally listing the allowed methods.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeaderValue`] when a method name cannot be used
    /// in the `Allow` header.
    pub fn method_not_allowed(
        message: Option<&str>,
        data: Option<Value>,
        allow: Option<&[String]>,
    ) -> Result<Self, Error> {
        let mut boom = Self::create_unchecked(405, message, data);
        if let Some(allow) = allow {
            boom.set_header(ALLOW, &allow.join(", "))?;
        }
        Ok(boom)
    }

    /// 500 Internal Server Error flagged as a developer error.
    #[must_use]
    pub fn bad_implementation(message: Option<&str>, data: Option<Value>) -> Self {
        let mut boom = Self::create_unchecked(500, message, data);
        boom.is_developer_error = true;
        boom
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Mutable access to `data`, used to attach caller-side public fields.
    pub fn data_mut(&mut self) -> &mut Option<Value> {
        &mut self.data
    }

    /// Always `true`; kept for parity with code that checks the flag.
    #[must_use]
    pub const fn is_boom(&self) -> bool {
        true
    }

    #[must_use]
    pub fn is_server(&self) -> bool {
        self.is_server
    }

    #[must_use]
    pub fn is_developer_error(&self) -> bool {
        self.is_developer_error
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.is_missing
    }

    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.output.status_code
    }

    /// The payload is the only part of the output open to extension.
    pub fn payload_mut(&mut self) -> &mut Payload {
        &mut self.output.payload
    }
}

macro_rules! status_constructors {
    ($($(#[$doc:meta])* $name:ident => $status:expr;)+) => {
        impl Boom {
            $(
                $(#[$doc])*
                #[must_use]
                pub fn $name(message: Option<&str>, data: Option<Value>) -> Self {
                    Self::create_unchecked($status, message, data)
                }
            )+
        }
    };
}

status_constructors! {
    /// 400 Bad Request.
    bad_request => 400;
    /// 402 Payment Required.
    payment_required => 402;
    /// 403 Forbidden.
    forbidden => 403;
    /// 404 Not Found.
    not_found => 404;
    /// 406 Not Acceptable.
    not_acceptable => 406;
    /// 407 Proxy Authentication Required.
    proxy_auth_required => 407;
    /// 408 Request Timeout.
    client_timeout => 408;
    /// 409 Conflict.
    conflict => 409;
    /// 410 Gone.
    resource_gone => 410;
    /// 411 Length Required.
    length_required => 411;
    /// 412 Precondition Failed.
    precondition_failed => 412;
    /// 413 Payload Too Large.
    entity_too_large => 413;
    /// 414 URI Too Long.
    uri_too_long => 414;
    /// 415 Unsupported Media Type.
    unsupported_media_type => 415;
    /// 416 Range Not Satisfiable.
    range_not_satisfiable => 416;
    /// 417 Expectation Failed.
    expectation_failed => 417;
    /// 418 I'm a teapot.
    teapot => 418;
    /// 422 Unprocessable Entity.
    bad_data => 422;
    /// 423 Locked.
    locked => 423;
    /// 428 Precondition Required.
    precondition_required => 428;
    /// 429 Too Many Requests.
    too_many_requests => 429;
    /// 451 Unavailable For Legal Reasons.
    illegal => 451;
    /// 500 Internal Server Error. The payload hides the message.
    internal => 500;
    /// 501 Not Implemented.
    not_implemented => 501;
    /// 502 Bad Gateway.
    bad_gateway => 502;
    /// 503 Service Unavailable.
    server_unavailable => 503;
    /// 504 Gateway Timeout.
    gateway_timeout => 504;
}

impl fmt::Display for Boom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Boom {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}
