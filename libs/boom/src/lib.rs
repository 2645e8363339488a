//! HTTP-friendly error objects
//!
//! This crate provides the error object the rest of the workspace decorates,
//! with no dependencies on HTTP frameworks. It includes:
//! - `Boom`, carrying a message, opaque `data` and a response `Output`
//!   (status code, headers, public payload)
//! - One constructor per supported status, plus `create` and `wrap`
//! - Status coercion (`StatusInput`) and reason phrases
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod auth;
pub mod boom;
pub mod error;
pub mod status;

// Re-export commonly used types
pub use auth::{AuthAttributes, AuthScheme};
pub use boom::{Boom, INTERNAL_MESSAGE, Output, Payload, WrapTarget};
pub use error::Error;
pub use status::{StatusInput, UNKNOWN_REASON, reason_phrase};
