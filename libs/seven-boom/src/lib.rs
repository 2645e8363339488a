//! Boom error constructors with configurable extra payload fields
//!
//! An [`ErrorFactory`] is initialized with a list of [`ArgumentSpec`]s. Every
//! error constructor it hands out accepts one extra slot per argument, in
//! `order`, and writes the resolved values into the error's output payload:
//! - an explicitly supplied value (including `null`) is written as is
//! - an omitted value falls back to the argument's default, if any
//! - `timeThrown` and `guid` get generated defaults unless one is configured
//!
//! `create` and `wrap` keep their own signatures and only receive
//! `timeThrown` and `guid`.
//!
//! ```
//! use seven_boom::{ArgumentSpec, ErrorFactory, ExtraArgs};
//!
//! let factory = ErrorFactory::with_arguments([
//!     ArgumentSpec::new("errorCode", 1),
//!     ArgumentSpec::new("guid", 2),
//! ])?;
//! let err = factory.bad_request(Some("bad input"), None, &ExtraArgs::new().push("E_INPUT"))?;
//! assert_eq!(err.output().payload()["errorCode"], "E_INPUT");
//! assert!(err.output().payload().contains_key("guid"));
//! # Ok::<(), seven_boom::Error>(())
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod args;
pub mod config;
pub mod constructor;
pub mod engine;
pub mod error;
pub mod factory;
pub mod spec;

// Re-export commonly used types
pub use args::{CoreArgs, ExtraArgs};
pub use config::{ConfigError, SevenBoomConfig};
pub use constructor::{Constructor, Shape};
pub use engine::{DecoratedConstructor, decorate};
pub use error::Error;
pub use factory::ErrorFactory;
pub use spec::{
    ArgumentSpec, ArgumentSpecification, DefaultValue, GUID, SpecError, TIME_THROWN, canonicalize,
};

pub use boom::{AuthAttributes, AuthScheme, Boom, Output, Payload, StatusInput, WrapTarget};
