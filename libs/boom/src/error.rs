//! Failures raised while building a [`Boom`](crate::Boom).

/// Error returned by the fallible constructors (`create`, `wrap`, `unauthorized`,
/// `method_not_allowed`).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("First argument must be a number (400+): {input}")]
    InvalidStatusCode { input: String },

    #[error("Bad attribute value ({value})")]
    InvalidAttribute { value: String },

    #[error("invalid value for header '{name}'")]
    InvalidHeaderValue {
        name: http::header::HeaderName,
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}
