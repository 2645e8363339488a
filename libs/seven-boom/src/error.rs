use crate::constructor::Shape;
use crate::spec::SpecError;

/// Error returned by the factory and the decorated constructors.
///
/// Failures of the underlying error library come through unchanged as
/// [`Error::Boom`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("error factory has not been initialized")]
    NotInitialized,

    #[error("unknown error constructor '{name}'")]
    UnknownConstructor { name: String },

    #[error("constructor '{constructor}' takes {expected}, got {actual}")]
    ShapeMismatch {
        constructor: &'static str,
        expected: Shape,
        actual: Shape,
    },

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Boom(#[from] boom::Error),

    #[error("default provider for '{argument}' failed")]
    DefaultProvider {
        argument: String,
        #[source]
        source: anyhow::Error,
    },
}
