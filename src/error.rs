//! Error types.
//!
//! Only [`DirectorError`] ever reaches callers of the director. Everything
//! else is recovered where it happens and reported through `tracing`.

use thiserror::Error;

/// Errors returned by [`SceneDirector`](crate::SceneDirector) operations.
#[derive(Debug, Error)]
pub enum DirectorError {
    /// The view loader could not build the view for a `prepare` call.
    #[error(transparent)]
    Load(LoadError),

    /// The controller named by the view could not be constructed.
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),

    /// `show` was called with a name that is not registered.
    #[error("scene '{0}' has not been prepared")]
    UnpreparedScene(String),

    /// A show request was rejected because a transition is still running.
    #[error("cannot show '{requested}': transition to '{pending}' is still running")]
    TransitionInFlight { requested: String, pending: String },
}

impl From<LoadError> for DirectorError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Controller(inner) => DirectorError::Instantiation(inner),
            other => DirectorError::Load(other),
        }
    }
}

/// Errors produced by a [`ViewLoader`](crate::ViewLoader).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("view '{location}' not found")]
    NotFound { location: String },

    #[error("malformed view '{location}': {message}")]
    Malformed { location: String, message: String },

    #[error("failed to read view '{location}'")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Controller(#[from] InstantiationError),

    #[error("view loader failed for '{location}'")]
    Other {
        location: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A controller type has no registered no-argument construction path.
#[derive(Debug, Error)]
#[error("no constructor registered for controller type '{type_name}'")]
pub struct InstantiationError {
    pub type_name: String,
}

impl InstantiationError {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

/// Why a resolved value could not be assigned to a field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssignError {
    #[error("expected {expected}, found {found} value")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot parse '{value}' as {expected}")]
    Parse {
        expected: &'static str,
        value: String,
    },

    #[error("no injectable field named '{0}'")]
    UnknownField(String),
}

/// Failures while reading a property resource.
#[derive(Debug, Error)]
pub enum PropertiesError {
    #[error("malformed \\uXXXX escape on line {line}")]
    MalformedEscape { line: usize },
}

/// A value source failed while looking up a name.
#[derive(Debug, Error)]
#[error("{source_name} failed to look up '{key}'")]
pub struct SourceError {
    pub source_name: &'static str,
    pub key: String,
    #[source]
    pub cause: Box<dyn std::error::Error + Send + Sync>,
}
