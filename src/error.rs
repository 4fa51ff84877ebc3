use std::{error::Error as StdError, fmt, io};

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while building, training or querying a model.
#[derive(Debug)]
pub enum Error {
    /// The loss selector names no known loss function.
    UnsupportedLoss(String),
    /// The model has no layers to run.
    EmptyModel,
    /// Two shapes that must agree do not.
    ShapeMismatch {
        /// What was being compared (e.g. "predicted vs target").
        what: &'static str,
        got: (usize, usize),
        expected: (usize, usize),
    },
    /// A hyperparameter or architecture value is out of range.
    InvalidConfig(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedLoss(name) => write!(f, "{name} is not supported"),
            Error::EmptyModel => write!(f, "model has no layers"),
            Error::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "shape mismatch for {what}: got {}x{}, expected {}x{}",
                got.0, got.1, expected.0, expected.1
            ),
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Returns `ShapeMismatch` unless `got == expected`.
pub(crate) fn ensure_shape(
    what: &'static str,
    got: (usize, usize),
    expected: (usize, usize),
) -> Result<()> {
    if got == expected {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            what,
            got,
            expected,
        })
    }
}
