/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    /// The application target could not be located or loaded
    Resolution { target: String, message: String },
    /// The target was found but is not (and does not return) an application
    NotAnApplication { target: String, found: String },
    /// A method outside the canonical ordering reached a sort
    MethodOrdering { method: String },
}

impl Error {
    /// Whether this error means the user named a bad target.
    ///
    /// These are reported as usage errors rather than internal failures.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Error::Resolution { .. } | Error::NotAnApplication { .. }
        )
    }

    pub(crate) fn resolution(target: &str, message: impl Into<String>) -> Self {
        Error::Resolution {
            target: target.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::Resolution { target, message } => {
                write!(f, "can't import \"{}\": {}", target, message)
            }
            Error::NotAnApplication { target, found } => write!(
                f,
                "\"{}\" is not (or did not return) an application (type: {})",
                target, found
            ),
            Error::MethodOrdering { method } => {
                write!(f, "method {} is not in the canonical method ordering", method)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}
