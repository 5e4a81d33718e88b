use std::fmt;
use std::io;

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failure loading or saving a buffer.
#[derive(Debug)]
pub enum Error {
    /// File was not found on disk.
    FileNotFound,
    /// Operation failed due to insufficient permissions.
    PermissionDenied,
    /// The buffer has no backing path to save to.
    NoPath,
    /// Catch-all for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileNotFound => write!(f, "file not found"),
            Error::PermissionDenied => write!(f, "permission denied"),
            Error::NoPath => write!(f, "no file path"),
            Error::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound,
            io::ErrorKind::PermissionDenied => Error::PermissionDenied,
            _ => Error::Io(err),
        }
    }
}
