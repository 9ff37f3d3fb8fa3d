//! Error types for residency checks

use std::fmt;

#[derive(Debug)]
pub enum ResidencyError {
    /// A zero-length file has no pages to map
    EmptyFile,
    Io(Box<std::io::Error>),
}

impl fmt::Display for ResidencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResidencyError::EmptyFile => write!(f, "Cannot map zero size file"),
            ResidencyError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ResidencyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResidencyError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ResidencyError {
    fn from(err: std::io::Error) -> Self {
        ResidencyError::Io(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ResidencyError>;
