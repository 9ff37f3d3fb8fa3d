//! Error types for the page-cache monitor

use std::fmt;

#[derive(Debug)]
pub enum MonitorError {
    Io(Box<std::io::Error>),
    /// Creating a new probe failed; without fresh probes nothing can be measured
    ProbeCreate(Box<std::io::Error>),
    /// A file in the probe directory is not named by an integer timestamp
    InvalidProbeName(String),
    /// No probes survived to derive a metric from
    EmptyInventory,
    Residency(page_residency::ResidencyError),
    Config(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Io(err) => write!(f, "IO error: {}", err),
            MonitorError::ProbeCreate(err) => write!(f, "Probe creation error: {}", err),
            MonitorError::InvalidProbeName(name) => {
                write!(f, "Invalid probe name: {}", name)
            }
            MonitorError::EmptyInventory => write!(f, "Probe inventory is empty"),
            MonitorError::Residency(err) => write!(f, "Residency check error: {}", err),
            MonitorError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Io(err) => Some(err.as_ref()),
            MonitorError::ProbeCreate(err) => Some(err.as_ref()),
            MonitorError::Residency(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::Io(Box::new(err))
    }
}

impl From<page_residency::ResidencyError> for MonitorError {
    fn from(err: page_residency::ResidencyError) -> Self {
        MonitorError::Residency(err)
    }
}

impl From<tracing_subscriber::filter::ParseError> for MonitorError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        MonitorError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_probe_name_display() {
        let err = MonitorError::InvalidProbeName("not-a-timestamp".to_string());
        assert_eq!(format!("{}", err), "Invalid probe name: not-a-timestamp");
    }

    #[test]
    fn test_empty_inventory_display() {
        let err = MonitorError::EmptyInventory;
        assert_eq!(format!("{}", err), "Probe inventory is empty");
    }

    #[test]
    fn test_probe_create_display() {
        let err = MonitorError::ProbeCreate(Box::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )));
        assert_eq!(format!("{}", err), "Probe creation error: disk full");
    }

    #[test]
    fn test_config_error_display() {
        let err = MonitorError::Config("missing PROBE_DIR".to_string());
        assert_eq!(format!("{}", err), "Configuration error: missing PROBE_DIR");
    }

    #[test]
    fn test_residency_error_display() {
        let err = MonitorError::from(page_residency::ResidencyError::EmptyFile);
        assert!(format!("{}", err).contains("Cannot map zero size file"));
    }

    #[test]
    fn test_error_is_debug() {
        let err = MonitorError::EmptyInventory;
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("EmptyInventory"));
    }
}
