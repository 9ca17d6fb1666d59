//! Error types for wavegrid

use thiserror::Error;

/// Main error type for wavegrid operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Visualization error: {0}")]
    Visualization(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_errors_become_config_errors() {
        let err: Error = toml::from_str::<toml::Value>("[grid").unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
