//! @ai:module:intent Define error types for report loading and annotation
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all report-annotate operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid XML in {origin}: {reason}")]
    MalformedDocument { origin: String, reason: String },

    #[error("Invalid JSON in {origin}: {source}")]
    InvalidJson {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// @ai:intent Read a report file, distinguishing a missing path from other IO failures
/// @ai:effects fs:read
pub(crate) fn read_input(path: &std::path::Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_is_reported_with_path() {
        let err = read_input(std::path::Path::new("does/not/exist.xml")).unwrap_err();

        assert!(matches!(err, Error::InputNotFound(_)));
        assert_eq!(err.to_string(), "Report file not found: does/not/exist.xml");
    }
}
