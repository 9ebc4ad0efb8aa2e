use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the chat analyzer.
///
/// Line-level parse problems never surface here; the parser recovers them
/// locally. Only file access and configuration can fail.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The chat export could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converted copy of an export could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON configuration document could not be parsed.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the chat crates.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ChatError::FileRead {
            path: PathBuf::from("/some/chat.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/chat.txt"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = ChatError::FileWrite {
            path: PathBuf::from("/out/chat_cnv.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to write file /out/chat_cnv.txt"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn test_error_display_config() {
        let err = ChatError::Config("invalid emoji pattern".to_string());
        assert_eq!(err.to_string(), "Configuration error: invalid emoji pattern");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: ChatError = json_err.into();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
