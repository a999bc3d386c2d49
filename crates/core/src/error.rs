//! Error types for swo-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for swo-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for swo-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or missing command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Container or object not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote call failed (network, remote-side rejection)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local file open/create/read/stat failure
    #[error("Local IO error: {0}")]
    LocalIo(String),

    /// Source file exceeds the single-object size ceiling
    #[error("File too large: {0}")]
    FileTooLarge(String),

    /// Non-2xx status on a raw HTTP request
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Prefix the error message with the name of the failing operation.
    ///
    /// The variant is preserved so exit code mapping still works.
    pub fn context(self, op: &str) -> Self {
        let wrap = |msg: String| format!("{op}: {msg}");
        match self {
            Error::Auth(m) => Error::Auth(wrap(m)),
            Error::NotFound(m) => Error::NotFound(wrap(m)),
            Error::Transport(m) => Error::Transport(wrap(m)),
            Error::LocalIo(m) => Error::LocalIo(wrap(m)),
            Error::FileTooLarge(m) => Error::FileTooLarge(wrap(m)),
            Error::Protocol(m) => Error::Protocol(wrap(m)),
            Error::General(m) => Error::General(wrap(m)),
            other => other,
        }
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArguments(_) => 2,                     // UsageError
            Error::Config(_) => 2,                               // UsageError
            Error::FileTooLarge(_) => 2,                         // UsageError
            Error::Transport(_) | Error::Protocol(_) => 3,       // NetworkError
            Error::Auth(_) => 4,                                 // AuthError
            Error::NotFound(_) | Error::ProfileNotFound(_) => 5, // NotFound
            Error::LocalIo(_) => 6,                              // LocalIoError
            _ => 1,                                              // GeneralError
        }
    }
}
