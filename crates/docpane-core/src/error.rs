//! Error types and handling for docpane-core operations.
//!
//! Every failure the viewer engine can hit flows through [`Error`]. The
//! variants follow the error taxonomy of the viewer: load failures abort a
//! whole document batch, render and timeout failures degrade the UI rather
//! than crash it, and not-found slugs are soft errors surfaced in the
//! content pane.
//!
//! ## Recovery Hints
//!
//! Errors carry a coarse recoverability signal so callers can decide
//! between retrying and degrading:
//!
//! ```rust
//! use docpane_core::Error;
//!
//! let err = Error::Timeout("renderer never became ready".into());
//! assert!(err.is_recoverable());
//! assert_eq!(err.category(), "timeout");
//! ```

use thiserror::Error;

/// The main error type for docpane-core operations.
///
/// All public functions in docpane-core return `Result<T, Error>` for
/// consistent error handling. `Display` gives the user-facing message that
/// ends up in the content pane; the source chain is preserved for network
/// and I/O variants.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers filesystem operations such as reading or writing the viewer
    /// configuration and the persisted theme preference.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers HTTP requests for the manifest and for individual documents.
    /// The underlying `reqwest::Error` is preserved for detailed connection
    /// information.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The manifest or document batch failed to load.
    ///
    /// The initial load is all-or-nothing: one failed document fetch aborts
    /// the whole batch and surfaces as a single load failure. Not retried
    /// automatically.
    #[error("Load error: {0}")]
    Load(String),

    /// The renderer collaborator failed.
    ///
    /// Caught at the render boundary; the content pane shows a generic
    /// rendering-failure message (or the raw text in degraded mode) and
    /// navigation/TOC state stays intact.
    #[error("Render error: {0}")]
    Render(String),

    /// Requested resource was not found.
    ///
    /// Used for slugs with no matching document and for 404 responses.
    /// Navigation state is left pointing at the unresolved slug rather than
    /// silently redirecting.
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL is malformed or invalid.
    ///
    /// Occurs when a manifest path cannot be resolved against the manifest
    /// base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation timed out.
    ///
    /// Soft failure: the renderer readiness poll gave up. The viewer
    /// continues in a degraded mode where render calls fall back to raw
    /// text instead of failing.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization or deserialization failed.
    ///
    /// Occurs when the manifest JSON or a TOML config/preference file does
    /// not match the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for errors that are typically temporary: network
    /// timeouts and connection failures, interrupted I/O, and the renderer
    /// readiness timeout. Parse, config, and not-found errors are permanent.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::WouldBlock
            ),
            Self::Timeout(_) => true,
            _ => false,
        }
    }

    /// Coarse category label for logging and error surfaces.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Load(_) => "load",
            Self::Render(_) => "render",
            Self::NotFound(_) => "not_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
        }
    }
}

/// Convenient result alias used throughout docpane-core.
pub type Result<T> = std::result::Result<T, Error>;
