//! Error handling for citation-manager
//!
//! The error system separates two audiences:
//! 1. **Strongly-typed errors** ([`CiteError`]) for the infrastructural failures that
//!    abort an operation (unreadable file, empty path argument, broken config)
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions for the CLI
//!
//! Broken links and broken anchors are *not* errors in this sense. They are recorded on
//! each citation as a [`ValidationResult`](crate::models::ValidationResult) and reported in
//! aggregate, so a single bad link never aborts validation of its siblings.
//!
//! # Examples
//!
//! ```rust,no_run
//! use citation_manager::core::{CiteError, ErrorContext, user_friendly_error};
//!
//! let error = CiteError::FileNotFound {
//!     path: "docs/missing.md".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for citation-manager operations.
///
/// `CiteError` is `Clone` because the parse cache shares one in-flight parse between
/// every concurrent caller, and each of them receives its own copy of the outcome.
/// I/O failures are therefore captured as messages rather than as [`std::io::Error`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CiteError {
    /// A top-level argument was unusable (for example an empty path).
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Why the argument was rejected
        reason: String,
    },

    /// The file handed to an operation does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path as given by the caller
        path: String,
    },

    /// The file exists but could not be read.
    #[error("Failed to read {path}: {reason}")]
    ReadError {
        /// Path that failed to read
        path: String,
        /// Underlying I/O message
        reason: String,
    },

    /// Configuration file could not be loaded.
    #[error("Invalid configuration in {file}: {reason}")]
    ConfigError {
        /// Configuration file path
        file: String,
        /// What went wrong
        reason: String,
    },

    /// Any other I/O failure.
    #[error("IO error: {0}")]
    IoError(String),

    /// Any other failure.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl From<std::io::Error> for CiteError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}

impl CiteError {
    /// Build a [`CiteError::ReadError`] from an I/O error, mapping "not found" to
    /// [`CiteError::FileNotFound`].
    #[must_use]
    pub fn from_io(path: &std::path::Path, error: &std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Self::ReadError {
                path: path.display().to_string(),
                reason: error.to_string(),
            }
        }
    }
}

/// Error wrapper that carries a suggestion and extra details for terminal display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: CiteError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: CiteError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(cite_error) = error.downcast_ref::<CiteError>() {
        return create_error_context(cite_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                ErrorContext::new(CiteError::IoError(io_error.to_string()))
                    .with_suggestion("Check the file permissions of the documents being validated")
            }
            std::io::ErrorKind::NotFound => {
                ErrorContext::new(CiteError::IoError(io_error.to_string()))
                    .with_suggestion("Check that the file or directory exists and the path is correct")
            }
            _ => ErrorContext::new(CiteError::IoError(io_error.to_string())),
        };
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(CiteError::ConfigError {
            file: crate::constants::CONFIG_FILE_NAME.to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of the configuration file");
    }

    // Fall back to the full anyhow chain as details
    let message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let ctx = ErrorContext::new(CiteError::Other { message });
    if chain.is_empty() {
        ctx
    } else {
        ctx.with_details(chain.join(": "))
    }
}

fn create_error_context(error: CiteError) -> ErrorContext {
    match &error {
        CiteError::InvalidArgument { .. } => ErrorContext::new(error)
            .with_suggestion("Pass the path of an existing markdown file"),
        CiteError::FileNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Check the path, or pass --scope so short file names can be looked up"),
        CiteError::ReadError { .. } => ErrorContext::new(error)
            .with_suggestion("Check that the file is readable and is valid UTF-8"),
        CiteError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax of the configuration file"),
        CiteError::IoError(_) | CiteError::Other { .. } => ErrorContext::new(error),
    }
}
