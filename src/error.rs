//! Error types and handling for the `TripAI` backend

use thiserror::Error;

/// Main error type for the `TripAI` backend
#[derive(Error, Debug)]
pub enum TripAiError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Outbound API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A requested record does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The caller does not own the requested record
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Storage operation errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl TripAiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new forbidden error
    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripAiError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TripAiError::Api { .. } => {
                "Unable to reach the AI service. Please try again later.".to_string()
            }
            TripAiError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TripAiError::NotFound { message } => message.clone(),
            TripAiError::Forbidden { .. } => {
                "You do not have access to this record.".to_string()
            }
            TripAiError::Storage { .. } => {
                "Storage operation failed. Please try again.".to_string()
            }
            TripAiError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TripAiError::General { message } => message.clone(),
        }
    }
}
