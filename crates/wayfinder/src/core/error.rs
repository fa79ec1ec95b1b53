//! Core error types for graph storage and routing
//!
//! "No path" is not an error: the engine and dispatcher return `Option`.
//! The variants here cover the failures that must reach a caller.

use thiserror::Error;

/// Core error types for the routing service
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid graph name: {name:?}")]
    InvalidGraphName { name: String },

    #[error("Unknown graph: {name:?}")]
    UnknownGraph { name: String },

    #[error("Failed to write graph '{name}': {source}")]
    WriteFailure {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl NavError {
    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new invalid graph name error
    pub fn invalid_graph_name(name: impl Into<String>) -> Self {
        Self::InvalidGraphName { name: name.into() }
    }

    /// Create a new error for a graph that is neither routed nor stored
    pub fn unknown_graph(name: impl Into<String>) -> Self {
        Self::UnknownGraph { name: name.into() }
    }

    /// Create a new write failure for the named graph
    pub fn write_failure(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            name: name.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            NavError::InvalidInput { .. }
                | NavError::InvalidGraphName { .. }
                | NavError::UnknownGraph { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input() {
        let error = NavError::invalid_input("Missing start");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid input"));
        assert!(error_msg.contains("Missing start"));
        assert!(error.is_client_error());
    }

    #[test]
    fn test_invalid_graph_name() {
        let error = NavError::invalid_graph_name("../etc");
        assert_eq!(error.to_string(), "Invalid graph name: \"../etc\"");
        assert!(error.is_client_error());
    }

    #[test]
    fn test_unknown_graph() {
        let error = NavError::unknown_graph("typo");
        assert_eq!(error.to_string(), "Unknown graph: \"typo\"");
        assert!(error.is_client_error());
    }

    #[test]
    fn test_write_failure_keeps_source() {
        use std::error::Error as _;
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let error = NavError::write_failure("campus", io_err);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("campus"));
        assert!(error_msg.contains("read-only"));
        assert!(error.source().is_some());
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_serialize_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: NavError = json_err.into();
        assert!(format!("{}", error).contains("Serialization error"));
    }
}
