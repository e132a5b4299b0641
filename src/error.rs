//! Error types for the PDF API adapter

use thiserror::Error;

/// Result type alias for the PDF API adapter
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the PDF API adapter
#[derive(Error, Debug)]
pub enum Error {
    /// Parameter validation failed before any request was sent
    #[error("{reason}")]
    Validation { reason: String },

    /// The item has no binary payload under the referenced property
    #[error("Binary property \"{property}\" not found")]
    MissingBinaryProperty { property: String },

    /// Adapter or server configuration is unusable
    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    /// Endpoint URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP transport failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Response body exceeded the configured cap
    #[error("Response too large: {size} bytes (max: {max_size} bytes)")]
    ResponseTooLarge { size: u64, max_size: u64 },

    /// Remote API answered with an error status
    #[error("Remote API returned status {status}: {body}")]
    RemoteStatus {
        status: u16,
        body: serde_json::Value,
    },

    /// Processing of a single item failed and aborted the batch
    #[error("Item {index}: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// Base64 decode error
    #[error("Invalid base64 data: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Local binary input file does not exist
    #[error("Binary input not found: {path}")]
    BinaryNotFound { path: String },

    /// Path access denied (outside allowed resource directories)
    #[error("Path access denied: {path}")]
    PathAccessDenied { path: String },
}

impl Error {
    /// Wrap an error with the index of the item that produced it.
    pub fn at_item(self, index: usize) -> Self {
        match self {
            Error::ItemFailed { .. } => self,
            other => Error::ItemFailed {
                index,
                source: Box::new(other),
            },
        }
    }

    /// Index of the failing item, if this error was attributed to one.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Error::ItemFailed { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Return a sanitized error message safe to send to clients.
    /// Local paths and low-level library details are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::Validation { reason } => reason.clone(),
            Error::MissingBinaryProperty { property } => {
                format!("Binary property \"{}\" not found", property)
            }
            Error::Configuration { reason } => format!("Invalid configuration: {}", reason),
            Error::InvalidUrl(_) => "Invalid URL".to_string(),
            Error::HttpRequest(e) if e.is_timeout() => "HTTP request timed out".to_string(),
            Error::HttpRequest(e) => format!("HTTP request failed: {}", e),
            Error::ResponseTooLarge { max_size, .. } => {
                format!("Response exceeds maximum size of {} bytes", max_size)
            }
            Error::RemoteStatus { status, .. } => {
                format!("Remote API returned status {}", status)
            }
            Error::ItemFailed { index, source } => {
                format!("Item {}: {}", index, source.client_message())
            }
            Error::Base64Decode(_) => "Invalid base64 data".to_string(),
            Error::Serialization(_) => "Serialization error".to_string(),
            Error::Io(_) => "I/O error".to_string(),
            Error::BinaryNotFound { .. } => "Binary input not found".to_string(),
            Error::PathAccessDenied { .. } => "Access denied".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_item_wraps_once() {
        let err = Error::Validation {
            reason: "bad".to_string(),
        }
        .at_item(3)
        .at_item(7);
        assert_eq!(err.item_index(), Some(3));
        assert_eq!(err.to_string(), "Item 3: bad");
    }

    #[test]
    fn test_client_message_hides_paths() {
        let err = Error::PathAccessDenied {
            path: "/etc/shadow".to_string(),
        };
        assert_eq!(err.client_message(), "Access denied");

        let err = Error::BinaryNotFound {
            path: "/home/me/secret.pdf".to_string(),
        };
        assert!(!err.client_message().contains("/home"));
    }

    #[test]
    fn test_missing_binary_property_message() {
        let err = Error::MissingBinaryProperty {
            property: "data".to_string(),
        };
        assert_eq!(err.to_string(), "Binary property \"data\" not found");
        assert_eq!(err.client_message(), err.to_string());
    }
}
