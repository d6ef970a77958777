//! Error types for the iSCSI responder
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using IscsiError
pub type Result<T> = std::result::Result<T, IscsiError>;

/// Unified error type for codec, network and configuration failures
#[derive(Debug, Error)]
pub enum IscsiError {
    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    /// Fewer bytes than a full header; buffer more and retry.
    #[error("Incomplete iSCSI message: expected {expected} bytes, got {actual}")]
    IncompleteMessage { expected: usize, actual: usize },

    #[error("Malformed iSCSI header: {0}")]
    MalformedHeader(String),

    /// Internal invariant violation while writing a header image.
    #[error("Failed to encode iSCSI header: {0}")]
    EncodingFailure(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
