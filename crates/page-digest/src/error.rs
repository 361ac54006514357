//! Error types for the page digest.

use thiserror::Error;

/// Errors that can occur while building and delivering a digest.
#[derive(Debug, Error)]
pub enum DigestError {
    /// HTTP request failed before a status was received, or the body was unreadable
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Search endpoint answered with a non-success status
    #[error("Search request failed ({status}): {body}")]
    Search { status: u16, body: String },

    /// Record-creation endpoint answered with a non-success status
    #[error("Failed to create tracking record for page {page_id} ({status}): {body}")]
    TrackingRecord {
        page_id: String,
        status: u16,
        body: String,
    },

    /// Any other API call answered with a non-success status
    #[error("Notion API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// SMTP delivery failed; recipients after this one were not attempted
    #[error("Failed to send digest to {recipient} after {delivered} successful deliveries: {source}")]
    Email {
        recipient: String,
        delivered: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// SMTP transport could not be set up
    #[error("Failed to set up SMTP transport: {0}")]
    SmtpTransport(#[source] lettre::transport::smtp::Error),

    /// Email message could not be built
    #[error("Failed to build email message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Sender or recipient address is not a valid mailbox
    #[error("Invalid email address {address}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// Reference date was not an 8-digit calendar date
    #[error("Invalid reference date {0:?}, expected YYYYMMDD")]
    InvalidReferenceDate(String),

    /// Required configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = DigestError> = std::result::Result<T, E>;
