//! Daily digest of recently edited Notion pages.
//!
//! This crate provides:
//! - Notion page search and tracking-record creation
//! - Prior-day filtering in a fixed civil timezone (KST)
//! - Title and editor extraction from page records
//! - HTML digest generation and per-recipient SMTP delivery

pub mod config;
pub mod digest;
pub mod error;
pub mod extract;
pub mod notion;
pub mod pipeline;
pub mod window;

// Re-export main types
pub use config::{NotionConfig, SmtpConfig};
pub use digest::{DigestEntry, DigestGenerator, DigestMailer, EmailSender};
pub use error::{DigestError, Result};
pub use notion::{NotionClient, Page, TrackingRecord, WorkspaceApi};
pub use pipeline::{FailurePolicy, Pipeline, PipelineConfig, RunOutcome, RunSummary};
pub use window::TimeWindow;
