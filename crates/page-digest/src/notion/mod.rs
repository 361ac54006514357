//! Notion workspace access.
//!
//! Provides the page search and tracking-record calls used by the digest.

mod client;
mod types;

pub use client::{NotionClient, TrackingSchema, WorkspaceApi, TRACKING_ICON_URL};
pub use types::{
    Page, PropertyValue, RichText, SearchResponse, TrackingRecord, UserRef, UsersResponse,
    WorkspaceUser,
};
