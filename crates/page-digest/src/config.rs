//! Configuration for the Notion client and the SMTP notifier.

use crate::error::{DigestError, Result};

/// Default Notion API base URL.
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";

/// Notion API version sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2025-09-03";

/// Default SMTP port (implicit TLS).
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Notion API access settings.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    /// Integration token.
    pub api_key: String,
    /// Value of the `Notion-Version` header.
    pub version: String,
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Database that receives tracking records.
    pub database_id: Option<String>,
}

impl NotionConfig {
    /// Create configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `NOTION_API_KEY`: integration token
    ///
    /// # Optional Environment Variables
    /// - `NOTION_VERSION`: API version (default: 2025-09-03)
    /// - `NOTION_BASE_URL`: API base URL (default: https://api.notion.com/v1)
    /// - `ADDED_DB_ID`: tracking database ID (required to create records)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, "NOTION_API_KEY")?;

        let version = lookup("NOTION_VERSION").unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string());

        let base_url = lookup("NOTION_BASE_URL")
            .unwrap_or_else(|| DEFAULT_NOTION_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let database_id = lookup("ADDED_DB_ID").filter(|v| !v.is_empty());

        Ok(Self {
            api_key,
            version,
            base_url,
            database_id,
        })
    }

    /// Tracking database ID, or a configuration error when it is not set.
    pub fn require_database_id(&self) -> Result<&str> {
        self.database_id
            .as_deref()
            .ok_or_else(|| DigestError::Config("ADDED_DB_ID environment variable not set".into()))
    }
}

/// SMTP relay settings for the digest sender.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// Sender address, also used as the login name.
    pub sender: String,
    /// Sender password.
    pub password: String,
}

impl SmtpConfig {
    /// Create configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `SMTP_SERVER`: relay hostname
    /// - `SENDER_EMAIL`: sender address and login
    /// - `SENDER_PW`: sender password
    ///
    /// # Optional Environment Variables
    /// - `SMTP_PORT`: relay port (default: 465)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = required(&lookup, "SMTP_SERVER")?;
        let sender = required(&lookup, "SENDER_EMAIL")?;
        let password = required(&lookup, "SENDER_PW")?;

        let port = match lookup("SMTP_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| DigestError::Config(format!("SMTP_PORT is not a valid port: {raw}")))?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            host,
            port,
            sender,
            password,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DigestError::Config(format!("{key} environment variable not set")))
}
