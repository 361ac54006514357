//! Page digest CLI - emails yesterday's Notion page updates.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use page_digest::config::{NotionConfig, SmtpConfig};
use page_digest::digest::{DigestMailer, EmailSender};
use page_digest::notion::NotionClient;
use page_digest::pipeline::{FailurePolicy, Pipeline, PipelineConfig, RunOutcome, RunSummary};
use page_digest::window::parse_reference_date;

/// Page digest CLI - track and email pages edited yesterday.
#[derive(Parser)]
#[command(name = "page-digest")]
#[command(about = "Daily digest of recently edited Notion pages")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a single digest cycle (for CronJob use)
    Run {
        /// Digest recipient (repeatable)
        #[arg(long = "to", env = "DIGEST_RECIPIENTS", value_delimiter = ',')]
        recipients: Vec<String>,

        /// Reference date (YYYYMMDD); the digest covers the day before it
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Fail on search or tracking-record errors instead of logging them
        #[arg(long)]
        strict: bool,

        /// Print the digest without creating records or sending email
        #[arg(long)]
        dry_run: bool,
    },

    /// List workspace users (ID and name)
    Users,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("page_digest=debug,info")
    } else {
        EnvFilter::new("page_digest=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            recipients,
            date,
            strict,
            dry_run,
        } => {
            tracing::info!(
                recipients = recipients.len(),
                date = ?date,
                strict,
                dry_run,
                "Digest command invoked"
            );
            run_digest(recipients, date, strict, dry_run).await
        }
        Commands::Users => run_users().await,
    }
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_reference_date(raw).map_err(|e| e.to_string())
}

async fn run_digest(
    recipients: Vec<String>,
    date: Option<NaiveDate>,
    strict: bool,
    dry_run: bool,
) -> Result<()> {
    let notion_config = NotionConfig::from_env().context("Failed to load Notion configuration")?;

    let config = PipelineConfig {
        recipients,
        reference_date: date,
        failure_policy: if strict {
            FailurePolicy::Strict
        } else {
            FailurePolicy::Lenient
        },
        dry_run,
        ..Default::default()
    };

    let summary = if dry_run {
        let client = NotionClient::new(notion_config)?;
        Pipeline::new(config, client, SkipMailer).run().await?
    } else {
        notion_config.require_database_id()?;

        let smtp_config = SmtpConfig::from_env().context("Failed to load SMTP configuration")?;
        let client = NotionClient::new(notion_config)?;
        let sender = EmailSender::new(smtp_config)?;
        Pipeline::new(config, client, sender)
            .run()
            .await?
    };

    print_summary(&summary);
    Ok(())
}

async fn run_users() -> Result<()> {
    let client = NotionClient::from_env()?;
    let users = client.list_users().await?;

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    for user in &users {
        println!(
            "{}  {}",
            user.id,
            user.name.as_deref().unwrap_or("(unnamed)")
        );
    }
    println!("\nTotal: {} users", users.len());

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Digest Summary ({})", summary.window.civil_date());
    println!("   Fetched: {}", summary.fetched);
    println!("   Selected: {}", summary.selected);
    println!("   Records created: {}", summary.records_created);
    println!("   Emails sent: {}", summary.emails_sent);

    if !summary.record_failures.is_empty() {
        println!("   Record failures: {}", summary.record_failures.len());
        for err in &summary.record_failures {
            eprintln!("     - {err}");
        }
    }

    match summary.outcome {
        RunOutcome::SearchFailed => println!("\n❌ Search failed, nothing sent"),
        RunOutcome::NoDocuments => println!("\n📭 Search returned no pages"),
        RunOutcome::NothingInWindow => println!("\n📭 No pages edited in window"),
        RunOutcome::DryRun => {
            println!("\n📝 Dry run, digest body:\n");
            if let Some(body) = &summary.html_body {
                println!("{body}");
            }
        }
        RunOutcome::Sent => println!("\n✅ Digest sent"),
    }
}

/// Mailer for dry runs, where the pipeline never reaches delivery.
struct SkipMailer;

#[async_trait]
impl DigestMailer for SkipMailer {
    async fn send_digest(
        &self,
        recipients: &[String],
        _subject: &str,
        _html_body: &str,
        _text_body: &str,
    ) -> page_digest::Result<usize> {
        tracing::debug!(recipients = recipients.len(), "Dry run, not sending");
        Ok(0)
    }
}
