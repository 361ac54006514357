//! Digest pipeline - orchestrates the search-filter-record-notify flow.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::digest::{DigestEntry, DigestGenerator, DigestMailer};
use crate::error::{DigestError, Result};
use crate::extract::{extract_editor_id, extract_title};
use crate::notion::{TrackingRecord, WorkspaceApi};
use crate::window::{civil_timezone, select_in_window, TimeWindow, CIVIL_TZ_LABEL};

/// How search and tracking-record failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log and carry on: a failed search ends the run quietly, a failed
    /// tracking record is counted and skipped.
    #[default]
    Lenient,
    /// Return the first search or tracking-record error.
    Strict,
}

/// Configuration for the digest pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Digest recipients, one message each.
    pub recipients: Vec<String>,
    /// Reference date; the digest covers the day before it. Today when unset.
    pub reference_date: Option<NaiveDate>,
    /// Civil timezone for day boundaries.
    pub timezone: FixedOffset,
    /// Label printed after localized timestamps.
    pub timezone_label: String,
    /// Failure handling for search and tracking records.
    pub failure_policy: FailurePolicy,
    /// Skip tracking records and email; only build the digest.
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recipients: Vec::new(),
            reference_date: None,
            timezone: civil_timezone(),
            timezone_label: CIVIL_TZ_LABEL.to_string(),
            failure_policy: FailurePolicy::Lenient,
            dry_run: false,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Search failed and the failure was suppressed.
    SearchFailed,
    /// Search returned no pages.
    NoDocuments,
    /// No page was edited inside the window.
    NothingInWindow,
    /// Digest built but not sent (dry run).
    DryRun,
    /// Digest sent to every recipient.
    Sent,
}

/// Result of a single run.
#[derive(Debug)]
pub struct RunSummary {
    /// Window the run covered.
    pub window: TimeWindow,
    /// Pages returned by search.
    pub fetched: usize,
    /// Pages inside the window.
    pub selected: usize,
    /// Tracking records created.
    pub records_created: usize,
    /// Tracking records that failed (lenient policy only).
    pub record_failures: Vec<String>,
    /// Messages delivered.
    pub emails_sent: usize,
    /// Digest entries, in digest order.
    pub entries: Vec<DigestEntry>,
    /// HTML body, when at least one entry was produced.
    pub html_body: Option<String>,
    /// How the run ended.
    pub outcome: RunOutcome,
}

impl RunSummary {
    fn new(window: TimeWindow, outcome: RunOutcome) -> Self {
        Self {
            window,
            fetched: 0,
            selected: 0,
            records_created: 0,
            record_failures: Vec::new(),
            emails_sent: 0,
            entries: Vec::new(),
            html_body: None,
            outcome,
        }
    }
}

/// Digest pipeline orchestrator.
pub struct Pipeline<A, M> {
    config: PipelineConfig,
    api: A,
    mailer: M,
}

impl<A: WorkspaceApi, M: DigestMailer> Pipeline<A, M> {
    /// Create a new pipeline.
    #[must_use]
    pub fn new(config: PipelineConfig, api: A, mailer: M) -> Self {
        Self {
            config,
            api,
            mailer,
        }
    }

    /// Workspace API the pipeline reads from and writes to.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Mailer used for delivery.
    #[must_use]
    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Run once, using the current time when no reference date is set.
    pub async fn run(&self) -> Result<RunSummary> {
        self.run_at(Utc::now()).await
    }

    /// Run once as if the current time were `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        if !self.config.dry_run && self.config.recipients.is_empty() {
            return Err(DigestError::Config("no digest recipients configured".into()));
        }

        let window = TimeWindow::for_reference(self.config.reference_date, self.config.timezone, now);

        tracing::info!(
            start = %window.start(),
            end = %window.end(),
            dry_run = self.config.dry_run,
            "Starting digest run"
        );

        let pages = match self.api.search_recent_pages().await {
            Ok(pages) => pages,
            Err(e) if self.config.failure_policy == FailurePolicy::Lenient => {
                tracing::warn!(error = %e, "Search failed, nothing to send");
                return Ok(RunSummary::new(window, RunOutcome::SearchFailed));
            }
            Err(e) => return Err(e),
        };

        let mut summary = RunSummary::new(window, RunOutcome::NoDocuments);
        summary.fetched = pages.len();

        if pages.is_empty() {
            tracing::info!("Search returned no pages");
            return Ok(summary);
        }

        let selected = select_in_window(&pages, &window);
        summary.selected = selected.len();
        tracing::info!(fetched = summary.fetched, selected = summary.selected, "Filtered pages");

        let date = window.civil_date();

        for (index, item) in selected.iter().enumerate() {
            let page = item.page;
            let title = extract_title(page);
            let editor_id = extract_editor_id(page);

            if !self.config.dry_run {
                let record = TrackingRecord {
                    title: title.to_string(),
                    page_id: page.id.clone(),
                    editor_id: editor_id.map(str::to_string),
                    date: date.clone(),
                };

                match self.api.create_tracking_record(&record).await {
                    Ok(()) => summary.records_created += 1,
                    Err(e) if self.config.failure_policy == FailurePolicy::Lenient => {
                        tracing::warn!(id = %page.id, error = %e, "Tracking record failed");
                        summary.record_failures.push(format!("{}: {e}", page.id));
                    }
                    Err(e) => return Err(e),
                }
            }

            summary.entries.push(DigestEntry {
                ordinal: index + 1,
                title: title.to_string(),
                url: page.url.clone(),
                editor_id: editor_id.map(str::to_string),
                edited_at: item.edited_at,
            });
        }

        let generator = DigestGenerator::new(self.config.timezone_label.clone());
        let (Some(html_body), Some(text_body)) = (
            generator.generate_html(&summary.entries),
            generator.generate_text(&summary.entries),
        ) else {
            tracing::info!("No pages edited in window, skipping email");
            summary.outcome = RunOutcome::NothingInWindow;
            return Ok(summary);
        };

        if self.config.dry_run {
            summary.html_body = Some(html_body);
            summary.outcome = RunOutcome::DryRun;
            return Ok(summary);
        }

        let subject = DigestGenerator::subject(&window.subject_label());
        summary.emails_sent = self
            .mailer
            .send_digest(&self.config.recipients, &subject, &html_body, &text_body)
            .await?;
        summary.html_body = Some(html_body);
        summary.outcome = RunOutcome::Sent;

        tracing::info!(
            selected = summary.selected,
            records_created = summary.records_created,
            record_failures = summary.record_failures.len(),
            emails_sent = summary.emails_sent,
            "Digest run complete"
        );

        Ok(summary)
    }
}
