use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::answers::{AnswerSet, ContactInfo};
use super::classification::{ClassificationResult, Tier};
use super::session::SessionId;

/// Record handed to the lead pipeline once a qualified respondent submits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub session_id: SessionId,
    pub completed_at: DateTime<Utc>,
    pub tier: Tier,
    pub score: f32,
    pub label: String,
    pub variant: u8,
    pub answers: AnswerSet,
    pub contact: ContactInfo,
}

impl LeadSubmission {
    pub fn new(
        session_id: SessionId,
        answers: AnswerSet,
        contact: ContactInfo,
        classification: &ClassificationResult,
    ) -> Self {
        Self {
            session_id,
            completed_at: Utc::now(),
            tier: classification.tier,
            score: classification.score,
            label: classification.label.clone(),
            variant: classification.variant,
            answers,
            contact,
        }
    }
}

/// Outbound hand-off for completed leads (CRM, spreadsheet, log stream).
pub trait SubmissionSink: Send + Sync {
    fn hand_off(&self, submission: &LeadSubmission) -> Result<(), SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to open lead export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write lead export: {0}")]
    Csv(#[from] csv::Error),
    #[error("lead sink unavailable: {0}")]
    Unavailable(String),
}

/// Emits one structured log line per lead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl SubmissionSink for TracingSink {
    fn hand_off(&self, submission: &LeadSubmission) -> Result<(), SinkError> {
        let answers = serde_json::to_string(&submission.answers)
            .map_err(|err| SinkError::Unavailable(err.to_string()))?;
        info!(
            session = %submission.session_id,
            tier = %submission.tier,
            score = submission.score,
            variant = submission.variant,
            email = %submission.contact.email,
            company = %submission.contact.company,
            answers = %answers,
            "quiz lead submitted"
        );
        Ok(())
    }
}

const CSV_HEADER: [&str; 14] = [
    "session_id",
    "completed_at",
    "tier",
    "score",
    "label",
    "variant",
    "first_name",
    "last_name",
    "email",
    "company",
    "phone",
    "website",
    "answered",
    "answers",
];

/// Appends one row per lead to a CSV file, writing the header when the file
/// starts out empty.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn row(submission: &LeadSubmission) -> Result<Vec<String>, SinkError> {
        let contact = &submission.contact;
        let answers = serde_json::to_string(&submission.answers)
            .map_err(|err| SinkError::Unavailable(err.to_string()))?;
        Ok(vec![
            submission.session_id.to_string(),
            submission
                .completed_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            submission.tier.to_string(),
            submission.score.to_string(),
            submission.label.clone(),
            submission.variant.to_string(),
            contact.first_name.clone(),
            contact.last_name.clone(),
            contact.email.clone(),
            contact.company.clone(),
            contact.phone.clone().unwrap_or_default(),
            contact.website.clone().unwrap_or_default(),
            submission.answers.len().to_string(),
            answers,
        ])
    }
}

impl SubmissionSink for CsvSink {
    fn hand_off(&self, submission: &LeadSubmission) -> Result<(), SinkError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| SinkError::Unavailable("csv sink lock poisoned".to_string()))?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Io {
                path: self.path.clone(),
                source,
            })?;
        let needs_header = file
            .metadata()
            .map_err(|source| SinkError::Io {
                path: self.path.clone(),
                source,
            })?
            .len()
            == 0;

        let mut writer = csv::Writer::from_writer(file);
        if needs_header {
            writer.write_record(CSV_HEADER)?;
        }
        writer.write_record(Self::row(submission)?)?;
        writer.flush().map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!(
            session = %submission.session_id,
            path = %self.path.display(),
            "lead appended to csv export"
        );
        Ok(())
    }
}

/// Keeps every hand-off in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LeadSubmission>>>,
}

impl MemorySink {
    pub fn records(&self) -> Vec<LeadSubmission> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl SubmissionSink for MemorySink {
    fn hand_off(&self, submission: &LeadSubmission) -> Result<(), SinkError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| SinkError::Unavailable("memory sink lock poisoned".to_string()))?;
        records.push(submission.clone());
        Ok(())
    }
}
