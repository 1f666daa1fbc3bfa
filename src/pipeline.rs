//! Sequential batch pipeline over a folder of `.eml` messages.
//!
//! One message at a time, one attachment at a time. Per-message decode
//! failures and per-attachment staging failures are logged and skipped;
//! only an unreadable input folder aborts the run. Every discovered PDF is
//! staged to disk before the language gate, so excluded documents still
//! leave an audit copy behind.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::fields;
use crate::language::{decode_lossy, ScriptRatioClassifier};
use crate::mail::{self, PdfAttachment};
use crate::report::InvoiceRecord;

/// Errors that abort the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Cannot access mail folder {path}: {source}")]
    MailFolderUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot create staging folder {path}: {source}")]
    StagingUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Pipeline inputs: where the messages live and where staged PDFs go.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub mail_dir: PathBuf,
    pub staging_dir: PathBuf,
}

/// Counters for the end-of-run summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineStats {
    /// Messages found with an `.eml` extension.
    pub messages: usize,
    /// Messages that failed to decode and were skipped.
    pub message_errors: usize,
    /// PDF attachments discovered across all messages.
    pub attachments: usize,
    /// Attachments excluded by the language gate.
    pub excluded: usize,
}

/// Result of one pipeline run.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    pub records: Vec<InvoiceRecord>,
    pub stats: PipelineStats,
}

/// List `.eml` files in the mail folder, sorted for deterministic
/// processing order.
pub fn list_message_files(mail_dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let unreadable = |source| PipelineError::MailFolderUnreadable {
        path: mail_dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(mail_dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        let is_eml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("eml"))
            .unwrap_or(false);
        if is_eml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Run the full pipeline over the mail folder.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutcome, PipelineError> {
    let files = list_message_files(&config.mail_dir)?;
    run_messages(config, &files, || {})
}

/// Run the pipeline over an already-listed set of message files, invoking
/// `on_message` after each message for progress reporting.
pub fn run_messages(
    config: &PipelineConfig,
    message_files: &[PathBuf],
    mut on_message: impl FnMut(),
) -> Result<PipelineOutcome, PipelineError> {
    fs::create_dir_all(&config.staging_dir).map_err(|source| PipelineError::StagingUnavailable {
        path: config.staging_dir.clone(),
        source,
    })?;

    let classifier = ScriptRatioClassifier::new();
    let mut outcome = PipelineOutcome::default();
    outcome.stats.messages = message_files.len();

    for message_path in message_files {
        match mail::extract_pdf_attachments(message_path) {
            Ok(attachments) => {
                for attachment in attachments {
                    outcome.stats.attachments += 1;
                    process_attachment(config, &classifier, attachment, &mut outcome);
                }
            }
            Err(e) => {
                outcome.stats.message_errors += 1;
                warn!("Error processing {}: {}", message_path.display(), e);
            }
        }
        on_message();
    }

    Ok(outcome)
}

/// Stage one attachment, gate it on language, and record it if it
/// qualifies.
fn process_attachment(
    config: &PipelineConfig,
    classifier: &ScriptRatioClassifier,
    attachment: PdfAttachment,
    outcome: &mut PipelineOutcome,
) {
    // Staging happens before the gate; excluded documents are still audited.
    if let Err(e) = stage_attachment(&config.staging_dir, &attachment) {
        warn!(
            "Failed to stage {} from {}: {}",
            attachment.filename,
            attachment.source_message.display(),
            e
        );
        return;
    }

    if !classifier.classify_bytes(&attachment.bytes) {
        info!("Excluding {} (not Russian)", attachment.filename);
        outcome.stats.excluded += 1;
        return;
    }

    let text = decode_lossy(&attachment.bytes);
    let extracted = fields::extract_fields(&text);
    outcome.records.push(InvoiceRecord {
        vendor: extracted.vendor,
        amount: extracted.amount,
        pdf_filename: attachment.filename,
        source_message: attachment.source_message.display().to_string(),
    });
}

/// Write the attachment bytes into the staging folder under its
/// collision-safe name.
fn stage_attachment(staging_dir: &Path, attachment: &PdfAttachment) -> std::io::Result<()> {
    fs::write(
        staging_dir.join(attachment.staged_filename()),
        &attachment.bytes,
    )
}
