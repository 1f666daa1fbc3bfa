//! PDF attachment extraction from RFC822 email messages.
//!
//! Locates disposition-marked PDF attachments in `.eml` files and hands
//! their decoded bytes to the classification stage. A decode failure is
//! contained to the message it occurred in; the batch keeps going.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use mail_parser::{MessageParser, MimeHeaders};
use thiserror::Error;

/// Errors that can occur while reading or parsing a mail message.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Failed to read message file: {0}")]
    ReadFailed(String),

    #[error("Failed to parse message: {0}")]
    ParseFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A PDF attachment discovered in a mail message.
///
/// Immutable once built; consumed exactly once by the classification and
/// extraction stage. Staging to disk is a side effect, not authoritative
/// state.
#[derive(Debug, Clone)]
pub struct PdfAttachment {
    /// Declared attachment filename.
    pub filename: String,
    /// Decoded attachment payload.
    pub bytes: Vec<u8>,
    /// Path of the message file the attachment came from.
    pub source_message: PathBuf,
}

impl PdfAttachment {
    /// Filename to stage this attachment under.
    ///
    /// Keyed by the source message stem so the same attachment name in two
    /// different messages cannot clobber a previously staged file. The
    /// declared name is reduced to its final path component first, so a
    /// hostile name cannot escape the staging folder.
    pub fn staged_filename(&self) -> String {
        let name = Path::new(&self.filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment.pdf");
        let stem = self
            .source_message
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("message");
        format!("{stem}__{name}")
    }
}

/// Read a message file into memory.
fn read_message(path: &Path) -> Result<Vec<u8>, MailError> {
    let mut file = File::open(path).map_err(|e| MailError::ReadFailed(e.to_string()))?;
    let mut raw = Vec::new();
    file.read_to_end(&mut raw)
        .map_err(|e| MailError::ReadFailed(e.to_string()))?;
    Ok(raw)
}

/// Extract all PDF attachments from a single `.eml` file.
///
/// Only disposition-marked attachment parts with a declared filename ending
/// in `.pdf` (case-insensitive) qualify. Multipart containers and parts
/// without a filename are skipped.
pub fn extract_pdf_attachments(message_path: &Path) -> Result<Vec<PdfAttachment>, MailError> {
    let raw = read_message(message_path)?;
    let message = MessageParser::default()
        .parse(&raw)
        .ok_or_else(|| MailError::ParseFailed("not a valid RFC822 message".to_string()))?;

    let mut found = Vec::new();
    for part in message.attachments() {
        // Parts without an explicit disposition are not attachments here,
        // even when the parser's heuristic surfaces them.
        if part.content_disposition().is_none() {
            continue;
        }
        let Some(filename) = part.attachment_name() else {
            continue;
        };
        if !filename.to_lowercase().ends_with(".pdf") {
            continue;
        }
        found.push(PdfAttachment {
            filename: filename.to_string(),
            bytes: part.contents().to_vec(),
            source_message: message_path.to_path_buf(),
        });
    }

    Ok(found)
}
