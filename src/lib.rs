//! invomail - Russian invoice extraction from email archives.
//!
//! Walks a folder of `.eml` messages, pulls out PDF attachments, keeps the
//! Russian-language ones, heuristically parses vendor name and amount from
//! the decoded text, and writes a per-document detail table plus a
//! per-vendor summary table as CSV.

pub mod cli;
pub mod fields;
pub mod language;
pub mod mail;
pub mod pipeline;
pub mod report;
