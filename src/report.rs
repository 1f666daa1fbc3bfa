//! Invoice records, vendor aggregation, and the tabular report sink.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while writing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One qualifying invoice document.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    /// Extracted vendor; never empty, falls back to the unknown-vendor
    /// sentinel.
    pub vendor: String,
    /// Extracted amount; absent counts as zero in vendor totals.
    pub amount: Option<f64>,
    /// Declared attachment filename.
    pub pdf_filename: String,
    /// Path of the source message file.
    pub source_message: String,
}

/// Aggregated total for one vendor.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorSummary {
    pub vendor: String,
    pub total_amount: f64,
}

/// Group records by exact vendor string and sum their amounts, counting
/// absent amounts as zero. One row per distinct vendor, sorted by name.
///
/// Summary rows partition the record set exactly: every record contributes
/// to exactly one row.
pub fn aggregate_by_vendor(records: &[InvoiceRecord]) -> Vec<VendorSummary> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.vendor.as_str()).or_insert(0.0) += record.amount.unwrap_or(0.0);
    }
    totals
        .into_iter()
        .map(|(vendor, total_amount)| VendorSummary {
            vendor: vendor.to_string(),
            total_amount,
        })
        .collect()
}

/// Formatting for amount columns, passed to the sink explicitly rather than
/// living in process-global display state.
#[derive(Debug, Clone)]
pub struct ReportFormat {
    pub decimal_places: usize,
    pub thousands_separator: char,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            thousands_separator: ',',
        }
    }
}

impl ReportFormat {
    /// Format an amount like `#,##0.00`.
    pub fn format_amount(&self, amount: f64) -> String {
        let fixed = format!("{:.*}", self.decimal_places, amount.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (fixed.as_str(), None),
        };

        let digits: Vec<char> = int_part.chars().collect();
        let mut out = String::new();
        if amount < 0.0 {
            out.push('-');
        }
        for (i, c) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.thousands_separator);
            }
            out.push(*c);
        }
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

/// Paths of the written report artifacts.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub detail: PathBuf,
    pub summary: PathBuf,
}

/// Destination for the detail and vendor-summary tables.
pub trait ReportSink {
    fn write_report(
        &self,
        records: &[InvoiceRecord],
        summary: &[VendorSummary],
    ) -> Result<ReportPaths, ReportError>;
}

/// CSV report sink writing `invoice_detail.csv` and `vendor_summary.csv`
/// into the output directory.
pub struct CsvReportSink {
    output_dir: PathBuf,
    format: ReportFormat,
}

impl CsvReportSink {
    pub fn new(output_dir: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    fn write_detail(&self, path: &Path, records: &[InvoiceRecord]) -> Result<(), ReportError> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["vendor", "amount", "pdf_filename", "source_message"])?;
        for record in records {
            let amount = record
                .amount
                .map(|a| self.format.format_amount(a))
                .unwrap_or_default();
            wtr.write_record([
                record.vendor.as_str(),
                amount.as_str(),
                record.pdf_filename.as_str(),
                record.source_message.as_str(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_summary(&self, path: &Path, summary: &[VendorSummary]) -> Result<(), ReportError> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["vendor", "total_amount"])?;
        for row in summary {
            let total = self.format.format_amount(row.total_amount);
            wtr.write_record([row.vendor.as_str(), total.as_str()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportSink for CsvReportSink {
    fn write_report(
        &self,
        records: &[InvoiceRecord],
        summary: &[VendorSummary],
    ) -> Result<ReportPaths, ReportError> {
        fs::create_dir_all(&self.output_dir)?;
        let paths = ReportPaths {
            detail: self.output_dir.join("invoice_detail.csv"),
            summary: self.output_dir.join("vendor_summary.csv"),
        };
        self.write_detail(&paths.detail, records)?;
        self.write_summary(&paths.summary, summary)?;
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(vendor: &str, amount: Option<f64>) -> InvoiceRecord {
        InvoiceRecord {
            vendor: vendor.to_string(),
            amount,
            pdf_filename: "invoice.pdf".to_string(),
            source_message: "mail/msg.eml".to_string(),
        }
    }

    #[test]
    fn test_aggregate_groups_and_sums() {
        let records = vec![
            record("Рога и Копыта", Some(100.0)),
            record("Рога и Копыта", Some(200.0)),
            record("俄文未知", None),
        ];
        let summary = aggregate_by_vendor(&records);

        assert_eq!(summary.len(), 2);
        let by_vendor: BTreeMap<&str, f64> = summary
            .iter()
            .map(|s| (s.vendor.as_str(), s.total_amount))
            .collect();
        assert_eq!(by_vendor["Рога и Копыта"], 300.0);
        assert_eq!(by_vendor["俄文未知"], 0.0);
    }

    #[test]
    fn test_aggregate_totals_match_record_sum() {
        let records = vec![
            record("А", Some(10.5)),
            record("Б", None),
            record("А", Some(0.5)),
            record("В", Some(7.0)),
        ];
        let summary = aggregate_by_vendor(&records);

        let record_sum: f64 = records.iter().map(|r| r.amount.unwrap_or(0.0)).sum();
        let summary_sum: f64 = summary.iter().map(|s| s.total_amount).sum();
        assert!((record_sum - summary_sum).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_empty_set() {
        assert!(aggregate_by_vendor(&[]).is_empty());
    }

    #[test]
    fn test_format_amount_thousands_and_decimals() {
        let format = ReportFormat::default();
        assert_eq!(format.format_amount(12345.67), "12,345.67");
        assert_eq!(format.format_amount(1234567.5), "1,234,567.50");
        assert_eq!(format.format_amount(999.0), "999.00");
        assert_eq!(format.format_amount(0.0), "0.00");
    }

    #[test]
    fn test_format_amount_negative() {
        let format = ReportFormat::default();
        assert_eq!(format.format_amount(-1234.5), "-1,234.50");
    }

    #[test]
    fn test_format_amount_custom_separator() {
        let format = ReportFormat {
            decimal_places: 2,
            thousands_separator: ' ',
        };
        assert_eq!(format.format_amount(12345.67), "12 345.67");
    }

    #[test]
    fn test_csv_sink_writes_both_tables() {
        let temp = TempDir::new().unwrap();
        let sink = CsvReportSink::new(temp.path(), ReportFormat::default());

        let records = vec![
            record("Рога и Копыта", Some(12345.67)),
            record("Вектор", None),
        ];
        let summary = aggregate_by_vendor(&records);
        let paths = sink.write_report(&records, &summary).unwrap();

        let detail = std::fs::read_to_string(&paths.detail).unwrap();
        assert!(detail.starts_with("vendor,amount,pdf_filename,source_message\n"));
        assert!(detail.contains("Рога и Копыта,\"12,345.67\",invoice.pdf,mail/msg.eml"));
        // Absent amount stays blank in the detail table
        assert!(detail.contains("Вектор,,invoice.pdf,mail/msg.eml"));

        let summary_csv = std::fs::read_to_string(&paths.summary).unwrap();
        assert!(summary_csv.starts_with("vendor,total_amount\n"));
        assert!(summary_csv.contains("Вектор,0.00"));
        assert!(summary_csv.contains("Рога и Копыта,\"12,345.67\""));
    }
}
