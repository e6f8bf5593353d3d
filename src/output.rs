//! Run summary reporting.
//!
//! Supports pretty-printing, JSON logging, and CSV append.

use anyhow::Result;
use tracing::{debug, info};

use crate::stats::RunSummary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a run summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &RunSummary) {
    debug!("{:#?}", summary);
}

/// Logs a run summary as pretty-printed JSON.
pub fn print_json(summary: &RunSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Appends a [`RunSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, summary: &RunSummary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending run summary");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::PriceCategory;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&RunSummary::default());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&RunSummary::default()).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runs.csv");

        append_record(&path, &RunSummary::default()).unwrap();
        append_record(&path, &RunSummary::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,source,output"));
        assert_eq!(content.matches("pay_what_you_wish").count(), 1);
    }

    #[test]
    fn test_append_record_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runs.csv");

        let mut summary = RunSummary::new("data.csv", "index.html", 29000, 30000);
        summary.count(PriceCategory::Paid);
        append_record(&path, &summary.with_center(48.5, -4.25)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.contains(",data.csv,index.html,29000,30000,1,0,0,1,0,0,0,48.5,-4.25"));
    }
}
