//! Reader for the semicolon-separated tourism dataset.

use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Every column of a row, keyed by header name.
pub type Row = BTreeMap<String, String>;

/// Names of the columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Columns {
    pub postal_code: String,
    pub latitude: String,
    pub longitude: String,
    pub name: String,
    pub price: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            postal_code: "detailidentadressecp".to_string(),
            latitude: "gmaplatitude".to_string(),
            longitude: "gmaplongitude".to_string(),
            name: "syndicobjectname".to_string(),
            price: "tarifentree".to_string(),
        }
    }
}

/// One dataset row. Values are raw strings; numeric parsing happens during
/// filtering so that rows outside the postal range never fail on bad coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based line in the source file, header included.
    pub line: u64,
    pub postal_code: String,
    pub latitude: String,
    pub longitude: String,
    pub name: String,
    pub price: String,
    pub fields: Row,
}

impl Record {
    /// Builds a record from a row, failing if a configured column is absent.
    pub fn from_row(line: u64, fields: Row, columns: &Columns) -> Result<Self> {
        let get = |column: &str| {
            fields
                .get(column)
                .cloned()
                .ok_or_else(|| anyhow!("line {line}: missing column '{column}'"))
        };

        Ok(Self {
            line,
            postal_code: get(&columns.postal_code)?,
            latitude: get(&columns.latitude)?,
            longitude: get(&columns.longitude)?,
            name: get(&columns.name)?,
            price: get(&columns.price)?,
            fields,
        })
    }
}

/// Streams [`Record`]s out of a `;`-delimited file with a header row.
pub struct RecordReader<R> {
    headers: StringRecord,
    records: StringRecordsIntoIter<R>,
    columns: Columns,
}

impl RecordReader<File> {
    pub fn open(path: &Path, columns: Columns) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        Self::from_reader(file, columns)
            .with_context(|| format!("failed to read header of {}", path.display()))
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(reader: R, columns: Columns) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();

        for column in [
            &columns.postal_code,
            &columns.latitude,
            &columns.longitude,
            &columns.name,
            &columns.price,
        ] {
            if !headers.iter().any(|h| h == column) {
                return Err(anyhow!("header row has no column '{column}'"));
            }
        }

        Ok(Self {
            headers,
            records: reader.into_records(),
            columns,
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(record.map_err(anyhow::Error::from).and_then(|record| {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let fields: Row = self
                .headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect();
            Record::from_row(line, fields, &self.columns)
        }))
    }
}
