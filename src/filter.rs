//! Postal-code range filtering.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::parser::Record;
use crate::stats::Centroid;

/// Half-open range `[start, end)` of postal codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalRange {
    pub start: i64,
    pub end: i64,
}

impl PostalRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, code: i64) -> bool {
        self.start <= code && code < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl Default for PostalRange {
    /// The whole Finistère department.
    fn default() -> Self {
        Self::new(29000, 30000)
    }
}

impl fmt::Display for PostalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Removes every space and parses the rest as a base-10 integer.
///
/// `"29 200"` and `"29200"` both give `29200`. Anything else left over is an error.
pub fn parse_postal_code(raw: &str) -> Result<i64> {
    let compact: String = raw.chars().filter(|c| *c != ' ').collect();
    compact
        .trim()
        .parse()
        .with_context(|| format!("invalid postal code {raw:?}"))
}

/// A record that passed the range check, with its numbers parsed.
#[derive(Debug, Clone)]
pub struct KeptRecord {
    pub postal_code: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub record: Record,
}

/// Result of a single pass over the dataset.
#[derive(Debug, Default)]
pub struct Selection {
    pub kept: Vec<KeptRecord>,
    pub skipped: usize,
    pub centroid: Centroid,
}

/// Checks one record against `range`. Coordinates are only parsed for
/// records inside the range.
pub fn keep(record: Record, range: &PostalRange) -> Result<Option<KeptRecord>> {
    let postal_code = parse_postal_code(&record.postal_code)
        .with_context(|| format!("line {}", record.line))?;

    if !range.contains(postal_code) {
        return Ok(None);
    }

    let latitude = parse_coordinate(&record.latitude)
        .with_context(|| format!("line {}: invalid latitude", record.line))?;
    let longitude = parse_coordinate(&record.longitude)
        .with_context(|| format!("line {}: invalid longitude", record.line))?;

    Ok(Some(KeptRecord {
        postal_code,
        latitude,
        longitude,
        record,
    }))
}

/// Streams `records`, keeping those inside `range` and accumulating their
/// coordinates. The first bad record aborts the pass.
pub fn select<I>(records: I, range: &PostalRange) -> Result<Selection>
where
    I: IntoIterator<Item = Result<Record>>,
{
    let mut selection = Selection::default();

    for record in records {
        match keep(record?, range)? {
            Some(kept) => {
                selection.centroid.add(kept.latitude, kept.longitude);
                selection.kept.push(kept);
            }
            None => selection.skipped += 1,
        }
    }

    debug!(
        kept = selection.kept.len(),
        skipped = selection.skipped,
        %range,
        "Selection complete"
    );
    Ok(selection)
}

fn parse_coordinate(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{raw:?} is not a number"))?;
    anyhow::ensure!(value.is_finite(), "{raw:?} is not a finite number");
    Ok(value)
}
