use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::PriceCategory;

/// Running coordinate sums for the map center.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Centroid {
    lat_sum: f64,
    lon_sum: f64,
    count: usize,
}

impl Centroid {
    pub fn add(&mut self, latitude: f64, longitude: f64) {
        self.lat_sum += latitude;
        self.lon_sum += longitude;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean `(latitude, longitude)`, or `None` when nothing was added.
    pub fn mean(&self) -> Option<(f64, f64)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some((self.lat_sum / n, self.lon_sum / n))
    }
}

/// How the initial view center is chosen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CenterStrategy {
    /// Arithmetic mean of all kept coordinates.
    #[default]
    Mean,
    /// Raw coordinates of the first kept record.
    First,
}

/// One row of the run log.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub output: String,
    pub postal_start: i64,
    pub postal_end: i64,

    pub kept: usize,
    pub skipped: usize,

    // markers per layer
    pub free: usize,
    pub paid: usize,
    pub unspecified: usize,
    pub pay_what_you_wish: usize,
    pub other: usize,

    pub center_lat: f64,
    pub center_lon: f64,
}

impl RunSummary {
    pub fn new(source: &str, output: &str, postal_start: i64, postal_end: i64) -> Self {
        RunSummary {
            timestamp: Utc::now(),
            source: source.to_string(),
            output: output.to_string(),
            postal_start,
            postal_end,
            ..Default::default()
        }
    }

    pub fn count(&mut self, category: PriceCategory) {
        self.kept += 1;
        match category {
            PriceCategory::Free => self.free += 1,
            PriceCategory::Paid => self.paid += 1,
            PriceCategory::Unspecified => self.unspecified += 1,
            PriceCategory::PayWhatYouWish => self.pay_what_you_wish += 1,
            PriceCategory::Other => self.other += 1,
        }
    }

    pub fn with_center(mut self, latitude: f64, longitude: f64) -> Self {
        self.center_lat = latitude;
        self.center_lon = longitude;
        self
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn free_pct(&self) -> f64 {
        Self::pct(self.free, self.kept)
    }
}
