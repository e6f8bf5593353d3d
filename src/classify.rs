//! Price-category buckets.

use serde::Serialize;

/// One bucket per map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceCategory {
    Free,
    Paid,
    Unspecified,
    PayWhatYouWish,
    /// Residual bucket for every value not matched exactly.
    Other,
}

impl PriceCategory {
    /// Layer order on the map and in the layer control.
    pub const ALL: [PriceCategory; 5] = [
        PriceCategory::Free,
        PriceCategory::Paid,
        PriceCategory::Unspecified,
        PriceCategory::PayWhatYouWish,
        PriceCategory::Other,
    ];

    /// Maps a `tarifentree` value to its bucket by exact string equality.
    ///
    /// No trimming and no case folding: `"gratuit"` lands in [`PriceCategory::Other`].
    pub fn classify(value: &str) -> Self {
        match value {
            "Gratuit" => PriceCategory::Free,
            "Payant" => PriceCategory::Paid,
            "Tarifs non communiqués" => PriceCategory::Unspecified,
            "Libre participation" => PriceCategory::PayWhatYouWish,
            _ => PriceCategory::Other,
        }
    }

    /// Layer name shown in the layer control.
    pub fn label(self) -> &'static str {
        match self {
            PriceCategory::Free => "Gratuit",
            PriceCategory::Paid => "Payant",
            PriceCategory::Unspecified => "Tarifs non communiqués",
            PriceCategory::PayWhatYouWish => "Libre participation",
            PriceCategory::Other => "Autres tarifs",
        }
    }

    /// AwesomeMarkers color name.
    pub fn color(self) -> &'static str {
        match self {
            PriceCategory::Free => "red",
            PriceCategory::Paid => "green",
            PriceCategory::Unspecified => "blue",
            PriceCategory::PayWhatYouWish => "black",
            PriceCategory::Other => "gray",
        }
    }
}
