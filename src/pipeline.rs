//! Fetch, filter, classify, render.

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::classify::PriceCategory;
use crate::config::Config;
use crate::fetch::{CacheStatus, HttpClient, ensure_cached};
use crate::filter::select;
use crate::map::{LeafletMap, Marker};
use crate::parser::{Record, RecordReader};
use crate::popup::PopupRenderer;
use crate::stats::{CenterStrategy, RunSummary};

/// Builds the map from already-parsed records. No network, no file output.
///
/// # Errors
///
/// Fails on the first invalid record, on a popup that does not render, and
/// when no record falls inside the postal range.
pub fn build_map<I>(
    records: I,
    config: &Config,
    renderer: &PopupRenderer,
) -> Result<(LeafletMap, RunSummary)>
where
    I: IntoIterator<Item = Result<Record>>,
{
    let range = config.postal_range;
    let selection = select(records, &range)?;

    let Some(mean) = selection.centroid.mean() else {
        bail!(
            "no record with a postal code in {range} ({} rows skipped)",
            selection.skipped
        );
    };

    let center = match config.center {
        CenterStrategy::Mean => mean,
        CenterStrategy::First => selection
            .kept
            .first()
            .map(|k| (k.latitude, k.longitude))
            .unwrap_or(mean),
    };

    let mut map = LeafletMap::new(config.zoom, config.popup_width).with_title(&config.title);
    map.set_center(center.0, center.1);

    let mut summary = RunSummary::new(
        &config.dataset_url,
        &config.output_file.display().to_string(),
        range.start,
        range.end,
    );
    summary.skipped = selection.skipped;

    for kept in selection.kept {
        let category = PriceCategory::classify(&kept.record.price);
        let popup = renderer
            .render(&kept.record.fields)
            .with_context(|| format!("line {}: popup", kept.record.line))?;

        map.add_marker(
            category,
            Marker::new(
                kept.latitude,
                kept.longitude,
                &kept.record.name,
                popup,
                category,
            ),
        );
        summary.count(category);
    }

    debug!(
        kept = summary.kept,
        free_pct = summary.free_pct(),
        center_lat = center.0,
        center_lon = center.1,
        "Map assembled"
    );
    Ok((map, summary.with_center(center.0, center.1)))
}

/// Runs the whole pipeline once and writes the map to `config.output_file`.
///
/// Nothing is written when any step fails.
#[tracing::instrument(skip_all, fields(url = %config.dataset_url))]
pub fn run<C: HttpClient>(client: &C, config: &Config) -> Result<RunSummary> {
    config.validate()?;

    // Load the template before touching the network so a typo fails fast
    let renderer = PopupRenderer::new(&config.template_dir, &config.popup_template)?;

    match ensure_cached(client, &config.dataset_url, &config.cache_file)? {
        CacheStatus::Hit => info!(path = %config.cache_file.display(), "Using cached dataset"),
        CacheStatus::Downloaded { bytes } => info!(bytes, "Dataset downloaded"),
    }

    let reader = RecordReader::open(&config.cache_file, config.columns.clone())?;
    debug!(columns = reader.headers().len(), "Header parsed");

    let (map, summary) = build_map(reader, config, &renderer)?;
    map.save(&config.output_file)?;

    info!(
        kept = summary.kept,
        skipped = summary.skipped,
        output = %config.output_file.display(),
        "Map written"
    );
    Ok(summary)
}
