//! Static Leaflet map with one toggleable, clustered layer per price bucket.

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::classify::PriceCategory;

const PAGE_TEMPLATE: &str = include_str!("../templates/map.html");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    /// Plain text, never interpreted as HTML.
    pub tooltip: String,
    /// Full document shown in the popup's inline frame.
    pub popup_html: String,
    pub color: &'static str,
    pub icon: &'static str,
}

impl Marker {
    pub fn new(
        latitude: f64,
        longitude: f64,
        tooltip: &str,
        popup_html: String,
        category: PriceCategory,
    ) -> Self {
        Self {
            latitude,
            longitude,
            tooltip: tooltip.to_string(),
            popup_html,
            color: category.color(),
            icon: "home",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Layer {
    pub category: PriceCategory,
    pub name: &'static str,
    pub markers: Vec<Marker>,
}

#[derive(Debug)]
pub struct LeafletMap {
    title: String,
    center: (f64, f64),
    zoom: u8,
    popup_width: u32,
    popup_height: u32,
    layers: Vec<Layer>,
}

impl LeafletMap {
    /// Empty map centered on `(0, 0)` with every layer present.
    pub fn new(zoom: u8, popup_width: u32) -> Self {
        let layers = PriceCategory::ALL
            .iter()
            .map(|&category| Layer {
                category,
                name: category.label(),
                markers: Vec::new(),
            })
            .collect();

        Self {
            title: "Sites touristiques".to_string(),
            center: (0.0, 0.0),
            zoom,
            popup_width,
            popup_height: 400,
            layers,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn set_center(&mut self, latitude: f64, longitude: f64) {
        self.center = (latitude, longitude);
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn add_marker(&mut self, category: PriceCategory, marker: Marker) {
        if let Some(layer) = self.layers.iter_mut().find(|l| l.category == category) {
            layer.markers.push(marker);
        }
    }

    pub fn layer(&self, category: PriceCategory) -> Option<&Layer> {
        self.layers.iter().find(|l| l.category == category)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn marker_count(&self) -> usize {
        self.layers.iter().map(|l| l.markers.len()).sum()
    }

    /// Renders the self-contained HTML document.
    pub fn to_html(&self) -> Result<String> {
        // `</` inside a string would otherwise close the surrounding <script>
        let layers_json = serde_json::to_string(&self.layers)?.replace("</", "<\\/");

        let mut env = Environment::new();
        env.add_template("map.html", PAGE_TEMPLATE)?;

        let html = env.get_template("map.html")?.render(context! {
            title => &self.title,
            center_lat => self.center.0,
            center_lon => self.center.1,
            zoom => self.zoom,
            popup_width => self.popup_width,
            popup_height => self.popup_height,
            layers_json => layers_json,
        })?;

        Ok(html)
    }

    /// Writes [`LeafletMap::to_html`] to `path`.
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let html = self.to_html()?;
        debug!(bytes = html.len(), "Map rendered");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;

        info!(markers = self.marker_count(), "Map saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn marker(name: &str, category: PriceCategory) -> Marker {
        Marker::new(48.0, -4.0, name, format!("<p>{name}</p>"), category)
    }

    #[test]
    fn test_new_map_has_every_layer() {
        let map = LeafletMap::new(10, 800);

        assert_eq!(map.layers().len(), PriceCategory::ALL.len());
        assert_eq!(map.marker_count(), 0);
        for category in PriceCategory::ALL {
            assert_eq!(map.layer(category).unwrap().name, category.label());
        }
    }

    #[test]
    fn test_markers_land_in_their_layer() {
        let mut map = LeafletMap::new(10, 800);
        map.add_marker(PriceCategory::Free, marker("A", PriceCategory::Free));
        map.add_marker(PriceCategory::Paid, marker("B", PriceCategory::Paid));
        map.add_marker(PriceCategory::Free, marker("C", PriceCategory::Free));

        assert_eq!(map.marker_count(), 3);
        assert_eq!(map.layer(PriceCategory::Free).unwrap().markers.len(), 2);
        assert_eq!(map.layer(PriceCategory::Paid).unwrap().markers.len(), 1);
        assert!(map.layer(PriceCategory::Other).unwrap().markers.is_empty());
    }

    #[test]
    fn test_marker_takes_bucket_color() {
        let m = marker("A", PriceCategory::Unspecified);
        assert_eq!(m.color, "blue");
        assert_eq!(m.icon, "home");
    }

    #[test]
    fn test_html_contains_view_and_layers() {
        let mut map = LeafletMap::new(12, 640).with_title("Finistère");
        map.set_center(48.25, -4.5);
        map.add_marker(PriceCategory::Free, marker("Phare du Minou", PriceCategory::Free));

        let html = map.to_html().unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Finistère</title>"));
        assert!(html.contains("center: [48.25, -4.5], zoom: 12"));
        assert!(html.contains("minWidth: 640"));
        assert!(html.contains("Phare du Minou"));
        assert!(html.contains("\"name\":\"Tarifs non communiqués\""));
        assert!(html.contains("L.Control.MiniMap"));
        assert!(html.contains("L.control.layers"));
    }

    #[test]
    fn test_script_close_is_escaped() {
        let mut map = LeafletMap::new(10, 800);
        map.add_marker(
            PriceCategory::Paid,
            Marker::new(1.0, 2.0, "</script><b>x</b>", "<p>ok</p>".into(), PriceCategory::Paid),
        );

        let html = map.to_html().unwrap();

        assert_eq!(html.matches("</script>").count(), 5);
        assert!(html.contains("<\\/script>"));
        assert!(html.contains("<p>ok<\\/p>"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/index.html");

        LeafletMap::new(10, 800).save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("L.map(\"map\""));
    }
}
