//! Standalone HTML map of station features.
//!
//! The page loads Leaflet and Leaflet.markercluster from a CDN and embeds the
//! feature collection inline, so the output file is viewable on its own.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::config::MapConfig;
use crate::geo::FeatureCollection;

const LEAFLET_VERSION: &str = "1.9.4";
const MARKERCLUSTER_VERSION: &str = "1.5.3";
const POPUP_FIELDS: [&str; 4] = ["name", "bikes_available", "stands_available", "status"];

/// Renders the full HTML document for `features`.
pub fn render_map(features: &FeatureCollection, config: &MapConfig) -> Result<String> {
    // `</` inside an inline script would close the tag early.
    let geojson = serde_json::to_string(features)?.replace("</", "<\\/");
    let fields = serde_json::to_string(&POPUP_FIELDS)?;
    let tiles = serde_json::to_string(&config.tile_url)?;
    let attribution = serde_json::to_string(&config.attribution)?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>Stations</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.css" />
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@{cluster}/dist/MarkerCluster.css" />
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@{cluster}/dist/MarkerCluster.Default.css" />
<script src="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.markercluster@{cluster}/dist/leaflet.markercluster.js"></script>
<style>
html, body {{ width: 100%; height: 100%; margin: 0; padding: 0; }}
#map {{ position: absolute; top: 0; bottom: 0; left: 0; right: 0; }}
.popup-table th {{ text-align: left; padding-right: 8px; }}
</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer({tiles}, {{ maxZoom: 19, attribution: {attribution} }}).addTo(map);

var popupFields = {fields};
function popupContent(properties) {{
    var table = document.createElement("table");
    table.className = "popup-table";
    popupFields.forEach(function (field) {{
        var row = table.insertRow();
        var key = document.createElement("th");
        key.textContent = field;
        row.appendChild(key);
        row.insertCell().textContent = properties[field];
    }});
    return table;
}}

var stations = {geojson};
var cluster = L.markerClusterGroup();
L.geoJSON(stations, {{
    name: "Stations",
    onEachFeature: function (feature, layer) {{
        layer.bindPopup(popupContent(feature.properties));
    }}
}}).addTo(cluster);
map.addLayer(cluster);
</script>
</body>
</html>
"#,
        leaflet = LEAFLET_VERSION,
        cluster = MARKERCLUSTER_VERSION,
        lat = config.center_lat,
        lon = config.center_lon,
        zoom = config.zoom,
    ))
}

/// Renders `features` and overwrites the file at `config.output_path`.
#[tracing::instrument(skip_all, fields(path = %config.output_path.display()))]
pub fn write_map(features: &FeatureCollection, config: &MapConfig) -> Result<()> {
    let html = render_map(features, config)?;
    write_file(&config.output_path, &html)?;
    debug!(features = features.features.len(), bytes = html.len(), "Map written");
    Ok(())
}

fn write_file(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html).with_context(|| format!("failed to write map to {}", path.display()))
}
