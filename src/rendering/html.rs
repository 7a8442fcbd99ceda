//! Standalone HTML output
//!
//! The page loads Leaflet from a CDN and receives the assembled map as one
//! embedded JSON object. All styling and popups are computed in Rust; the
//! script only instantiates Leaflet objects from that data.

use crate::{
    core::{constants::LEAFLET_VERSION, map::QuakeMap},
    layers::base::LayerTrait,
    rendering::escape_html,
    Result,
};
use log::info;
use serde_json::{json, Value};
use std::path::Path;

const STYLE: &str = r#"
html, body, #map { height: 100%; margin: 0; }
.legend { background: white; padding: 6px 8px; line-height: 18px; color: #555; border-radius: 5px; box-shadow: 0 0 15px rgba(0, 0, 0, 0.2); }
.legend i { width: 18px; height: 18px; float: left; margin-right: 8px; opacity: 0.7; }
.banner { position: absolute; top: 0; left: 50%; transform: translateX(-50%); z-index: 1000; background: #fff3cd; color: #664d03; border: 1px solid #ffe69c; padding: 6px 12px; font: 14px sans-serif; }
.banner p { margin: 2px 0; }
"#;

const SCRIPT: &str = r#"
const map = L.map("map", { center: data.center, zoom: data.zoom });

const baseMaps = {};
for (const base of data.baseLayers) {
  const options = Object.assign({}, base.options, { opacity: base.opacity, zIndex: base.zIndex });
  const layer = L.tileLayer(base.url, options);
  baseMaps[base.name] = layer;
  if (base.active) layer.addTo(map);
}

// Each overlay draws into its own pane, stacked above Leaflet's overlay pane
function overlayPane(overlay) {
  const pane = map.createPane(overlay.pane);
  pane.style.zIndex = 400 + overlay.zIndex;
  pane.style.opacity = overlay.opacity;
  return overlay.pane;
}

const overlays = {};
const quakePane = overlayPane(data.earthquakes);
const quakes = L.layerGroup(
  data.earthquakes.markers.map((m) =>
    L.circle(m.latlng, Object.assign({ pane: quakePane }, m.style)).bindPopup(m.popup)
  )
);
overlays[data.earthquakes.name] = quakes;
if (data.earthquakes.visible) quakes.addTo(map);

if (data.plates) {
  const plates = L.geoJson(data.plates.geojson, {
    style: data.plates.style,
    pane: overlayPane(data.plates),
  });
  overlays[data.plates.name] = plates;
  if (data.plates.visible) plates.addTo(map);
}

L.control.layers(baseMaps, overlays, data.control).addTo(map);

const legend = L.control({ position: data.legend.position });
legend.onAdd = function () {
  const div = L.DomUtil.create("div", "info legend");
  div.innerHTML = data.legend.html;
  return div;
};
legend.addTo(map);

if (data.fitBounds) map.fitBounds(data.fitBounds);
"#;

/// Renders a [`QuakeMap`] to a self-contained Leaflet page
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    leaflet_version: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            leaflet_version: LEAFLET_VERSION.to_string(),
        }
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leaflet_version(mut self, version: impl Into<String>) -> Self {
        self.leaflet_version = version.into();
        self
    }

    /// Everything the page script needs, as one JSON object
    pub fn map_data(&self, map: &QuakeMap) -> Value {
        let base_layers: Vec<Value> = map
            .base_layers()
            .iter()
            .map(|layer| {
                json!({
                    "name": layer.name(),
                    "url": layer.url_template(),
                    "options": layer.options(),
                    "active": layer.is_visible(),
                    "opacity": layer.opacity(),
                    "zIndex": layer.z_index(),
                })
            })
            .collect();

        let earthquakes = map.earthquakes();
        let plates = map.plates().map(|plates| {
            json!({
                "name": plates.name(),
                "pane": plates.id(),
                "visible": plates.is_visible(),
                "opacity": plates.opacity(),
                "zIndex": plates.z_index(),
                "style": plates.style(),
                "geojson": plates.features_json(),
            })
        });

        json!({
            "center": [map.center.lat, map.center.lng],
            "zoom": map.zoom,
            "fitBounds": map.initial_bounds().map(|b| b.to_leaflet()),
            "baseLayers": base_layers,
            "earthquakes": {
                "name": earthquakes.name(),
                "pane": earthquakes.id(),
                "visible": earthquakes.is_visible(),
                "opacity": earthquakes.opacity(),
                "zIndex": earthquakes.z_index(),
                "markers": earthquakes.markers_json(),
            },
            "plates": plates,
            "control": {
                "collapsed": map.control().collapsed,
                "position": map.control().position.as_leaflet(),
            },
            "legend": {
                "position": map.legend().position.as_leaflet(),
                "html": map.legend().to_html(),
            },
        })
    }

    pub fn render(&self, map: &QuakeMap) -> Result<String> {
        let data = serde_json::to_string(&self.map_data(map))?;
        // Keep "</script>" inside strings from closing the data block
        let data = data.replace("</", "<\\/");

        let banner = map.banner_messages();
        let banner = if banner.is_empty() {
            String::new()
        } else {
            let lines: String = banner
                .iter()
                .map(|message| format!("<p>{}</p>", escape_html(message)))
                .collect();
            format!("<div class=\"banner\" role=\"alert\">{lines}</div>\n")
        };

        let cdn = format!("https://unpkg.com/leaflet@{}/dist", self.leaflet_version);
        Ok(format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{title}</title>\n\
             <link rel=\"stylesheet\" href=\"{cdn}/leaflet.css\">\n\
             <script src=\"{cdn}/leaflet.js\"></script>\n\
             <style>{STYLE}</style>\n\
             </head>\n\
             <body>\n\
             {banner}<div id=\"map\"></div>\n\
             <script>\nconst data = {data};\n</script>\n\
             <script>{SCRIPT}</script>\n\
             </body>\n\
             </html>\n",
            title = escape_html(&map.title),
        ))
    }

    /// Renders and writes the page, replacing any existing file
    pub async fn write_to(&self, map: &QuakeMap, path: &Path) -> Result<()> {
        let html = self.render(map)?;
        tokio::fs::write(path, html.as_bytes()).await?;
        info!("wrote {} ({} bytes)", path.display(), html.len());
        Ok(())
    }
}
