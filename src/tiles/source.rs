use crate::core::{
    constants::{MAPBOX_ATTRIBUTION, MAPBOX_TILE_TEMPLATE, OSM_ATTRIBUTION, OSM_TILE_TEMPLATE},
    geo::TileCoord,
};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    /// URL template with `{z}`/`{x}`/`{y}` placeholders, handed to the
    /// browser-side tile layer.
    fn url_template(&self) -> String;

    /// Attribution markup shown in the map corner.
    fn attribution(&self) -> &str;

    /// Subdomains substituted for `{s}`, if the template uses them.
    fn subdomains(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Mapbox Styles API raster tiles for one style id.
#[derive(Debug, Clone)]
pub struct MapboxStyleSource {
    style: String,
    access_token: String,
}

impl MapboxStyleSource {
    pub fn new(style: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            access_token: access_token.into(),
        }
    }

    pub fn style(&self) -> &str {
        &self.style
    }
}

impl TileSource for MapboxStyleSource {
    fn url(&self, coord: TileCoord) -> String {
        self.url_template()
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }

    fn url_template(&self) -> String {
        MAPBOX_TILE_TEMPLATE
            .replace("{style}", &self.style)
            .replace("{access_token}", &self.access_token)
    }

    fn attribution(&self) -> &str {
        MAPBOX_ATTRIBUTION
    }
}

/// Simple implementation that hits the default OpenStreetMap tile server.
#[derive(Debug, Clone)]
pub struct OpenStreetMapSource {
    subdomains: Vec<&'static str>,
}

impl OpenStreetMapSource {
    pub fn new() -> Self {
        Self {
            subdomains: vec!["a", "b", "c"],
        }
    }
}

impl Default for OpenStreetMapSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for OpenStreetMapSource {
    fn url(&self, coord: TileCoord) -> String {
        if self.subdomains.is_empty() {
            return format!(
                "https://tile.openstreetmap.org/{}/{}/{}.png",
                coord.z, coord.x, coord.y
            );
        }

        let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
        let sub = self.subdomains[idx];
        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            sub, coord.z, coord.x, coord.y
        )
    }

    fn url_template(&self) -> String {
        OSM_TILE_TEMPLATE.to_string()
    }

    fn attribution(&self) -> &str {
        OSM_ATTRIBUTION
    }

    fn subdomains(&self) -> Vec<String> {
        self.subdomains.iter().map(|s| s.to_string()).collect()
    }
}
