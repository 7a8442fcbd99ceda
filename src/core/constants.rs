//! Engine-wide constants: data sources, marker and boundary styling, and the
//! default view. Keeping them in a single place makes it easier to tweak the
//! look of the map.

/// USGS feed of every earthquake recorded in the past week.
pub const EARTHQUAKE_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// Bird (2003) PB2002 plate boundaries.
pub const PLATE_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

/// Meters of circle radius per unit of magnitude.
pub const SCALE_FACTOR: f64 = 10_000.0;

/// Smallest radius handed to the mapping library, in meters.
pub const MIN_MARKER_RADIUS_M: f64 = 1.0;

pub const MARKER_FILL_OPACITY: f64 = 0.4;
pub const MARKER_STROKE_COLOR: &str = "black";
pub const MARKER_STROKE_WEIGHT: f64 = 0.5;

pub const PLATE_STROKE_COLOR: &str = "red";
pub const PLATE_STROKE_WEIGHT: f64 = 2.0;

/// Lower label of the shallowest legend entry. The bin itself is open below.
pub const LEGEND_FLOOR_KM: f64 = -10.0;

/// Initial map center (latitude, longitude): the contiguous United States.
pub const DEFAULT_CENTER: (f64, f64) = (37.09, -95.71);
pub const DEFAULT_ZOOM: f64 = 5.0;

pub const MAPBOX_TILE_TEMPLATE: &str =
    "https://api.mapbox.com/styles/v1/{style}/tiles/{z}/{x}/{y}?access_token={access_token}";
pub const MAPBOX_ATTRIBUTION: &str = "© <a href='https://www.mapbox.com/about/maps/'>Mapbox</a> © <a href='http://www.openstreetmap.org/copyright'>OpenStreetMap</a> <strong><a href='https://www.mapbox.com/map-feedback/' target='_blank'>Improve this map</a></strong>";

/// Mapbox style tiles are 512px; a zoom offset of -1 keeps labels legible.
pub const MAPBOX_TILE_SIZE: u32 = 512;
pub const MAPBOX_ZOOM_OFFSET: i32 = -1;

pub const OSM_TILE_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    "© <a href='http://www.openstreetmap.org/copyright'>OpenStreetMap</a> contributors";

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;
pub const MAX_ZOOM: u8 = 18;

/// Pinned Leaflet release loaded by rendered documents.
pub const LEAFLET_VERSION: &str = "1.9.4";

pub const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));
