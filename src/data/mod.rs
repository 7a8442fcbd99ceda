pub mod earthquake;
pub mod geojson;
pub mod loader;
pub mod source;
