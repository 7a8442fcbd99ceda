pub mod base;
pub mod macros;
pub mod marker;
pub mod tile;
pub mod vector;
