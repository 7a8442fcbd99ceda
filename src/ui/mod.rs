pub mod controls;
pub mod legend;
pub mod popup;

pub use controls::{ControlPosition, LayerControl};

pub use legend::{build_legend, Legend, LegendEntry};

pub use popup::PopupContent;
