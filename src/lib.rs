pub mod error;
pub mod loader;
pub mod model;
pub mod presets;
pub mod ranking;
pub mod weights;
