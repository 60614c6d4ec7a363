pub mod presets;
pub mod rank;
