//! pretcad-common — Shared types, presets, errors and configuration used across all pretcad crates.

pub mod error;
pub mod models;
pub mod presets;
pub mod config;
pub mod report;

// Re-export commonly used types
pub use error::{Result, ScreenerError};
pub use models::{
    DeviceKind, DeviceParameters, OperatingConditions, ScreeningRequest,
    ManualScreeningRequest, CifScreeningRequest, CifProvenance,
};
pub use presets::{Preset, PresetCatalog};
pub use config::ScreenerConfig;
