//! pretcad-client — HTTP client for the remote MOSFET screening service.
//!
//! Endpoints:
//!   POST {base}/screen         — manual device parameters
//!   POST {base}/screen_alignn  — raw CIF text (ALIGNN property prediction + MOSFET calculation)

pub mod service;

pub use service::{HttpScreeningService, ScreeningService};
