//! pretcad-bridge — Form Bridge between a parameter form and the screening service.
//!
//! The bridge never touches a real UI, browser storage or window location.
//! Those arrive as injected capabilities:
//!   FormSurface   — get/set form fields by name, selected files
//!   ExchangeStore — durable key/value storage read by the results page
//!   Navigator     — move to another page
//!   Notifier      — blocking user-facing alert

pub mod surface;
pub mod store;
pub mod shell;
pub mod input;
pub mod navigation;
pub mod bridge;

pub use bridge::{BridgeConfig, BridgeDeps, FormBridge, SubmissionOutcome};
pub use shell::{Navigator, Notifier};
pub use store::{ExchangeStore, JsonFileStore, MemoryStore, StoredExchange, INPUT_KEY, RESULT_KEY};
pub use surface::{FileSource, FormSurface, MemoryForm, SelectedFile};
