//! # taskping-core
//!
//! Core types, traits, and abstractions for the taskping notification
//! pipeline.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other taskping crates depend on: the task and notification models,
//! the error taxonomy, centralized default constants, structured-logging
//! field names, the trait seams for pluggable sources/presenters/stores, and
//! the persisted notification settings store.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod settings;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use settings::{SettingsStore, SettingsUpdate};
pub use traits::*;
