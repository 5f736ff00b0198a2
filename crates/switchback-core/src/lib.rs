//! # switchback-core
//!
//! Foundation crate for the switchback routing engine: error types, site
//! settings, and logging setup. It carries no routing logic of its own.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result alias
//! - [`settings`] - Site settings and TOML loading
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;

// Re-export the most commonly used types at the crate root.
pub use error::{PatternError, RouterError, RouterResult};
pub use settings::SiteSettings;
