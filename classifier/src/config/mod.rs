//! Layered configuration for the pre-screening tools.
//!
//! Sources are merged in order, later layers winning:
//! 1. Defaults (from code)
//! 2. Config file (`irb-prescreen.toml`)
//! 3. Environment variables (`IRB_PRESCREEN_*` prefix, `__` for nesting)
//!
//! Only presentation and tooling settings live here. The regulatory rule
//! set is fixed and cannot be configured.
//!
//! ```no_run
//! use irb_classifier::config::ConfigLoader;
//!
//! let config = ConfigLoader::load_default().expect("config loads");
//! let from_file = ConfigLoader::new()
//!     .with_file("./irb-prescreen.toml")
//!     .load()
//!     .expect("config loads");
//! # let _ = (config, from_file);
//! ```

pub mod error;
pub mod loader;
pub mod validator;

pub use error::{ConfigError, Result};
pub use loader::{
    ConfigLoader, LoggingConfig, OutputConfig, OutputFormat, ReviewConfig, ScreenConfig,
};
pub use validator::SchemaValidator;
