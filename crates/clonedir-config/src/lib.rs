//! Configuration management for clonedir
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. A configuration file (YAML, TOML or JSON)
//! 3. Environment variables prefixed with `CLONEDIR`, using `__` to separate
//!    sections (e.g. `CLONEDIR_MIRROR__USE_CHECKSUM=false`)
//!
//! Command-line flags are applied on top by the CLI.
//!
//! # Examples
//!
//! ```rust,no_run
//! use clonedir_config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .add_source_file("clonedir.yaml")
//!     .add_env_prefix("CLONEDIR")
//!     .build()
//!     .expect("Failed to load configuration");
//!
//! println!("Checksums enabled: {}", config.mirror.use_checksum);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clonedir_types::ErrorPolicy;
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod error;
pub mod loader;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

/// Log levels accepted in `logging.level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for clonedir
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mirror behaviour
    pub mirror: MirrorConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Mirror behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Skip entries whose fingerprint already matches the source
    pub use_checksum: bool,
    /// Report actions without modifying destinations
    pub dry_run: bool,
    /// What to do when one destination fails
    pub on_error: ErrorPolicy,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            use_checksum: true,
            dry_run: false,
            on_error: ErrorPolicy::Abort,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when neither `RUST_LOG` nor a CLI flag sets one
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
