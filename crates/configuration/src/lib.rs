//! # Configuration Crate
//!
//! Loads the admin connection settings, resolves default file locations and installs
//! the tracing subscriber. Everything that reads the environment or the config file
//! lives here and runs once at process start; the provisioning engine only ever sees
//! the resulting plain structs.
//!
//! ## Public API
//!
//! - `load_server_config`: reads the `[mariadb]` section of `config.ini`.
//! - `resolve_default_paths`: XDG locations of the config, CSV and error log files.
//! - `write_config_file`: writes the file produced by `--init`.
//! - `init_tracing`: installs the global subscriber.

// Declare the modules that make up this crate.
pub mod bootstrap;
pub mod error;
pub mod logging;
pub mod paths;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use bootstrap::write_config_file;
pub use error::ConfigError;
pub use logging::init_tracing;
pub use paths::{AppPaths, resolve_default_paths, resolve_paths};
pub use settings::{SERVER_SECTION, ServerConfig, load_server_config, render_ini};
