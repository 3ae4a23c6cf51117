//! Project detection, configuration and loading.

mod config;
mod context;
mod loader;

pub use config::{CONFIG_FILE, ConfigError, XrefConfig};
pub use context::ProjectContext;
pub use loader::{LoadError, SKIP_DIRECTORIES, collect_file_paths, load_project};
