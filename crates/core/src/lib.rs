//! nxsweep-core - Core library for the nxsweep CLI
//!
//! This library walks the paginated components listing of a Nexus repository,
//! aggregates what it finds, and drives list or delete sweeps over the result.

pub mod aggregate;
pub mod client;
pub mod component;
pub mod config;
pub mod error;
pub mod sweep;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use aggregate::{aggregate, Aggregate, PathFilter};
pub use client::{ComponentSource, NexusClient};
pub use component::{Component, Page};
pub use config::{get_config_path, load_config, resolve_config, save_config_to, validate_config};
pub use config::{AdvancedConfig, ConfigFile, LoggingConfig, NexusConfig, Overrides};
pub use error::{Error, Result};
pub use sweep::{DeleteEvent, DeleteSummary, Sweeper};
pub use walker::{page_url, walk, PageLimit};
