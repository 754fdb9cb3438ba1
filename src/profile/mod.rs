//! Rendering profiles and the store that holds them

pub mod defaults;
mod error;
mod merge;
mod store;
mod types;

pub use error::ConfigError;
pub use merge::{deep_merge, merged};
pub use store::{config_path, load, load_from, parse, save, save_to, ConfigurationStore, CONFIG_VARIABLE};
pub use types::*;
