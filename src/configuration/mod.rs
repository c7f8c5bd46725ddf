use serde::Deserialize;
use std::fs;
use std::path::Path;

mod error;

use crate::registry::ClientConfig;
use crate::target::TargetConfig;
pub use error::Error;

/// Contents of the optional TOML configuration file. Every section may be
/// omitted.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Configuration {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config_str = fs::read_to_string(path)?;
        Self::load_from_str(&config_str)
    }

    pub fn load_from_str(slice: &str) -> Result<Self, Error> {
        let config = toml::from_str(slice)?;
        Ok(config)
    }
}
