use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::converter::ConverterConfig;
use crate::pipeline::PipelineConfig;
use crate::storage::StorageConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Converter settings with the pipeline's scratch directory applied.
    pub fn converter_config(&self) -> ConverterConfig {
        self.converter
            .clone()
            .with_scratch_dir(self.pipeline.scratch_dir.clone())
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}
