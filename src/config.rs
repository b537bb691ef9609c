//! Run configuration for the route pipeline.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::location::GroupId;
use crate::ors::OrsConfig;
use crate::pipeline::PipelineOptions;
use crate::retry::RetryPolicy;
use crate::solver::SolveOptions;

/// Environment variable holding the routing service API key.
pub const API_KEY_ENV_VAR: &str = "ORS_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub origin: usize,
    pub local_search_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let options = SolveOptions::default();
        Self {
            origin: options.origin,
            local_search_iterations: options.local_search_iterations,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub locations_path: PathBuf,
    pub output_dir: PathBuf,
    pub groups: Vec<GroupId>,
    pub provider: OrsConfig,
    /// Use great-circle estimates instead of the routing service.
    pub offline: bool,
    pub retry: RetryPolicy,
    pub solver: SolverConfig,
    pub concurrent: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            locations_path: PathBuf::from("route_visualization/garage_coordinates_3_groups.json"),
            output_dir: PathBuf::from("route_visualization"),
            groups: vec![1, 2, 3],
            provider: OrsConfig::default(),
            offline: false,
            retry: RetryPolicy::default(),
            solver: SolverConfig::default(),
            concurrent: true,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Fills a missing API key from the environment.
    pub fn with_env_api_key(mut self) -> Self {
        if self.provider.api_key.is_none() {
            self.provider.api_key = std::env::var(API_KEY_ENV_VAR)
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty());
        }
        self
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            groups: self.groups.clone(),
            solve: SolveOptions {
                origin: self.solver.origin,
                local_search_iterations: self.solver.local_search_iterations,
            },
            retry: self.retry.clone(),
            concurrent: self.concurrent,
        }
    }
}
