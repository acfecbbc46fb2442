//! Project configuration - which queries and mutations to compile.
//!
//! Loaded from YAML. Only the parts that feed compilation are modelled;
//! template and emitter settings belong to the generator that consumes
//! the output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::error::{QuerysmithError, Result};

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_SCHEMA_FILE: &str = "schema.json";
pub const DEFAULT_QUERY_FIELD_DEPTH: usize = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Tracing filter used when the environment does not set one.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Introspection document, relative to the config file.
    #[serde(default = "default_schema_file")]
    pub schema_file: String,
    #[serde(default)]
    pub packages: Vec<PackageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub queries: Vec<QueryConfig>,
    #[serde(default)]
    pub mutations: Vec<MutationConfig>,
}

/// Endpoints reachable under a common field path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub path: Vec<String>,
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    #[serde(default = "default_depth")]
    pub max_query_field_depth: usize,
    /// Replaces the required-only argument default when non-empty.
    #[serde(default)]
    pub include_arguments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    pub name: String,
    #[serde(default = "default_depth")]
    pub max_query_field_depth: usize,
    #[serde(default)]
    pub argument_type_overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_schema_file() -> String {
    DEFAULT_SCHEMA_FILE.to_string()
}

fn default_depth() -> usize {
    DEFAULT_QUERY_FIELD_DEPTH
}

impl Config {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(QuerysmithError::Config("config file name required".to_string()));
        }
        debug!(file = %path.display(), "loading config");

        let text = fs::read_to_string(path)
            .map_err(|e| QuerysmithError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_yaml(&text)?;

        trace!(?config, "config loaded");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| QuerysmithError::Config(e.to_string()))
    }

    /// Schema location, resolved against the directory holding the config.
    pub fn schema_path(&self, config_path: &Path) -> PathBuf {
        let schema = Path::new(&self.schema_file);
        if schema.is_absolute() {
            return schema.to_path_buf();
        }
        match config_path.parent() {
            Some(dir) => dir.join(schema),
            None => schema.to_path_buf(),
        }
    }
}
