//! Repository configuration

use crate::sparql::QueryLanguage;
use oxiri::Iri;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid base IRI {iri}: {reason}")]
    InvalidBaseIri { iri: String, reason: String },

    #[error("max_connections must be at least 1")]
    ZeroConnections,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Repository configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Maximum concurrently open connections for the in-memory store (None = unbounded)
    pub max_connections: Option<usize>,
    /// Base IRI for resolving relative references during ingest
    pub base_iri: Option<String>,
    /// Language given to queries built by [`super::Repository::query`]
    pub default_language: QueryLanguage,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            max_connections: None,
            base_iri: None,
            default_language: QueryLanguage::Sparql,
        }
    }
}

impl RepositoryConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_connections == Some(0) {
            return Err(ConfigError::ZeroConnections);
        }
        if let Some(iri) = &self.base_iri {
            Iri::parse(iri.as_str()).map_err(|e| ConfigError::InvalidBaseIri {
                iri: iri.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}
