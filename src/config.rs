//! Evaluator configuration loaded from JSON.

use crate::evaluator::PartialEvaluator;
use crate::registry::FunctionRegistry;
use crate::transform::TransformTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings used to assemble a [`PartialEvaluator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Register the operators the built-in constant evaluator implements
    pub builtins: bool,
    /// Additional function identifiers known to the backend
    pub functions: Vec<String>,
    /// Install the standard rewrite rules
    pub transforms: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            builtins: true,
            functions: Vec::new(),
            transforms: true,
        }
    }
}

impl EvaluatorConfig {
    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the function registry described by this configuration
    pub fn registry(&self) -> FunctionRegistry {
        let registry = if self.builtins {
            FunctionRegistry::with_builtins()
        } else {
            FunctionRegistry::new()
        };
        for name in &self.functions {
            registry.register(name.as_str());
        }
        log::debug!("Function registry holds {} identifiers", registry.len());
        registry
    }

    /// Build the evaluator described by this configuration
    pub fn build(&self) -> PartialEvaluator {
        let transformer = self.transforms.then(|| Arc::new(TransformTable::standard()));
        PartialEvaluator::new(Arc::new(self.registry()), transformer)
    }
}
