//! Model hyperparameter file.
//!
//! Checkpoints ship with a JSON config whose `model_config` object describes
//! the architecture (filter sizes, number of samples, pooling ratios, …). The
//! pipeline treats it as opaque: it is loaded once at startup, must be present
//! and well-formed, and is otherwise only logged and exposed read-only.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};

/// The `model_config` section of a checkpoint's JSON config.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelHyperparameters {
    model_config: Map<String, Value>,
}

impl ModelHyperparameters {
    /// Read and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading model config {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("parsing model config {}", path.display()))
    }

    /// Parse a config document; it must contain a `model_config` object.
    ///
    /// ```rust
    /// use spoofcheck::model::ModelHyperparameters;
    ///
    /// let h = ModelHyperparameters::from_json_str(
    ///     r#"{"model_config": {"architecture": "AASIST", "nb_samp": 64600}}"#,
    /// ).unwrap();
    /// assert_eq!(h.get("nb_samp").and_then(|v| v.as_u64()), Some(64_600));
    /// ```
    pub fn from_json_str(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(content)?;
        let model_config = root
            .get("model_config")
            .ok_or_else(|| anyhow!("missing \"model_config\" section"))?
            .as_object()
            .ok_or_else(|| anyhow!("\"model_config\" must be a JSON object"))?
            .clone();
        Ok(Self { model_config })
    }

    /// Look up one hyperparameter.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.model_config.get(key)
    }

    /// Declared architecture name, if the config carries one.
    pub fn architecture(&self) -> Option<&str> {
        self.get("architecture").and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.model_config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model_config.is_empty()
    }
}
