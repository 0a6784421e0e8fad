//! Process-wide model context.
//!
//! Built once at startup and shared read-only (behind an `Arc`) by every
//! request. Nothing in it is mutated after construction, so concurrent batches
//! need no locking here; a classifier that needs exclusive access to its
//! runtime handles that internally.

use std::fmt;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};

use crate::audio::AudioNormalizer;
use crate::config::ModelConfig;
use crate::model::{load_classifier, Classifier, ModelHyperparameters, Scorer};

/// The loaded classifier plus everything needed to feed it.
#[derive(Clone)]
pub struct ModelContext {
    classifier: Arc<dyn Classifier>,
    normalizer: AudioNormalizer,
    hyperparameters: Option<ModelHyperparameters>,
}

impl fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelContext")
            .field("sample_rate", &self.sample_rate())
            .field("hyperparameters", &self.hyperparameters)
            .finish_non_exhaustive()
    }
}

impl ModelContext {
    pub fn new(classifier: Arc<dyn Classifier>, sample_rate: u32) -> Self {
        Self {
            classifier,
            normalizer: AudioNormalizer::new(sample_rate),
            hyperparameters: None,
        }
    }

    pub fn with_hyperparameters(mut self, hyperparameters: ModelHyperparameters) -> Self {
        self.hyperparameters = Some(hyperparameters);
        self
    }

    /// Read the hyperparameter file and load the checkpoint named by `config`.
    ///
    /// Any failure here is fatal for the service: there is no degraded mode
    /// without a model.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        ensure!(config.sample_rate > 0, "model sample rate must be positive");

        let hyperparameters = ModelHyperparameters::load(&config.hyperparameters)?;
        log::info!(
            "Loaded model config {} ({} entries, architecture: {})",
            config.hyperparameters.display(),
            hyperparameters.len(),
            hyperparameters.architecture().unwrap_or("unspecified"),
        );

        let classifier = load_classifier(&config.checkpoint, config.logits_output.as_deref())
            .with_context(|| format!("loading checkpoint {}", config.checkpoint.display()))?;
        log::info!("Model loaded from {}", config.checkpoint.display());

        Ok(Self::new(classifier, config.sample_rate).with_hyperparameters(hyperparameters))
    }

    /// A scorer sharing this context's classifier.
    pub fn scorer(&self) -> Scorer {
        Scorer::new(Arc::clone(&self.classifier))
    }

    pub fn normalizer(&self) -> &AudioNormalizer {
        &self.normalizer
    }

    pub fn sample_rate(&self) -> u32 {
        self.normalizer.target_rate()
    }

    pub fn hyperparameters(&self) -> Option<&ModelHyperparameters> {
        self.hyperparameters.as_ref()
    }
}
