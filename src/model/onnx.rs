//! ONNX Runtime adapter for [`Classifier`].
//!
//! The checkpoint is an exported graph taking `[1, samples]` `f32` audio and
//! returning class logits. AASIST-style exports emit two outputs
//! (`last_hidden`, `output`); by default the **last** output is read, or a
//! named one when `logits_output` is configured.
//!
//! The session is built once and reused for every call. `ort` needs `&mut`
//! access to run, so calls are serialized through a `Mutex`.

use std::path::Path;
use std::sync::Arc;

use super::{Classifier, InferenceError};
#[cfg(feature = "onnx")]
use crate::audio::Waveform;

/// Load the production classifier from `checkpoint`.
///
/// # Errors
///
/// - [`InferenceError::ModelNotFound`]: `checkpoint` does not exist.
/// - [`InferenceError::Init`]: the runtime could not load it, or the crate
///   was built without the `onnx` feature.
pub fn load_classifier(
    checkpoint: &Path,
    logits_output: Option<&str>,
) -> Result<Arc<dyn Classifier>, InferenceError> {
    if !checkpoint.exists() {
        return Err(InferenceError::ModelNotFound(
            checkpoint.display().to_string(),
        ));
    }

    #[cfg(feature = "onnx")]
    {
        Ok(Arc::new(OnnxClassifier::load(checkpoint, logits_output)?))
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = logits_output;
        Err(InferenceError::Init(
            "ONNX runtime support is disabled; enable the `onnx` cargo feature".into(),
        ))
    }
}

// ---------------------------------------------------------------------------
// OnnxClassifier
// ---------------------------------------------------------------------------

#[cfg(feature = "onnx")]
pub struct OnnxClassifier {
    session: std::sync::Mutex<ort::session::Session>,
    logits_output: Option<String>,
}

#[cfg(feature = "onnx")]
impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("logits_output", &self.logits_output)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "onnx")]
impl OnnxClassifier {
    /// Build a session from an `.onnx` checkpoint.
    pub fn load(checkpoint: &Path, logits_output: Option<&str>) -> Result<Self, InferenceError> {
        let session = ort::session::Session::builder()
            .map_err(|e| InferenceError::Init(format!("session builder: {e}")))?
            .commit_from_file(checkpoint)
            .map_err(|e| InferenceError::Init(format!("{}: {e}", checkpoint.display())))?;

        log::info!(
            "onnx: loaded {} ({} inputs, {} outputs)",
            checkpoint.display(),
            session.inputs.len(),
            session.outputs.len()
        );

        Ok(Self {
            session: std::sync::Mutex::new(session),
            logits_output: logits_output.map(str::to_string),
        })
    }
}

#[cfg(feature = "onnx")]
impl Classifier for OnnxClassifier {
    fn predict(&self, waveform: &Waveform) -> Result<Vec<f32>, InferenceError> {
        let input = ort::value::TensorRef::from_array_view((
            [1usize, waveform.len()],
            waveform.samples(),
        ))
        .map_err(|e| InferenceError::Runtime(format!("input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::Runtime("session mutex poisoned".into()))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| InferenceError::Runtime(format!("forward pass: {e}")))?;

        if outputs.len() == 0 {
            return Err(InferenceError::NoOutput);
        }

        let output = match &self.logits_output {
            Some(name) => outputs.get(name.as_str()).ok_or_else(|| {
                InferenceError::Runtime(format!("model has no output named {name:?}"))
            })?,
            None => &outputs[outputs.len() - 1],
        };

        let (_shape, logits) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("extract logits: {e}")))?;

        Ok(logits.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
