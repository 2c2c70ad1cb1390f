//! Loading the bundled model and invoking it
//!
//! The inference runtime is a black box behind [`Predictor`]. Loading happens
//! once at startup and yields a [`ModelState`]: either a ready predictor or an
//! unavailable sentinel that every later prediction reports as
//! [`BmiError::ModelUnavailable`].
use crate::config::ModelConfig;
use crate::errors::{BmiError, Result};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// A loaded model: feature vector in, one scalar out
pub trait Predictor: Send + Sync {
    /// Run the model once. Runtime failures are reported as
    /// [`BmiError::Prediction`].
    fn predict(&self, features: &FeatureVector) -> Result<f32>;
}

impl<F> Predictor for F
where
    F: Fn(&FeatureVector) -> Result<f32> + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> Result<f32> {
        self(features)
    }
}

/// Inference runtime able to open a model artifact
pub trait ModelBackend {
    /// Runtime name, for logs
    fn name(&self) -> &str;

    /// Build a predictor from the artifact bytes read from `path`
    fn open(&self, path: &Path, bytes: &[u8]) -> Result<Box<dyn Predictor>>;
}

/// Backend used when no inference runtime was compiled in
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRuntime;

impl ModelBackend for NoRuntime {
    fn name(&self) -> &str {
        "none"
    }

    fn open(&self, _path: &Path, _bytes: &[u8]) -> Result<Box<dyn Predictor>> {
        Err(BmiError::ModelUnavailable(
            "built without an inference runtime (enable the `tflite` feature)".to_string(),
        ))
    }
}

/// The runtime this build ships with
pub fn default_backend() -> Box<dyn ModelBackend> {
    #[cfg(feature = "tflite")]
    {
        Box::new(crate::tflite::TfliteBackend)
    }
    #[cfg(not(feature = "tflite"))]
    {
        Box::new(NoRuntime)
    }
}

/// Facts about the loaded artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Artifact path
    pub path: PathBuf,
    /// Artifact size in bytes
    pub size_bytes: u64,
    /// BLAKE3 digest of the artifact (hex)
    pub blake3: String,
    /// Runtime that opened the artifact
    pub backend: String,
}

/// A predictor together with what it was loaded from
pub struct LoadedModel {
    predictor: Box<dyn Predictor>,
    metadata: ModelMetadata,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Outcome of the one-time model initialization
#[derive(Debug)]
pub enum ModelState {
    /// A predictor is ready
    Ready(LoadedModel),
    /// Loading failed; the reason is kept for reporting
    Unavailable { reason: String },
}

impl ModelState {
    /// Load the artifact named by `config` and open it with `backend`.
    ///
    /// Never fails: every error is captured in [`ModelState::Unavailable`].
    #[instrument(skip(config, backend), fields(path = %config.path.display(), backend = backend.name()))]
    pub fn load(config: &ModelConfig, backend: &dyn ModelBackend) -> Self {
        match Self::try_load(config, backend) {
            Ok(model) => {
                info!(
                    size_bytes = model.metadata.size_bytes,
                    blake3 = %model.metadata.blake3,
                    "Model loaded"
                );
                ModelState::Ready(model)
            }
            Err(err) => {
                error!(error = %err, "Failed to load model");
                let reason = match err {
                    BmiError::ModelUnavailable(reason) => reason,
                    other => other.to_string(),
                };
                ModelState::unavailable(reason)
            }
        }
    }

    fn try_load(config: &ModelConfig, backend: &dyn ModelBackend) -> Result<LoadedModel> {
        let bytes = read_artifact(config)?;
        let predictor = backend.open(&config.path, &bytes)?;

        Ok(LoadedModel {
            predictor,
            metadata: ModelMetadata {
                path: config.path.clone(),
                size_bytes: bytes.len() as u64,
                blake3: artifact_hash_hex(&bytes),
                backend: backend.name().to_string(),
            },
        })
    }

    /// Wrap an already constructed predictor
    pub fn ready(predictor: Box<dyn Predictor>, metadata: ModelMetadata) -> Self {
        ModelState::Ready(LoadedModel {
            predictor,
            metadata,
        })
    }

    /// State for a model that could not be loaded
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelState::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready(_))
    }

    /// Metadata of the loaded artifact, if any
    pub fn metadata(&self) -> Option<&ModelMetadata> {
        match self {
            ModelState::Ready(model) => Some(&model.metadata),
            ModelState::Unavailable { .. } => None,
        }
    }

    /// Why the model is unavailable, if it is
    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            ModelState::Ready(_) => None,
            ModelState::Unavailable { reason } => Some(reason.as_str()),
        }
    }

    /// Run the model on one feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<f32> {
        let model = match self {
            ModelState::Ready(model) => model,
            ModelState::Unavailable { reason } => {
                return Err(BmiError::ModelUnavailable(reason.clone()));
            }
        };

        debug!(features = ?features.as_slice(), "Invoking model");
        let value = model.predictor.predict(features)?;

        if !value.is_finite() {
            warn!(value, "Model returned a non-finite value");
            return Err(BmiError::Prediction(format!(
                "model returned a non-finite value ({})",
                value
            )));
        }

        Ok(value)
    }
}

/// Read the artifact and run the size and digest checks
pub fn read_artifact(config: &ModelConfig) -> Result<Vec<u8>> {
    let bytes = read_artifact_bounded(config)?;

    if let Some(expected) = &config.expected_blake3 {
        verify_artifact_hash(&bytes, expected)?;
    }

    Ok(bytes)
}

/// Read the artifact, refusing anything over `max_size_bytes`. The digest is
/// not checked.
pub fn read_artifact_bounded(config: &ModelConfig) -> Result<Vec<u8>> {
    let path = &config.path;

    let size = std::fs::metadata(path)
        .map_err(|e| BmiError::ModelUnavailable(format!("{}: {}", path.display(), e)))?
        .len();

    if size > config.max_size_bytes {
        return Err(BmiError::Integrity(format!(
            "{} is {} bytes, limit is {}",
            path.display(),
            size,
            config.max_size_bytes
        )));
    }

    Ok(std::fs::read(path)?)
}

/// BLAKE3 digest of an artifact, as lowercase hex
pub fn artifact_hash_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Compare the artifact digest against `expected` (hex, case-insensitive)
pub fn verify_artifact_hash(bytes: &[u8], expected: &str) -> Result<()> {
    let actual = artifact_hash_hex(bytes);
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(BmiError::Integrity(format!(
            "digest mismatch: expected {}, got {}",
            expected.trim(),
            actual
        )))
    }
}
