//! BMI prediction core
//!
//! Turns the health form into the bundled model's input vector, runs the
//! model and maps its output to a BMI band.
//!
//! Modules:
//! - `inputs`: Form fields, option sets and the single validation boundary
//! - `features`: Fixed-order 19-slot feature encoding
//! - `model`: One-time model loading and the `Predictor` seam
//! - `classify`: BMI category bands
//! - `pipeline`: Encode, invoke and classify in one call
//! - `session`: Form state and display strings
//! - `config`: TOML and environment configuration
//! - `errors`: Error taxonomy

pub mod classify;
pub mod config;
pub mod errors;
pub mod features;
pub mod inputs;
pub mod model;
pub mod pipeline;
pub mod session;
#[cfg(feature = "tflite")]
pub mod tflite;

pub use classify::{classify, BmiCategory};
pub use config::{BmiConfig, LogFormat, LoggingConfig, ModelConfig};
pub use errors::{BmiError, Result};
pub use features::{encode, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use inputs::{Alcohol, Diet, Exercise, FormOption, Gender, NumericField, RawInputs, UserInputs};
pub use model::{default_backend, ModelBackend, ModelMetadata, ModelState, NoRuntime, Predictor};
pub use pipeline::{predict, predict_raw, PredictionResult};
pub use session::{FormDisplay, FormSession, Outcome};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
