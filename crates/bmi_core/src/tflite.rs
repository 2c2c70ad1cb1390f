//! TensorFlow Lite runtime backed by `tract-tflite`

use crate::errors::{BmiError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::model::{ModelBackend, Predictor};
use std::io::Cursor;
use std::path::Path;
use tract_core::framework::Framework;
use tract_core::prelude::*;

/// Opens `.tflite` artifacts
#[derive(Debug, Default, Clone, Copy)]
pub struct TfliteBackend;

impl ModelBackend for TfliteBackend {
    fn name(&self) -> &str {
        "tract-tflite"
    }

    fn open(&self, path: &Path, bytes: &[u8]) -> Result<Box<dyn Predictor>> {
        let unavailable =
            |e: TractError| BmiError::ModelUnavailable(format!("{}: {}", path.display(), e));

        let plan = tract_tflite::tflite()
            .model_for_read(&mut Cursor::new(bytes))
            .map_err(unavailable)?
            .into_optimized()
            .map_err(unavailable)?
            .into_runnable()
            .map_err(unavailable)?;

        Ok(Box::new(TfliteModel { plan }))
    }
}

/// A runnable TFLite plan
pub struct TfliteModel {
    plan: TypedRunnableModel<TypedModel>,
}

impl Predictor for TfliteModel {
    fn predict(&self, features: &FeatureVector) -> Result<f32> {
        let failed = |e: TractError| BmiError::Prediction(e.to_string());

        let input = Tensor::from_shape(&[1, FEATURE_COUNT], features.as_slice()).map_err(failed)?;
        let outputs = self.plan.run(tvec!(input.into())).map_err(failed)?;

        let output = outputs
            .first()
            .ok_or_else(|| BmiError::Prediction("model produced no outputs".to_string()))?;

        output
            .as_slice::<f32>()
            .map_err(failed)?
            .first()
            .copied()
            .ok_or_else(|| BmiError::Prediction("model output tensor is empty".to_string()))
    }
}
