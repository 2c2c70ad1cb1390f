//! Encode -> invoke -> classify

use crate::classify::{classify, BmiCategory};
use crate::errors::Result;
use crate::features::encode;
use crate::inputs::{RawInputs, UserInputs};
use crate::model::ModelState;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Model estimate and its band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Raw model output
    pub bmi: f32,
    pub category: BmiCategory,
}

impl PredictionResult {
    /// BMI rounded to one decimal, as displayed
    pub fn display_value(&self) -> String {
        format!("{:.1}", self.bmi)
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} ({})", self.bmi, self.category)
    }
}

/// Predict from validated inputs
pub fn predict(inputs: &UserInputs, model: &ModelState) -> Result<PredictionResult> {
    let features = encode(inputs);
    let bmi = model.predict(&features)?;
    let category = classify(bmi);
    debug!(bmi, category = %category, "Prediction complete");
    Ok(PredictionResult { bmi, category })
}

/// Validate raw form values, then predict. Invalid input never reaches the
/// model.
pub fn predict_raw(raw: &RawInputs, model: &ModelState) -> Result<PredictionResult> {
    let inputs = raw.validate()?;
    predict(&inputs, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BmiError;
    use crate::features::FeatureVector;
    use crate::model::ModelMetadata;
    use std::path::PathBuf;

    fn stub(value: f32) -> ModelState {
        ModelState::ready(
            Box::new(move |_: &FeatureVector| -> Result<f32> { Ok(value) }),
            ModelMetadata {
                path: PathBuf::from("stub"),
                size_bytes: 0,
                blake3: String::new(),
                backend: "stub".to_string(),
            },
        )
    }

    fn raw() -> RawInputs {
        RawInputs {
            age: "28".into(),
            height: "165".into(),
            weight: "60".into(),
            sleep_hours: "7".into(),
            ..RawInputs::default()
        }
    }

    #[test]
    fn test_fixed_scalar_end_to_end() {
        let result = predict_raw(&raw(), &stub(22.3)).unwrap();
        assert_eq!(result.display_value(), "22.3");
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.to_string(), "22.3 (Normal)");
    }

    #[test]
    fn test_display_rounds_to_one_decimal() {
        let result = predict_raw(&raw(), &stub(31.46)).unwrap();
        assert_eq!(result.display_value(), "31.5");
        assert_eq!(result.category, BmiCategory::Obese);
    }

    #[test]
    fn test_unavailable_model() {
        let state = ModelState::unavailable("not bundled");
        let err = predict_raw(&raw(), &state).unwrap_err();
        assert!(matches!(err, BmiError::ModelUnavailable(ref r) if r == "not bundled"));
    }
}
