//! Form session state
//!
//! Holds what the user has typed and selected plus the two strings the form
//! displays. A predict action updates both strings; failures show a
//! placeholder result and a short status instead of propagating.
use crate::errors::BmiError;
use crate::inputs::{Alcohol, Diet, Exercise, Gender, NumericField, RawInputs};
use crate::model::ModelState;
use crate::pipeline::{predict_raw, PredictionResult};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Result text before the first prediction
pub const INITIAL_RESULT: &str = "BMI";
/// Status text before the first prediction
pub const INITIAL_STATUS: &str = "Enter your details";

/// What the form shows after an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDisplay {
    /// Large result text
    pub result: String,
    /// Category label or status message
    pub status: String,
}

impl FormDisplay {
    fn new(result: &str, status: &str) -> Self {
        Self {
            result: result.to_string(),
            status: status.to_string(),
        }
    }

    fn from_result(prediction: &PredictionResult) -> Self {
        Self {
            result: prediction.display_value(),
            status: prediction.category.label().to_string(),
        }
    }

    /// Placeholder strings for a failed action
    pub fn from_error(err: &BmiError) -> Self {
        match err {
            BmiError::InputParse { .. } => Self::new("?", "Invalid Input"),
            BmiError::ModelUnavailable(_) => Self::new("?", "Model Unavailable"),
            _ => Self::new("ERR", "Failed"),
        }
    }
}

impl Default for FormDisplay {
    fn default() -> Self {
        Self::new(INITIAL_RESULT, INITIAL_STATUS)
    }
}

/// Outcome of the last predict action
#[derive(Debug)]
pub enum Outcome {
    Predicted(PredictionResult),
    Failed(BmiError),
}

/// One form session
#[derive(Debug, Default)]
pub struct FormSession {
    inputs: RawInputs,
    display: FormDisplay,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from already entered values
    pub fn with_inputs(inputs: RawInputs) -> Self {
        Self {
            inputs,
            display: FormDisplay::default(),
        }
    }

    pub fn inputs(&self) -> &RawInputs {
        &self.inputs
    }

    pub fn display(&self) -> &FormDisplay {
        &self.display
    }

    pub fn set_text(&mut self, field: NumericField, text: impl Into<String>) {
        *self.inputs.text_mut(field) = text.into();
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.inputs.gender = gender;
    }

    pub fn set_alcohol(&mut self, alcohol: Alcohol) {
        self.inputs.alcohol = alcohol;
    }

    pub fn set_diet(&mut self, diet: Diet) {
        self.inputs.diet = diet;
    }

    pub fn set_exercise(&mut self, exercise: Exercise) {
        self.inputs.exercise = exercise;
    }

    pub fn set_smoker(&mut self, on: bool) {
        self.inputs.is_smoker = on;
    }

    pub fn set_chronic_disease(&mut self, on: bool) {
        self.inputs.has_chronic_disease = on;
    }

    /// Run one prediction and update the display
    pub fn predict(&mut self, model: &ModelState) -> Outcome {
        match predict_raw(&self.inputs, model) {
            Ok(prediction) => {
                info!(bmi = prediction.bmi, category = %prediction.category, "BMI predicted");
                self.display = FormDisplay::from_result(&prediction);
                Outcome::Predicted(prediction)
            }
            Err(err) => {
                match &err {
                    BmiError::InputParse { .. } => warn!(error = %err, "Rejected form input"),
                    BmiError::ModelUnavailable(_) => warn!(error = %err, "No model loaded"),
                    _ => error!(error = %err, "Prediction error"),
                }
                self.display = FormDisplay::from_error(&err);
                Outcome::Failed(err)
            }
        }
    }
}
