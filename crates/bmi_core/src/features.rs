//! Feature encoding for the bundled BMI model
//!
//! The model consumes 19 `f32` values in a fixed order:
//! 0. placeholder (always 0.0)
//! 1. age
//! 2. height
//! 3. weight
//! 4. sleep hours
//! 5-6. gender one-hot (Male, Other)
//! 7. smoker flag
//! 8-10. alcohol one-hot (Low, Moderate, High)
//! 11-13. diet one-hot (Average, Good, Excellent)
//! 14-16. exercise one-hot (1-2, 3-5, Daily)
//! 17-18. chronic disease one-hot (Yes, No)
//!
//! Numeric values are passed through unscaled.
use crate::inputs::{Alcohol, Diet, Exercise, FormOption, Gender, UserInputs};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of inputs the bundled model was trained on
pub const FEATURE_COUNT: usize = 19;

/// Slot names, in model order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "placeholder",
    "age",
    "height",
    "weight",
    "sleep_hours",
    "gender_male",
    "gender_other",
    "smoker",
    "alcohol_low",
    "alcohol_moderate",
    "alcohol_high",
    "diet_average",
    "diet_good",
    "diet_excellent",
    "exercise_1_2",
    "exercise_3_5",
    "exercise_daily",
    "chronic_yes",
    "chronic_no",
];

const PLACEHOLDER: usize = 0;
const AGE: usize = 1;
const HEIGHT: usize = 2;
const WEIGHT: usize = 3;
const SLEEP: usize = 4;
const SMOKER: usize = 7;

/// Slot ranges of the one-hot groups
pub const GENDER_SLOTS: Range<usize> = 5..7;
pub const ALCOHOL_SLOTS: Range<usize> = 8..11;
pub const DIET_SLOTS: Range<usize> = 11..14;
pub const EXERCISE_SLOTS: Range<usize> = 14..17;
pub const CHRONIC_SLOTS: Range<usize> = 17..19;

/// Every one-hot group with its name
pub const ONE_HOT_GROUPS: [(&str, Range<usize>); 5] = [
    ("gender", GENDER_SLOTS),
    ("alcohol", ALCOHOL_SLOTS),
    ("diet", DIET_SLOTS),
    ("exercise", EXERCISE_SLOTS),
    ("chronic", CHRONIC_SLOTS),
];

/// Model input vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f32; FEATURE_COUNT]);

impl FeatureVector {
    /// Values in model order
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn as_array(&self) -> &[f32; FEATURE_COUNT] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value of a named slot
    pub fn get(&self, name: &str) -> Option<f32> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
    }

    /// Name/value pairs, for diagnostics
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<FeatureVector> for Vec<f32> {
    fn from(features: FeatureVector) -> Self {
        features.0.to_vec()
    }
}

/// Build the model input vector from validated inputs
pub fn encode(inputs: &UserInputs) -> FeatureVector {
    let mut slots = [0.0f32; FEATURE_COUNT];

    slots[PLACEHOLDER] = 0.0;
    slots[AGE] = inputs.age;
    slots[HEIGHT] = inputs.height;
    slots[WEIGHT] = inputs.weight;
    slots[SLEEP] = inputs.sleep_hours;

    one_hot::<Gender>(&mut slots, GENDER_SLOTS, inputs.gender);
    slots[SMOKER] = flag(inputs.is_smoker);
    one_hot::<Alcohol>(&mut slots, ALCOHOL_SLOTS, inputs.alcohol);
    one_hot::<Diet>(&mut slots, DIET_SLOTS, inputs.diet);
    one_hot::<Exercise>(&mut slots, EXERCISE_SLOTS, inputs.exercise);

    // Yes comes before No.
    slots[CHRONIC_SLOTS.start] = flag(inputs.has_chronic_disease);
    slots[CHRONIC_SLOTS.start + 1] = flag(!inputs.has_chronic_disease);

    FeatureVector(slots)
}

fn one_hot<T: FormOption>(slots: &mut [f32; FEATURE_COUNT], group: Range<usize>, selected: T) {
    debug_assert_eq!(group.len(), T::ALL.len());
    for (slot, option) in slots[group].iter_mut().zip(T::ALL) {
        *slot = flag(option.index() == selected.index());
    }
}

fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}
