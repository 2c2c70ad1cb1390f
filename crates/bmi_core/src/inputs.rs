//! User inputs collected by the health form
//!
//! Raw text from the numeric fields is validated exactly once, in
//! [`RawInputs::validate`], producing an immutable [`UserInputs`].
use crate::errors::{BmiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Options shared by every selector on the form.
///
/// `index` is the position of the option in `ALL`, which is also the order
/// of its one-hot slots in the feature vector.
pub trait FormOption: Copy + Sized + 'static {
    /// Every option, in selector and one-hot order
    const ALL: &'static [Self];
    /// Selector title
    const TITLE: &'static str;

    /// Display label
    fn label(self) -> &'static str;

    /// Position of this option in `ALL`
    fn index(self) -> usize;

    /// Option at a selector position
    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display labels in selector order
    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|o| o.label()).collect()
    }
}

macro_rules! form_option {
    (
        $(#[$meta:meta])*
        $name:ident, $title:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl FormOption for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];
            const TITLE: &'static str = $title;

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn index(self) -> usize {
                self as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|o| o.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        format!(
                            "unknown {} option {:?}, expected one of: {}",
                            $title,
                            s,
                            Self::labels().join(", ")
                        )
                    })
            }
        }
    };
}

// The first variant of each set is the initial selection.
form_option! {
    /// Gender selector
    Gender, "Gender" {
        Male => "Male",
        Other => "Other",
    }
}

form_option! {
    /// Alcohol consumption selector
    Alcohol, "Alcohol" {
        Low => "Low",
        Moderate => "Moderate",
        High => "High",
    }
}

form_option! {
    /// Diet quality selector
    Diet, "Diet" {
        Average => "Average",
        Good => "Good",
        Excellent => "Excellent",
    }
}

form_option! {
    /// Exercise frequency selector (sessions per week)
    Exercise, "Exercise" {
        OneToTwo => "1-2",
        ThreeToFive => "3-5",
        Daily => "Daily",
    }
}

/// Numeric fields on the form, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Age,
    Height,
    Weight,
    Sleep,
}

impl NumericField {
    pub const ALL: [NumericField; 4] = [
        NumericField::Age,
        NumericField::Height,
        NumericField::Weight,
        NumericField::Sleep,
    ];

    /// Field title as shown on the form
    pub fn title(self) -> &'static str {
        match self {
            NumericField::Age => "Age",
            NumericField::Height => "Height",
            NumericField::Weight => "Weight",
            NumericField::Sleep => "Sleep",
        }
    }

    /// Unit shown next to the field
    pub fn unit(self) -> &'static str {
        match self {
            NumericField::Age => "yrs",
            NumericField::Height => "cm",
            NumericField::Weight => "kg",
            NumericField::Sleep => "hrs",
        }
    }
}

/// Validated inputs ready for feature encoding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserInputs {
    /// Age in years
    pub age: f32,
    /// Height in centimetres
    pub height: f32,
    /// Weight in kilograms
    pub weight: f32,
    /// Average sleep per night in hours
    pub sleep_hours: f32,
    pub gender: Gender,
    pub is_smoker: bool,
    pub alcohol: Alcohol,
    pub diet: Diet,
    pub exercise: Exercise,
    pub has_chronic_disease: bool,
}

/// Form values as entered, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInputs {
    pub age: String,
    pub height: String,
    pub weight: String,
    pub sleep_hours: String,
    pub gender: Gender,
    pub is_smoker: bool,
    pub alcohol: Alcohol,
    pub diet: Diet,
    pub exercise: Exercise,
    pub has_chronic_disease: bool,
}

impl RawInputs {
    /// Raw text of a numeric field
    pub fn text(&self, field: NumericField) -> &str {
        match field {
            NumericField::Age => &self.age,
            NumericField::Height => &self.height,
            NumericField::Weight => &self.weight,
            NumericField::Sleep => &self.sleep_hours,
        }
    }

    /// Mutable raw text of a numeric field
    pub fn text_mut(&mut self, field: NumericField) -> &mut String {
        match field {
            NumericField::Age => &mut self.age,
            NumericField::Height => &mut self.height,
            NumericField::Weight => &mut self.weight,
            NumericField::Sleep => &mut self.sleep_hours,
        }
    }

    /// Validate the numeric fields and freeze the form into [`UserInputs`].
    ///
    /// Fields are checked in form order and the first failure is returned.
    pub fn validate(&self) -> Result<UserInputs> {
        Ok(UserInputs {
            age: parse_number(NumericField::Age, &self.age)?,
            height: parse_number(NumericField::Height, &self.height)?,
            weight: parse_number(NumericField::Weight, &self.weight)?,
            sleep_hours: parse_number(NumericField::Sleep, &self.sleep_hours)?,
            gender: self.gender,
            is_smoker: self.is_smoker,
            alcohol: self.alcohol,
            diet: self.diet,
            exercise: self.exercise,
            has_chronic_disease: self.has_chronic_disease,
        })
    }
}

/// Parse one numeric field. Surrounding whitespace is ignored; empty,
/// non-numeric and non-finite text is rejected.
pub fn parse_number(field: NumericField, text: &str) -> Result<f32> {
    let invalid = || BmiError::InputParse {
        field: field.title(),
        value: text.to_string(),
    };

    let value: f32 = text.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RawInputs {
        RawInputs {
            age: "34".into(),
            height: "172.5".into(),
            weight: "68".into(),
            sleep_hours: "7.5".into(),
            ..RawInputs::default()
        }
    }

    #[test]
    fn test_defaults_are_first_options() {
        let raw = RawInputs::default();
        assert_eq!(raw.gender, Gender::Male);
        assert_eq!(raw.alcohol, Alcohol::Low);
        assert_eq!(raw.diet, Diet::Average);
        assert_eq!(raw.exercise, Exercise::OneToTwo);
        assert!(!raw.is_smoker);
        assert!(!raw.has_chronic_disease);
    }

    #[test]
    fn test_option_labels_and_indices() {
        assert_eq!(Gender::labels(), vec!["Male", "Other"]);
        assert_eq!(Alcohol::labels(), vec!["Low", "Moderate", "High"]);
        assert_eq!(Diet::labels(), vec!["Average", "Good", "Excellent"]);
        assert_eq!(Exercise::labels(), vec!["1-2", "3-5", "Daily"]);

        assert_eq!(Exercise::Daily.index(), 2);
        assert_eq!(Diet::from_index(1), Some(Diet::Good));
        assert_eq!(Alcohol::from_index(3), None);
    }

    #[test]
    fn test_option_from_str() {
        assert_eq!("moderate".parse::<Alcohol>(), Ok(Alcohol::Moderate));
        assert_eq!(" Daily ".parse::<Exercise>(), Ok(Exercise::Daily));
        assert_eq!("3-5".parse::<Exercise>(), Ok(Exercise::ThreeToFive));
        assert_eq!("OTHER".parse::<Gender>(), Ok(Gender::Other));

        let err = "female".parse::<Gender>().unwrap_err();
        assert!(err.contains("Male, Other"));
    }

    #[test]
    fn test_validate_success() {
        let inputs = filled().validate().unwrap();
        assert_eq!(inputs.age, 34.0);
        assert_eq!(inputs.height, 172.5);
        assert_eq!(inputs.weight, 68.0);
        assert_eq!(inputs.sleep_hours, 7.5);
    }

    #[test]
    fn test_validate_trims_whitespace() {
        let mut raw = filled();
        raw.weight = " 70.2 ".into();
        assert_eq!(raw.validate().unwrap().weight, 70.2);
    }

    #[test]
    fn test_validate_rejects_each_numeric_field() {
        for field in NumericField::ALL {
            let mut raw = filled();
            *raw.text_mut(field) = "abc".into();

            match raw.validate() {
                Err(BmiError::InputParse { field: name, value }) => {
                    assert_eq!(name, field.title());
                    assert_eq!(value, "abc");
                }
                other => panic!("expected InputParse for {:?}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_validate_reports_first_field_in_form_order() {
        let mut raw = filled();
        raw.height = String::new();
        raw.sleep_hours = "x".into();

        match raw.validate() {
            Err(BmiError::InputParse { field, .. }) => assert_eq!(field, "Height"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert!(parse_number(NumericField::Age, "NaN").is_err());
        assert!(parse_number(NumericField::Age, "inf").is_err());
        assert!(parse_number(NumericField::Age, "").is_err());
        assert!(parse_number(NumericField::Age, "   ").is_err());
        assert_eq!(parse_number(NumericField::Age, "1e2").unwrap(), 100.0);
    }

    #[test]
    fn test_field_units() {
        let units: Vec<_> = NumericField::ALL.iter().map(|f| f.unit()).collect();
        assert_eq!(units, vec!["yrs", "cm", "kg", "hrs"]);
    }
}
