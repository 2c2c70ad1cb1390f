//! BMI category bands

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower edge of the Normal band
pub const NORMAL_MIN: f32 = 18.5;
/// Lower edge of the Overweight band
pub const OVERWEIGHT_MIN: f32 = 25.0;
/// Lower edge of the Obese band
pub const OBESE_MIN: f32 = 30.0;

/// Ordinal BMI category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a BMI value to its band. Each band includes its lower edge.
pub fn classify(bmi: f32) -> BmiCategory {
    if bmi < NORMAL_MIN {
        BmiCategory::Underweight
    } else if bmi < OVERWEIGHT_MIN {
        BmiCategory::Normal
    } else if bmi < OBESE_MIN {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(classify(18.4999), BmiCategory::Underweight);
        assert_eq!(classify(18.5), BmiCategory::Normal);
        assert_eq!(classify(24.9999), BmiCategory::Normal);
        assert_eq!(classify(25.0), BmiCategory::Overweight);
        assert_eq!(classify(29.9999), BmiCategory::Overweight);
        assert_eq!(classify(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(classify(-5.0), BmiCategory::Underweight);
        assert_eq!(classify(0.0), BmiCategory::Underweight);
        assert_eq!(classify(f32::MAX), BmiCategory::Obese);
        assert_eq!(classify(f32::NEG_INFINITY), BmiCategory::Underweight);
        // NaN fails every comparison and lands in the last band.
        assert_eq!(classify(f32::NAN), BmiCategory::Obese);
    }

    #[test]
    fn test_categories_are_ordered() {
        assert!(BmiCategory::Underweight < BmiCategory::Normal);
        assert!(BmiCategory::Normal < BmiCategory::Overweight);
        assert!(BmiCategory::Overweight < BmiCategory::Obese);
        assert!(classify(17.0) < classify(40.0));
    }

    #[test]
    fn test_labels() {
        assert_eq!(BmiCategory::Underweight.to_string(), "Underweight");
        assert_eq!(classify(22.0).label(), "Normal");
    }
}
