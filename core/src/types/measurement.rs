use std::fmt;

use super::{MeasurementCategory, MeasurementSource};

/// Value of a recovered measurement
///
/// Scalar values are parsed numerals; multi-axis dimensions and gestational
/// ages keep the recognized digit strings verbatim, so a reading of
/// "5.0 x 3.0" is reported as `5.0 × 3.0` rather than re-formatted as `5 × 3`.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementValue {
    /// Single numeric reading, e.g. a length or velocity
    Scalar(f64),

    /// Two- or three-axis dimension reading (L × W, or L × W × H)
    Dimensions {
        a: String,
        b: String,
        c: Option<String>,
    },

    /// Gestational age in weeks, with optional days
    GestationalAge {
        weeks: String,
        days: Option<String>,
    },
}

impl fmt::Display for MeasurementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementValue::Scalar(v) => write!(f, "{}", v),
            MeasurementValue::Dimensions { a, b, c } => {
                write!(f, "{} × {}", a, b)?;
                if let Some(c) = c {
                    write!(f, " × {}", c)?;
                }
                Ok(())
            }
            MeasurementValue::GestationalAge { weeks, days } => {
                write!(f, "{}w", weeks)?;
                if let Some(days) = days {
                    write!(f, "{}d", days)?;
                }
                Ok(())
            }
        }
    }
}

// Scalars serialize as JSON numbers; composite values as their display string,
// matching the wire shape consumed by the viewer layer.
#[cfg(feature = "json")]
impl serde::Serialize for MeasurementValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            MeasurementValue::Scalar(v) => serializer.serialize_f64(*v),
            other => serializer.collect_str(other),
        }
    }
}

/// A single measurement recovered from burned-in image text
///
/// Records are created fresh on each extraction call and owned by the
/// caller; the pipeline holds no reference to them after returning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub struct Measurement {
    /// Human-readable canonical label, e.g. "Biparietal Diameter (BPD)"
    pub name: String,

    /// Recovered value
    pub value: MeasurementValue,

    /// Unit string; empty for unitless indices (RI, PI), never absent
    pub unit: String,

    /// Clinical category
    pub category: MeasurementCategory,

    /// Provenance tag; always `Ocr` in this pipeline
    pub source: MeasurementSource,

    /// Exact matched substring, retained for audit/debugging
    pub raw_match: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_display() {
        assert_eq!(MeasurementValue::Scalar(45.0).to_string(), "45");
        assert_eq!(MeasurementValue::Scalar(10.2).to_string(), "10.2");
    }

    #[test]
    fn test_dimensions_display_two_axes() {
        let value = MeasurementValue::Dimensions {
            a: "10.2".to_string(),
            b: "4.5".to_string(),
            c: None,
        };
        assert_eq!(value.to_string(), "10.2 × 4.5");
    }

    #[test]
    fn test_dimensions_display_three_axes() {
        let value = MeasurementValue::Dimensions {
            a: "4.5".to_string(),
            b: "1.5".to_string(),
            c: Some("1.4".to_string()),
        };
        assert_eq!(value.to_string(), "4.5 × 1.5 × 1.4");
    }

    #[test]
    fn test_dimensions_preserve_captured_digits() {
        // "5.0" must not collapse to "5"
        let value = MeasurementValue::Dimensions {
            a: "5.0".to_string(),
            b: "3.0".to_string(),
            c: None,
        };
        assert_eq!(value.to_string(), "5.0 × 3.0");
    }

    #[test]
    fn test_gestational_age_display() {
        let with_days = MeasurementValue::GestationalAge {
            weeks: "20".to_string(),
            days: Some("3".to_string()),
        };
        assert_eq!(with_days.to_string(), "20w3d");

        let weeks_only = MeasurementValue::GestationalAge {
            weeks: "20".to_string(),
            days: None,
        };
        assert_eq!(weeks_only.to_string(), "20w");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_measurement_json_shape() {
        let measurement = Measurement {
            name: "Biparietal Diameter (BPD)".to_string(),
            value: MeasurementValue::Scalar(45.0),
            unit: "mm".to_string(),
            category: MeasurementCategory::Obstetric,
            source: MeasurementSource::Ocr,
            raw_match: "BPD: 45mm".to_string(),
        };

        let json = serde_json::to_value(&measurement).unwrap();
        assert_eq!(json["name"], "Biparietal Diameter (BPD)");
        assert_eq!(json["value"], 45.0);
        assert_eq!(json["unit"], "mm");
        assert_eq!(json["category"], "obstetric");
        assert_eq!(json["source"], "ocr");
        assert_eq!(json["rawMatch"], "BPD: 45mm");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_composite_value_serializes_as_string() {
        let value = MeasurementValue::GestationalAge {
            weeks: "20".to_string(),
            days: Some("3".to_string()),
        };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!("20w3d"));
    }
}
