use std::fmt;

/// Clinical category of a recovered measurement
///
/// Groups measurement vocabularies by the exam context they belong to.
/// `General` covers values recovered without a recognized label, such as
/// bare dimension readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum MeasurementCategory {
    Obstetric,
    Abdominal,
    Thyroid,
    Pelvic,
    Vascular,
    General,
}

impl MeasurementCategory {
    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            MeasurementCategory::Obstetric => "obstetric",
            MeasurementCategory::Abdominal => "abdominal",
            MeasurementCategory::Thyroid => "thyroid",
            MeasurementCategory::Pelvic => "pelvic",
            MeasurementCategory::Vascular => "vascular",
            MeasurementCategory::General => "general",
        }
    }
}

impl fmt::Display for MeasurementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Provenance of a measurement record
///
/// Measurements recovered from burned-in pixel text carry `Ocr`; the
/// surrounding system produces `Metadata` records from structured fields,
/// and downstream consumers rely on the tag to tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum MeasurementSource {
    Ocr,
    Metadata,
}

impl MeasurementSource {
    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            MeasurementSource::Ocr => "ocr",
            MeasurementSource::Metadata => "metadata",
        }
    }
}

impl fmt::Display for MeasurementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(MeasurementCategory::Obstetric.to_string(), "obstetric");
        assert_eq!(MeasurementCategory::Abdominal.to_string(), "abdominal");
        assert_eq!(MeasurementCategory::Thyroid.to_string(), "thyroid");
        assert_eq!(MeasurementCategory::Pelvic.to_string(), "pelvic");
        assert_eq!(MeasurementCategory::Vascular.to_string(), "vascular");
        assert_eq!(MeasurementCategory::General.to_string(), "general");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(MeasurementSource::Ocr.to_string(), "ocr");
        assert_eq!(MeasurementSource::Metadata.to_string(), "metadata");
    }
}
