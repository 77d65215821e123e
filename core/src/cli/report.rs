use crate::types::Measurement;
use std::fmt;

/// Text report formatter for recovered measurements
pub struct TextReport<'a> {
    measurements: &'a [Measurement],
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(measurements: &'a [Measurement]) -> Self {
        Self { measurements }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recovered Measurements")?;
        writeln!(f, "======================")?;
        writeln!(f)?;

        if self.measurements.is_empty() {
            writeln!(f, "No measurements found")?;
            return Ok(());
        }

        for measurement in self.measurements {
            writeln!(f, "{}", measurement.name)?;
            if measurement.unit.is_empty() {
                writeln!(f, "  Value:    {}", measurement.value)?;
            } else {
                writeln!(f, "  Value:    {} {}", measurement.value, measurement.unit)?;
            }
            writeln!(f, "  Category: {}", measurement.category.simple_name())?;
            writeln!(f, "  Source:   {}", measurement.source.simple_name())?;
            writeln!(f, "  Matched:  {}", measurement.raw_match)?;
            writeln!(f)?;
        }

        Ok(())
    }
}
