use std::collections::HashSet;
use std::ops::Range;

use log::debug;
use regex::Captures;

use crate::types::{Measurement, MeasurementSource, MeasurementValue};

use super::cleanup;
use super::patterns::{default_rules, generic_dimensions, PatternRule, SpecialParse};

/// Capture-group layout shared by every rule: numeral (or first axis) in
/// group 1, scalar unit in group 2, third axis in group 3, dimension unit
/// in group 4.
const GROUP_VALUE: usize = 1;
const GROUP_SCALAR_UNIT: usize = 2;
const GROUP_AXIS_B: usize = 2;
const GROUP_AXIS_C: usize = 3;
const GROUP_DIMENSION_UNIT: usize = 4;
const GROUP_GA_DAYS: usize = 2;

/// Pattern-based parser turning recognized text into measurement records
///
/// Parsing is total: any string input, including empty or adversarial text,
/// yields a (possibly empty) list and never an error. Matching runs in three
/// stages: character cleanup, the domain pattern bank, and a label-free
/// dimension fallback that only fires when no domain rule matched.
pub struct MeasurementParser {
    rules: Vec<PatternRule>,
}

impl MeasurementParser {
    /// Creates a parser over the built-in pattern bank
    pub fn new() -> Self {
        Self {
            rules: default_rules().to_vec(),
        }
    }

    /// Creates a parser over a custom rule table
    ///
    /// Rule order carries meaning: when two rules' matches overlap in the
    /// text, the earlier rule keeps the match and the later one is dropped.
    pub fn with_rules(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Extracts measurements from recognized text
    pub fn parse(&self, text: &str) -> Vec<Measurement> {
        let text = cleanup::normalize(text);

        let mut measurements = Vec::new();
        let mut found: HashSet<(&str, usize)> = HashSet::new();
        let mut claimed: Vec<Range<usize>> = Vec::new();

        for rule in &self.rules {
            for caps in rule.regex.captures_iter(&text) {
                let whole = match caps.get(0) {
                    Some(m) => m,
                    None => continue,
                };

                if !found.insert((rule.key, whole.start())) {
                    continue;
                }
                if claimed.iter().any(|c| overlaps(c, &whole.range())) {
                    debug!(
                        "dropping {} match at {} overlapping an earlier rule",
                        rule.key,
                        whole.start()
                    );
                    continue;
                }

                if let Some(measurement) = assemble(rule, &caps) {
                    claimed.push(whole.range());
                    measurements.push(measurement);
                }
            }
        }

        if measurements.is_empty() {
            parse_generic_dimensions(&text, &mut measurements);
        }

        measurements
    }
}

impl Default for MeasurementParser {
    fn default() -> Self {
        Self::new()
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn group<'t>(caps: &Captures<'t>, i: usize) -> Option<&'t str> {
    caps.get(i).map(|m| m.as_str())
}

/// Builds a measurement record from a rule match
///
/// Returns `None` for captures that cannot be assembled; a malformed match
/// is skipped, never an error.
fn assemble(rule: &PatternRule, caps: &Captures<'_>) -> Option<Measurement> {
    let raw_match = caps.get(0)?.as_str().to_string();

    let (value, unit) = match rule.special {
        SpecialParse::GestationalAge => {
            let weeks = group(caps, GROUP_VALUE)?.to_string();
            let days = group(caps, GROUP_GA_DAYS).map(str::to_string);
            (
                MeasurementValue::GestationalAge { weeks, days },
                rule.default_unit.to_string(),
            )
        }
        SpecialParse::Dimensions => {
            let a = group(caps, GROUP_VALUE)?.to_string();
            let b = group(caps, GROUP_AXIS_B)?.to_string();
            let c = group(caps, GROUP_AXIS_C).map(str::to_string);
            let unit = group(caps, GROUP_DIMENSION_UNIT).unwrap_or(rule.default_unit);
            (MeasurementValue::Dimensions { a, b, c }, unit.to_string())
        }
        SpecialParse::None => {
            let value: f64 = group(caps, GROUP_VALUE)?.parse().ok()?;
            let unit = group(caps, GROUP_SCALAR_UNIT).unwrap_or(rule.default_unit);
            (MeasurementValue::Scalar(value), unit.to_string())
        }
    };

    Some(Measurement {
        name: rule.name.to_string(),
        value,
        unit,
        category: rule.category,
        source: MeasurementSource::Ocr,
        raw_match,
    })
}

/// Recovers unlabeled size readings when the whole bank came up empty
fn parse_generic_dimensions(text: &str, measurements: &mut Vec<Measurement>) {
    use crate::types::MeasurementCategory;

    for caps in generic_dimensions().captures_iter(text) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        let a = match group(&caps, GROUP_VALUE) {
            Some(a) => a.to_string(),
            None => continue,
        };
        let b = match group(&caps, GROUP_AXIS_B) {
            Some(b) => b.to_string(),
            None => continue,
        };
        let c = group(&caps, GROUP_AXIS_C).map(str::to_string);
        let unit = group(&caps, GROUP_DIMENSION_UNIT).unwrap_or("cm");

        measurements.push(Measurement {
            name: "Dimension".to_string(),
            value: MeasurementValue::Dimensions { a, b, c },
            unit: unit.to_string(),
            category: MeasurementCategory::General,
            source: MeasurementSource::Ocr,
            raw_match: whole.as_str().to_string(),
        });
    }
}
