use std::sync::OnceLock;

use regex::Regex;

use crate::types::MeasurementCategory;

/// Value assembly required by a pattern beyond scalar-plus-unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialParse {
    /// Single numeral, captured unit or default
    None,
    /// Weeks plus optional days, reported as "20w3d"
    GestationalAge,
    /// Two or three axes, reported as "10.2 × 4.5[ × 3.1]"
    Dimensions,
}

/// One entry of the measurement pattern bank
///
/// Rules are consulted in declaration order by a single matching loop; a new
/// measurement vocabulary is added by appending a rule, not by branching.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Stable identifier, used for match deduplication
    pub key: &'static str,

    /// Pattern matched against the cleaned text
    pub regex: Regex,

    /// Clinical category attached to every match of this rule
    pub category: MeasurementCategory,

    /// Human-readable canonical label
    pub name: &'static str,

    /// Unit assumed when the text does not carry one; empty for the
    /// unitless indices (RI, PI)
    pub default_unit: &'static str,

    /// Bespoke value assembly, if any
    pub special: SpecialParse,
}

impl PatternRule {
    /// Creates a rule from a pattern string
    ///
    /// # Panics
    ///
    /// Panics if the pattern does not compile; the default bank is covered
    /// by tests, and custom banks are expected to be literal tables.
    pub fn new(
        key: &'static str,
        pattern: &str,
        category: MeasurementCategory,
        name: &'static str,
        default_unit: &'static str,
        special: SpecialParse,
    ) -> Self {
        Self {
            key,
            regex: Regex::new(pattern).expect("Failed to compile measurement pattern"),
            category,
            name,
            default_unit,
            special,
        }
    }
}

/// Returns the built-in measurement pattern bank
///
/// Built once and immutable thereafter. Ordering matters: when two rules'
/// matches overlap in the text, the earlier rule wins, so the short
/// ambiguous abbreviations (RI, PI) sit at the end.
pub fn default_rules() -> &'static [PatternRule] {
    static RULES: OnceLock<Vec<PatternRule>> = OnceLock::new();
    RULES.get_or_init(build_default_rules)
}

fn build_default_rules() -> Vec<PatternRule> {
    use MeasurementCategory::*;
    use SpecialParse::{Dimensions, GestationalAge};

    vec![
        // Obstetric
        PatternRule::new(
            "bpd",
            r"(?i)\b(?:BPD|B\.P\.D)\s*[:\-=]?\s*(\d+\.?\d*)\s*(mm|cm)?",
            Obstetric,
            "Biparietal Diameter (BPD)",
            "mm",
            SpecialParse::None,
        ),
        PatternRule::new(
            "hc",
            r"(?i)\b(?:HC|H\.C)\s*[:\-=]?\s*(\d+\.?\d*)\s*(mm|cm)?",
            Obstetric,
            "Head Circumference (HC)",
            "mm",
            SpecialParse::None,
        ),
        PatternRule::new(
            "ac",
            r"(?i)\b(?:AC|A\.C)\s*[:\-=]?\s*(\d+\.?\d*)\s*(mm|cm)?",
            Obstetric,
            "Abdominal Circumference (AC)",
            "mm",
            SpecialParse::None,
        ),
        PatternRule::new(
            "fl",
            r"(?i)\b(?:FL|F\.L)\s*[:\-=]?\s*(\d+\.?\d*)\s*(mm|cm)?",
            Obstetric,
            "Femur Length (FL)",
            "mm",
            SpecialParse::None,
        ),
        PatternRule::new(
            "crl",
            r"(?i)\b(?:CRL|C\.R\.L)\s*[:\-=]?\s*(\d+\.?\d*)\s*(mm|cm)?",
            Obstetric,
            "Crown Rump Length (CRL)",
            "mm",
            SpecialParse::None,
        ),
        PatternRule::new(
            "efw",
            r"(?i)\b(?:EFW|E\.F\.W|Est\.?\s*Fetal\s*Weight)\s*[:\-=]?\s*(\d+\.?\d*)\s*(g|kg|gm)?",
            Obstetric,
            "Estimated Fetal Weight",
            "g",
            SpecialParse::None,
        ),
        PatternRule::new(
            "ga",
            r"(?i)\b(?:GA|G\.A|Gest\.?\s*Age)\s*[:\-=]?\s*(\d+)\s*w\s*(\d+)?\s*d?",
            Obstetric,
            "Gestational Age",
            "weeks",
            GestationalAge,
        ),
        PatternRule::new(
            "afi",
            r"(?i)\b(?:AFI|A\.F\.I)\s*[:\-=]?\s*(\d+\.?\d*)\s*(cm)?",
            Obstetric,
            "Amniotic Fluid Index",
            "cm",
            SpecialParse::None,
        ),
        // Abdominal organs
        PatternRule::new(
            "liver",
            r"(?i)\b(?:Liver|Liv)\s*[:\-=]?\s*(\d+\.?\d*)\s*(cm|mm)?",
            Abdominal,
            "Liver",
            "cm",
            SpecialParse::None,
        ),
        PatternRule::new(
            "spleen",
            r"(?i)\b(?:Spleen|Spl)\s*[:\-=]?\s*(\d+\.?\d*)\s*(cm|mm)?",
            Abdominal,
            "Spleen",
            "cm",
            SpecialParse::None,
        ),
        PatternRule::new(
            "kidney",
            r"(?i)\b(?:Kidney|Kid|RK|LK|R\.K|L\.K)\s*[:\-=]?\s*(\d+\.?\d*)\s*[x×]\s*(\d+\.?\d*)(?:\s*[x×]\s*(\d+\.?\d*))?\s*(cm|mm)?",
            Abdominal,
            "Kidney",
            "cm",
            Dimensions,
        ),
        PatternRule::new(
            "cbd",
            r"(?i)\b(?:CBD|C\.B\.D|Common\s*Bile\s*Duct)\s*[:\-=]?\s*(\d+\.?\d*)\s*(mm|cm)?",
            Abdominal,
            "Common Bile Duct",
            "mm",
            SpecialParse::None,
        ),
        PatternRule::new(
            "aorta",
            r"(?i)\b(?:Aorta|Ao)\s*[:\-=]?\s*(\d+\.?\d*)\s*(cm|mm)?",
            Abdominal,
            "Aorta",
            "cm",
            SpecialParse::None,
        ),
        PatternRule::new(
            "gb_wall",
            r"(?i)\b(?:GB\s*Wall|Gallbladder\s*Wall)\s*[:\-=]?\s*(\d+\.?\d*)\s*(mm)?",
            Abdominal,
            "GB Wall Thickness",
            "mm",
            SpecialParse::None,
        ),
        // Thyroid
        PatternRule::new(
            "thyroid_right",
            r"(?i)\b(?:Right\s*Lobe|R\.?\s*Lobe|RT\s*Lobe)\s*[:\-=]?\s*(\d+\.?\d*)\s*[x×]\s*(\d+\.?\d*)\s*[x×]\s*(\d+\.?\d*)\s*(cm|mm)?",
            Thyroid,
            "Right Thyroid Lobe",
            "cm",
            Dimensions,
        ),
        PatternRule::new(
            "thyroid_left",
            r"(?i)\b(?:Left\s*Lobe|L\.?\s*Lobe|LT\s*Lobe)\s*[:\-=]?\s*(\d+\.?\d*)\s*[x×]\s*(\d+\.?\d*)\s*[x×]\s*(\d+\.?\d*)\s*(cm|mm)?",
            Thyroid,
            "Left Thyroid Lobe",
            "cm",
            Dimensions,
        ),
        PatternRule::new(
            "isthmus",
            r"(?i)\b(?:Isthmus|Isth)\s*[:\-=]?\s*(\d+\.?\d*)\s*(mm|cm)?",
            Thyroid,
            "Thyroid Isthmus",
            "mm",
            SpecialParse::None,
        ),
        // Pelvic
        PatternRule::new(
            "uterus",
            r"(?i)\b(?:Uterus|Ut)\s*[:\-=]?\s*(\d+\.?\d*)\s*[x×]\s*(\d+\.?\d*)\s*[x×]\s*(\d+\.?\d*)\s*(cm|mm)?",
            Pelvic,
            "Uterus",
            "cm",
            Dimensions,
        ),
        PatternRule::new(
            "endometrium",
            r"(?i)\b(?:Endometrium|ET|Endo)\s*[:\-=]?\s*(\d+\.?\d*)\s*(mm)?",
            Pelvic,
            "Endometrial Thickness",
            "mm",
            SpecialParse::None,
        ),
        PatternRule::new(
            "ovary",
            r"(?i)\b(?:Ovary|R\.?\s*Ovary|L\.?\s*Ovary|RO|LO)\s*[:\-=]?\s*(\d+\.?\d*)\s*[x×]\s*(\d+\.?\d*)(?:\s*[x×]\s*(\d+\.?\d*))?\s*(cm|mm)?",
            Pelvic,
            "Ovary",
            "cm",
            Dimensions,
        ),
        // Vascular
        PatternRule::new(
            "psv",
            r"(?i)\b(?:PSV|P\.S\.V|Peak\s*Systolic)\s*[:\-=]?\s*(\d+\.?\d*)\s*(cm/s|m/s)?",
            Vascular,
            "Peak Systolic Velocity",
            "cm/s",
            SpecialParse::None,
        ),
        PatternRule::new(
            "edv",
            r"(?i)\b(?:EDV|E\.D\.V|End\s*Diastolic)\s*[:\-=]?\s*(\d+\.?\d*)\s*(cm/s|m/s)?",
            Vascular,
            "End Diastolic Velocity",
            "cm/s",
            SpecialParse::None,
        ),
        PatternRule::new(
            "ri",
            r"(?i)\b(?:RI|R\.I|Resistive\s*Index)\s*[:\-=]?\s*(\d+\.?\d*)",
            Vascular,
            "Resistive Index",
            "",
            SpecialParse::None,
        ),
        PatternRule::new(
            "pi",
            r"(?i)\b(?:PI|P\.I|Pulsatility\s*Index)\s*[:\-=]?\s*(\d+\.?\d*)",
            Vascular,
            "Pulsatility Index",
            "",
            SpecialParse::None,
        ),
    ]
}

/// Returns the label-free dimension pattern used when no rule matched
///
/// Unlike the dimension rules above, the unit here is mandatory; a bare
/// "5.0 x 3.0" with no unit is too likely to be noise.
pub fn generic_dimensions() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)(\d+\.?\d*)\s*[x×]\s*(\d+\.?\d*)(?:\s*[x×]\s*(\d+\.?\d*))?\s*(cm|mm)")
            .expect("Failed to compile dimension pattern")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_builds() {
        let rules = default_rules();
        assert_eq!(rules.len(), 24);
    }

    #[test]
    fn test_bank_order_puts_short_abbreviations_last() {
        let keys: Vec<&str> = default_rules().iter().map(|r| r.key).collect();
        assert_eq!(keys[0], "bpd");
        assert_eq!(keys[22], "ri");
        assert_eq!(keys[23], "pi");
    }

    #[test]
    fn test_bank_keys_unique() {
        let rules = default_rules();
        let mut keys: Vec<&str> = rules.iter().map(|r| r.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), rules.len());
    }

    #[test]
    fn test_special_rules_marked() {
        for rule in default_rules() {
            match rule.key {
                "ga" => assert_eq!(rule.special, SpecialParse::GestationalAge),
                "kidney" | "uterus" | "ovary" | "thyroid_right" | "thyroid_left" => {
                    assert_eq!(rule.special, SpecialParse::Dimensions)
                }
                _ => assert_eq!(rule.special, SpecialParse::None),
            }
        }
    }

    #[test]
    fn test_unitless_indices_default_to_empty_unit() {
        for rule in default_rules() {
            let expect_empty = matches!(rule.key, "ri" | "pi");
            assert_eq!(rule.default_unit.is_empty(), expect_empty, "{}", rule.key);
        }
    }

    #[test]
    fn test_case_insensitive_matching() {
        let rules = default_rules();
        let bpd = &rules[0];
        assert!(bpd.regex.is_match("BPD: 45mm"));
        assert!(bpd.regex.is_match("bpd 45"));
    }

    #[test]
    fn test_generic_dimensions_requires_unit() {
        let re = generic_dimensions();
        assert!(re.is_match("5.0 x 3.0 cm"));
        assert!(!re.is_match("5.0 x 3.0"));
    }
}
