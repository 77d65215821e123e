//! Pattern-based measurement recovery from recognized text
//!
//! Three stages: character-level [`cleanup`], a data-driven bank of domain
//! [`patterns`], and a generic dimension fallback for otherwise-unlabeled
//! size readings. The bank covers obstetric, abdominal, thyroid, pelvic,
//! and vascular measurement vocabularies.

pub mod cleanup;
pub mod parser;
pub mod patterns;

pub use parser::MeasurementParser;
pub use patterns::{default_rules, PatternRule, SpecialParse};
