//! Core type definitions for recovered measurements
//!
//! This module provides the fundamental types used throughout the sonoglean library:
//! - [`Measurement`]: A named, unit-tagged, categorized measurement record
//! - [`MeasurementValue`]: Scalar, multi-axis dimension, or gestational-age value
//! - [`MeasurementCategory`]: Anatomical/clinical grouping of a measurement
//! - [`MeasurementSource`]: Provenance of a record (recognized vs. structured metadata)

mod enums;
mod measurement;

pub use enums::{MeasurementCategory, MeasurementSource};
pub use measurement::{Measurement, MeasurementValue};
