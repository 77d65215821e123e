pub mod api;
pub mod cli;
pub mod engine;
pub mod error;
pub mod parsing;
pub mod preprocess;
pub mod types;

pub use api::{ExtractionOutcome, ExtractionResult, MeasurementExtractor};
pub use cli::report::TextReport;
pub use engine::{EngineConfig, EngineState, Recognition, RecognitionEngine};
pub use error::{Result, SonogleanError};
pub use parsing::MeasurementParser;
pub use types::*;
