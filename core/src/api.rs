//! Extraction pipeline orchestration
//!
//! [`MeasurementExtractor`] coordinates preprocessing, recognition, and
//! parsing over an injected [`RecognitionEngine`], drives the engine
//! lifecycle, and enforces single-flight execution. Every failure is
//! converted to the structured [`ExtractionResult`] shape at this boundary;
//! nothing propagates to the caller as an error.

use image::{DynamicImage, GenericImageView};
use log::{debug, error, info, warn};

use crate::engine::{EngineConfig, EngineState, RecognitionEngine};
use crate::error::SonogleanError;
use crate::parsing::MeasurementParser;
use crate::preprocess;
use crate::types::Measurement;

/// Outcome of one extraction attempt
///
/// There is no request queue: a call arriving while another extraction is
/// in flight is rejected immediately as [`Busy`](ExtractionOutcome::Busy).
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// The pipeline ran to completion (successfully or not)
    Completed(ExtractionResult),

    /// Another extraction was already in flight; nothing ran
    Busy,
}

impl ExtractionOutcome {
    /// Returns whether this call was rejected as already-in-progress
    pub fn is_busy(&self) -> bool {
        matches!(self, ExtractionOutcome::Busy)
    }

    /// Returns the extraction result, if the pipeline ran
    pub fn into_result(self) -> Option<ExtractionResult> {
        match self {
            ExtractionOutcome::Completed(result) => Some(result),
            ExtractionOutcome::Busy => None,
        }
    }
}

/// Result of a completed extraction run
///
/// A run with zero recovered measurements is still a success; `success` is
/// false only when the pipeline itself failed, in which case `error` holds
/// the reason and `measurements` is empty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub struct ExtractionResult {
    /// Whether the pipeline ran to completion
    pub success: bool,

    /// Recovered measurement records, owned by the caller
    pub measurements: Vec<Measurement>,

    /// Full recognized text, for audit and manual review
    pub raw_text: String,

    /// Recognition confidence, 0-100
    pub confidence: f32,

    /// Failure reason when `success` is false
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Builds a successful result
    pub fn completed(measurements: Vec<Measurement>, raw_text: String, confidence: f32) -> Self {
        Self {
            success: true,
            measurements,
            raw_text,
            confidence,
            error: None,
        }
    }

    /// Builds the structured failure shape
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            measurements: Vec::new(),
            raw_text: String::new(),
            confidence: 0.0,
            error: Some(error.to_string()),
        }
    }
}

/// Orchestrates preprocessing, recognition, and parsing
///
/// Owns the recognition engine: initializes it lazily on first use, reuses
/// it across calls, and releases it on [`dispose`](Self::dispose). The
/// engine lifecycle is tracked as an explicit [`EngineState`], which also
/// serves as the single-flight guard.
pub struct MeasurementExtractor<E: RecognitionEngine> {
    engine: E,
    config: EngineConfig,
    parser: MeasurementParser,
    state: EngineState,
    progress: Option<Box<dyn FnMut(u8)>>,
}

impl<E: RecognitionEngine> MeasurementExtractor<E> {
    /// Creates an extractor with the default engine configuration
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, EngineConfig::default())
    }

    /// Creates an extractor with an explicit engine configuration
    pub fn with_config(engine: E, config: EngineConfig) -> Self {
        Self {
            engine,
            config,
            parser: MeasurementParser::new(),
            state: EngineState::Idle,
            progress: None,
        }
    }

    /// Installs a handler for recognition progress updates (0-100)
    pub fn set_progress_handler(&mut self, handler: impl FnMut(u8) + 'static) {
        self.progress = Some(Box::new(handler));
    }

    /// Returns the current lifecycle state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Runs the full pipeline on a raster image
    ///
    /// Initializes the engine on first use. An initialization failure
    /// surfaces as a failure result and leaves the extractor idle, so a
    /// later call re-attempts; there is no automatic retry.
    pub fn extract_from_image(&mut self, image: &DynamicImage) -> ExtractionOutcome {
        if self.state.is_busy() {
            warn!("extraction already in progress, rejecting call");
            return ExtractionOutcome::Busy;
        }

        if self.state == EngineState::Idle {
            self.state = EngineState::Initializing;
            info!("initializing recognition engine");
            if let Err(e) = self.engine.initialize(&self.config) {
                self.state = EngineState::Idle;
                error!("engine initialization failed: {}", e);
                return ExtractionOutcome::Completed(ExtractionResult::failed(e));
            }
            self.state = EngineState::Ready;
        }

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            warn!("source image has no renderable content");
            return ExtractionOutcome::Completed(ExtractionResult::failed(
                SonogleanError::NoSurface,
            ));
        }

        self.state = EngineState::Processing;
        let result = self.run_pipeline(image);
        self.state = EngineState::Ready;
        ExtractionOutcome::Completed(result)
    }

    fn run_pipeline(&mut self, image: &DynamicImage) -> ExtractionResult {
        let prepared = preprocess::prepare(image);

        let Self {
            engine, progress, ..
        } = self;
        let recognition = match engine.recognize(&prepared, &mut |percent| {
            if let Some(handler) = progress.as_mut() {
                handler(percent);
            }
        }) {
            Ok(recognition) => recognition,
            Err(e) => {
                error!("recognition failed: {}", e);
                return ExtractionResult::failed(e);
            }
        };

        let measurements = self.parser.parse(&recognition.text);
        debug!(
            "recovered {} measurements at confidence {:.1}",
            measurements.len(),
            recognition.confidence
        );

        ExtractionResult::completed(measurements, recognition.text, recognition.confidence)
    }

    /// Releases the engine and returns the extractor to idle
    ///
    /// The next extraction re-initializes the engine from scratch.
    pub fn dispose(&mut self) {
        if self.state != EngineState::Idle {
            info!("disposing recognition engine");
            self.engine.dispose();
            self.state = EngineState::Idle;
        }
    }

    #[cfg(test)]
    fn force_state(&mut self, state: EngineState) {
        self.state = state;
    }
}
