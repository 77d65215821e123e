//! Recognition engine seam
//!
//! The text-recognition capability is an external collaborator: this module
//! defines the trait the extraction pipeline consumes, the configuration
//! handed to the engine at initialization, and the lifecycle state machine
//! the orchestrator drives. No concrete OCR backend ships in this crate.

use std::fmt;

use image::DynamicImage;

use crate::error::Result;

/// Character set burned-in measurement overlays are drawn from
///
/// Constraining recognition to this set avoids spurious glyphs on the
/// low-contrast imagery this pipeline targets.
pub const DEFAULT_CHAR_WHITELIST: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz.:×xX-=/ ";

/// Configuration handed to a recognition engine at initialization
///
/// Defaults are tuned for scattered overlay text rather than dense prose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Language hint, e.g. "eng"
    pub language: String,

    /// Use sparse-text page segmentation (scattered labels, not paragraphs)
    pub sparse_text: bool,

    /// Restrict recognition to this character set, if given
    pub char_whitelist: Option<String>,

    /// Keep runs of spaces between words instead of collapsing them
    pub preserve_interword_spaces: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            sparse_text: true,
            char_whitelist: Some(DEFAULT_CHAR_WHITELIST.to_string()),
            preserve_interword_spaces: true,
        }
    }
}

/// Raw output of a recognition pass
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// Recognized text
    pub text: String,

    /// Recognition confidence, 0-100
    pub confidence: f32,
}

/// Text-recognition capability consumed by the extraction pipeline
///
/// Implementations are lifecycle-managed by the orchestrator: initialized
/// lazily on first use, reused across calls, and released with an explicit
/// [`dispose`](RecognitionEngine::dispose). Initialization failures should be
/// reported as [`SonogleanError::EngineUnavailable`], recognition failures as
/// [`SonogleanError::RecognitionFailure`].
///
/// [`SonogleanError::EngineUnavailable`]: crate::error::SonogleanError::EngineUnavailable
/// [`SonogleanError::RecognitionFailure`]: crate::error::SonogleanError::RecognitionFailure
pub trait RecognitionEngine {
    /// Prepares the engine for recognition
    fn initialize(&mut self, config: &EngineConfig) -> Result<()>;

    /// Recognizes text in a prepared image
    ///
    /// `progress` is invoked with 0-100 completion percentages while the
    /// recognition runs.
    fn recognize(
        &mut self,
        image: &DynamicImage,
        progress: &mut dyn FnMut(u8),
    ) -> Result<Recognition>;

    /// Releases engine resources
    ///
    /// Skipping this leaks engine memory across repeated open/close cycles
    /// of the surrounding feature.
    fn dispose(&mut self);
}

/// Lifecycle state of the extraction pipeline's engine
///
/// Legal transitions: `Idle → Initializing → Ready ⇄ Processing`, and any
/// state back to `Idle` on dispose. At most one extraction may be
/// `Processing` at a time; callers arriving while busy are rejected, not
/// queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    /// Engine not yet initialized (or disposed)
    #[default]
    Idle,
    /// Engine initialization in flight
    Initializing,
    /// Engine initialized and free
    Ready,
    /// An extraction is in flight
    Processing,
}

impl EngineState {
    /// Returns whether a new extraction must be rejected in this state
    pub fn is_busy(&self) -> bool {
        matches!(self, EngineState::Initializing | EngineState::Processing)
    }

    /// Returns whether the engine has completed initialization
    pub fn is_initialized(&self) -> bool {
        matches!(self, EngineState::Ready | EngineState::Processing)
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Initializing => "initializing",
            EngineState::Ready => "ready",
            EngineState::Processing => "processing",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
