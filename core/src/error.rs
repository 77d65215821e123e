use thiserror::Error;

/// Result type for sonoglean operations
pub type Result<T> = std::result::Result<T, SonogleanError>;

/// Error types for sonoglean operations
#[derive(Error, Debug)]
pub enum SonogleanError {
    /// Recognition engine failed to initialize (missing model, load failure)
    #[error("recognition engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Source image has no renderable content
    #[error("no renderable content in source image")]
    NoSurface,

    /// The recognition engine failed or returned malformed data
    #[error("recognition failed: {0}")]
    RecognitionFailure(String),

    /// Image decode/encode error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
