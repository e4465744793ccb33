use thiserror::Error;

/// Everything that can go wrong while analysing an image.
#[derive(Debug, Error)]
pub enum CropError {
    #[error("expected a target width or height, got 0x0")]
    InvalidDimensions,

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load face classifier: {0}")]
    ClassifierLoad(String),

    #[error("face detector failed: {0}")]
    Detector(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("no candidate crop fits inside the image")]
    NoCandidates,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CropError>;
