use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Inference unavailable: {0}")]
    InferenceUnavailable(String),

    #[error("Empty region: segment {index} has no occupied pixels")]
    EmptyRegion { index: usize },

    #[error("Asset load failure for '{reference}': {reason}")]
    AssetLoadFailure { reference: String, reason: String },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Malformed mask: {0}")]
    MaskShape(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
