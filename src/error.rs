//! Radar error type

/// Errors raised while constructing, loading or driving a radar.
#[derive(Debug, thiserror::Error)]
pub enum RadarError {
    /// `controlSize` was not supplied.
    #[error("radar requires the controlSize option")]
    MissingControlSize,

    /// `controlSize` must be a finite, positive pixel size.
    #[error("controlSize must be a positive number, got {0}")]
    InvalidControlSize(f64),

    /// `fillColors` must be an array with one color per section.
    #[error("fillColors needs to be an array with 4 colors defined: {0}")]
    InvalidFillColors(String),

    /// An operation was called in a lifecycle phase that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Section ids are 1-based quadrant numbers.
    #[error("section id {0} is outside 1..=4")]
    InvalidSection(u8),

    /// The data loader could not produce a document.
    #[error("failed to load radar data from {url}: {reason}")]
    Load { url: String, reason: String },

    /// The data document is not valid JSON or has the wrong shape.
    #[error("failed to parse radar data: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but does not describe a four-section radar.
    #[error("invalid radar dataset: {0}")]
    InvalidDataset(String),
}

pub type Result<T, E = RadarError> = std::result::Result<T, E>;
