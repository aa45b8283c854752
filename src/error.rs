//! Error types for body configuration and starfield assembly

use thiserror::Error;

/// Result type for building the body table
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal configuration errors, raised before anything is rendered
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("body `{name}`: radius must be positive, got {radius}")]
    NonPositiveRadius { name: String, radius: f32 },

    #[error("body `{name}`: orbital distance must be non-negative, got {distance}")]
    NegativeDistance { name: String, distance: f32 },

    #[error("body `{name}`: ring inner radius must be positive, got {inner}")]
    NonPositiveRingRadius { name: String, inner: f32 },

    #[error("body `{name}`: ring outer radius {outer} must exceed inner radius {inner}")]
    MalformedRing { name: String, inner: f32, outer: f32 },

    #[error("body `{name}`: {field} must be finite")]
    NonFinite { name: String, field: &'static str },

    #[error("central body `{0}` must sit at the origin without revolving")]
    CentralBodyOrbits(String),

    #[error("duplicate body identifier `{0}`")]
    DuplicateBody(String),

    #[error("explicit phase list ran out after {0} bodies")]
    PhasesExhausted(usize),
}

/// Reasons a set of starfield images cannot form a cubemap
///
/// Never fatal: the starfield is dropped and the background stays black.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CubemapError {
    #[error("expected 1 or 6 starfield images, got {0}")]
    FaceCount(usize),

    #[error("starfield faces differ in size or format")]
    MismatchedFaces,

    #[error("starfield faces must be square, got {width}x{height}")]
    NonSquareFace { width: u32, height: u32 },

    #[error("starfield image has no usable pixel data")]
    MissingData,

    #[error("cannot reinterpret starfield as a cubemap: {0}")]
    Reinterpret(String),
}
