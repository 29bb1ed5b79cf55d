//! Typed configuration errors.
//!
//! Runtime and bootstrap failures travel as `anyhow::Error`; this enum covers the
//! scene parameters rejected before any GPU object is created.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("instance count must be at least 1")]
    NoInstances,
    #[error("circle radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("circle inner radius must be non-negative and finite, got {0}")]
    InvalidInnerRadius(f32),
    #[error("circle needs at least one subdivision")]
    NoSubdivisions,
    #[error("circle subdivisions must be at most {max}, got {got}")]
    TooManySubdivisions { got: u32, max: u32 },
    #[error("circle angles must be finite, got {start}..{end}")]
    InvalidAngles { start: f32, end: f32 },
    #[error("{name} range {min}..{max} is empty or not finite")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
}
