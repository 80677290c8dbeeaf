//! Error taxonomy for configuration, collection and snapshot operations.
//!
//! Every variant is raised synchronously by the call that caused it. Gesture
//! and geometry code never fails; it saturates instead.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors surfaced by the touchbox public surface.
#[derive(Debug, thiserror::Error)]
pub enum TouchError {
    #[error("key cannot be blank")]
    KeyBlank,
    #[error("key already exists: {0}")]
    KeyDuplicate(String),
    #[error("no center given and the parent has not been measured yet")]
    MissingParentSize,
    #[error("minimum zoom must be greater than 0, got {start}..={end}")]
    InvalidZoomRange { start: f64, end: f64 },
    #[error("initial content size {width}x{height} must exceed the control size {control_size}")]
    InvalidInitialContentSize { width: f64, height: f64, control_size: f64 },
    #[error("item content {width}x{height} is too small for {control_size} corner handles")]
    HandleOverlap { width: f64, height: f64, control_size: f64 },
    #[error("maximum viewport scale must be at least 1, got {0}")]
    InvalidMaxScale(f64),
    #[error("invalid config: {0}")]
    ConfigParse(String),
    #[error("unsupported snapshot version: {0}")]
    UnsupportedSnapshotVersion(u32),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}
