use thiserror::Error;

/// Errors originating from the core engine.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid screen: {width}×{height} (both dimensions must be > 0)")]
    InvalidScreen { width: u32, height: u32 },

    #[error("invalid zoom: {0} (must be positive and finite)")]
    InvalidZoom(f64),

    #[error("invalid view center (must be finite)")]
    InvalidCenter,

    #[error("invalid iteration bounds: lower {lower} > upper {upper}")]
    InvalidIterationBounds { lower: u32, upper: u32 },
}
