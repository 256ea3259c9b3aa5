use thiserror::Error;

/// Errors originating from the rendering and export pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid export scale: {0} (must be >= 1)")]
    InvalidExportScale(u32),

    #[error("offscreen target unavailable: {width}×{height} exceeds {max}×{max}")]
    OffscreenUnavailable { width: u32, height: u32, max: u32 },

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] mandelzoom_core::CoreError),
}
