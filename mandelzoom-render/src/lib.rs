pub mod buffer;
pub mod error;
pub mod export;
pub mod kernel;
pub mod palette;
pub mod renderer;

pub use buffer::RenderBuffer;
pub use error::RenderError;
pub use export::{
    export_screen, export_to_file, render_export, ExportFormat, ExportMetadata, ExportRequest,
    ExportSummary, DEFAULT_EXPORT_SCALE, DEFAULT_JPEG_QUALITY,
};
pub use kernel::{iterate_pixel, shade_pixel, KERNEL_ITERATION_CAP};
pub use palette::{palette_rgb, preview_colors};
pub use renderer::{check_dimensions, render_frame, RenderResult, MAX_FRAME_DIMENSION};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
