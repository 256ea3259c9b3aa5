use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use mandelzoom_core::{FrameParams, PrecisionTier};

use crate::buffer::RenderBuffer;
use crate::error::RenderError;
use crate::kernel;

/// Largest width or height of a single frame, in pixels.
pub const MAX_FRAME_DIMENSION: u32 = 16_384;

/// The result of a full-frame render.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub buffer: RenderBuffer,
    pub elapsed: Duration,
    /// Pixels whose orbit escaped within the budget.
    pub escaped_pixels: usize,
    pub max_iterations: u32,
    pub tier: PrecisionTier,
}

/// Check that a frame of `width × height` can be allocated.
pub fn check_dimensions(width: u32, height: u32) -> crate::Result<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    if width > MAX_FRAME_DIMENSION || height > MAX_FRAME_DIMENSION {
        return Err(RenderError::OffscreenUnavailable {
            width,
            height,
            max: MAX_FRAME_DIMENSION,
        });
    }
    Ok(())
}

/// Render a full frame.
///
/// Every pixel is independent: rows are shaded in parallel via Rayon, each
/// pixel running the single-precision kernel on the frame parameters.
pub fn render_frame(params: &FrameParams) -> crate::Result<RenderResult> {
    let (width, height) = (params.width(), params.height());
    check_dimensions(width, height)?;

    let start = Instant::now();
    debug!(
        width,
        height,
        max_iterations = params.max_iterations,
        tier = params.tier().label(),
        "Starting frame render"
    );

    let mut buffer = RenderBuffer::new(width, height);
    let stride = buffer.stride();
    let escaped_pixels: usize = buffer
        .pixels
        .par_chunks_mut(stride)
        .enumerate()
        .map(|(row, line)| {
            let mut escaped = 0;
            for (col, px) in line.chunks_exact_mut(4).enumerate() {
                let result = kernel::iterate_pixel(params, col as u32, row as u32);
                escaped += usize::from(result.escaped());
                px.copy_from_slice(&crate::palette::color(params.palette, result));
            }
            escaped
        })
        .sum();

    let elapsed = start.elapsed();
    info!(
        elapsed_ms = elapsed.as_millis(),
        width, height, escaped_pixels, "Render complete"
    );

    Ok(RenderResult {
        buffer,
        elapsed,
        escaped_pixels,
        max_iterations: params.max_iterations,
        tier: params.tier(),
    })
}
