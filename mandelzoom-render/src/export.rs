//! High-resolution export: re-render the current view at an integer
//! multiple of the screen size and encode it as JPEG, or as PNG with the
//! view embedded in tEXt chunks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use mandelzoom_core::{share, Coordinator, IterationPolicy, PrecisionTier, Screen, ViewState};

use crate::buffer::RenderBuffer;
use crate::error::RenderError;
use crate::renderer::{check_dimensions, render_frame, RenderResult};

/// Default multiple of the on-screen physical resolution.
pub const DEFAULT_EXPORT_SCALE: u32 = 4;

pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Output encoding of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossy, quality 1..=100.
    Jpeg { quality: u8 },
    /// Lossless, with the view stored as text metadata.
    Png,
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "jpg",
            Self::Png => "png",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "JPEG",
            Self::Png => "PNG",
        }
    }
}

/// Everything needed to produce one exported image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportRequest {
    pub view: ViewState,
    /// The on-screen surface the export is scaled from.
    pub screen: Screen,
    pub tier: PrecisionTier,
    pub scale: u32,
    pub format: ExportFormat,
}

/// What a finished export wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
}

/// Screen of the export target: `scale` times the physical size.
pub fn export_screen(screen: &Screen, scale: u32) -> crate::Result<Screen> {
    if scale == 0 {
        return Err(RenderError::InvalidExportScale(scale));
    }
    let width = screen.width.saturating_mul(scale);
    let height = screen.height.saturating_mul(scale);
    check_dimensions(width, height)?;
    Ok(Screen::new(width, height, screen.scale_factor))
}

/// Render the requested view at export resolution.
pub fn render_export(request: &ExportRequest) -> crate::Result<RenderResult> {
    let target = export_screen(&request.screen, request.scale)?;
    let params = Coordinator::frame_params_with(
        &request.view,
        &target,
        request.tier,
        IterationPolicy::EXPORT,
    )?;
    render_frame(&params)
}

/// Encode `buffer` as a baseline JPEG (alpha dropped).
pub fn encode_jpeg<W: Write>(buffer: &RenderBuffer, quality: u8, writer: W) -> crate::Result<()> {
    let quality = quality.clamp(1, 100);
    let encoder = JpegEncoder::new_with_quality(writer, quality);
    encoder.write_image(
        &buffer.to_rgb(),
        buffer.width,
        buffer.height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

/// View description embedded in PNG exports.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMetadata {
    pub share: String,
    pub center_re: String,
    pub center_im: String,
    pub zoom: f64,
    pub palette: String,
    pub tier: PrecisionTier,
    pub max_iterations: u32,
    pub width: u32,
    pub height: u32,
}

impl ExportMetadata {
    pub fn new(view: &ViewState, result: &RenderResult) -> Self {
        Self {
            share: share::encode(view),
            center_re: share::format_extended(view.center.re),
            center_im: share::format_extended(view.center.im),
            zoom: view.zoom,
            palette: view.palette.label().to_string(),
            tier: result.tier,
            max_iterations: result.max_iterations,
            width: result.buffer.width,
            height: result.buffer.height,
        }
    }

    fn description(&self) -> String {
        format!(
            "Mandelbrot - Center: {} {}i, Zoom: {:e}, Iterations: {}",
            self.center_re, self.center_im, self.zoom, self.max_iterations,
        )
    }

    fn text_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("MandelZoom.Share".into(), self.share.clone()),
            ("MandelZoom.CenterRe".into(), self.center_re.clone()),
            ("MandelZoom.CenterIm".into(), self.center_im.clone()),
            ("MandelZoom.Zoom".into(), format!("{:e}", self.zoom)),
            ("MandelZoom.Palette".into(), self.palette.clone()),
            ("MandelZoom.Precision".into(), self.tier.label().to_string()),
            ("MandelZoom.MaxIterations".into(), self.max_iterations.to_string()),
            (
                "MandelZoom.Resolution".into(),
                format!("{}x{}", self.width, self.height),
            ),
        ]
    }
}

/// Encode `buffer` as an RGBA PNG carrying `metadata` in tEXt chunks.
pub fn encode_png<W: Write>(
    buffer: &RenderBuffer,
    metadata: &ExportMetadata,
    writer: W,
) -> crate::Result<()> {
    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "MandelZoom".to_string())?;
    encoder.add_text_chunk("Description".to_string(), metadata.description())?;
    for (key, value) in metadata.text_pairs() {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;
    png_writer.finish()?;
    Ok(())
}

/// Encode a rendered export in the requested format.
pub fn encode<W: Write>(
    view: &ViewState,
    result: &RenderResult,
    format: ExportFormat,
    writer: W,
) -> crate::Result<()> {
    match format {
        ExportFormat::Jpeg { quality } => encode_jpeg(&result.buffer, quality, writer),
        ExportFormat::Png => encode_png(&result.buffer, &ExportMetadata::new(view, result), writer),
    }
}

/// Render and write an export to `path`.
pub fn export_to_file(request: &ExportRequest, path: &Path) -> crate::Result<ExportSummary> {
    let result = render_export(request)?;
    debug!(
        path = %path.display(),
        format = request.format.label(),
        "writing export"
    );
    let mut writer = BufWriter::new(File::create(path)?);
    encode(&request.view, &result, request.format, &mut writer)?;
    writer.flush()?;

    info!(
        path = %path.display(),
        width = result.buffer.width,
        height = result.buffer.height,
        elapsed_ms = result.elapsed.as_millis(),
        "Export written"
    );
    Ok(ExportSummary {
        path: path.to_path_buf(),
        width: result.buffer.width,
        height: result.buffer.height,
        max_iterations: result.max_iterations,
    })
}

/// File stem describing the view, e.g. `mandelzoom_z1.5e12_rainbow`.
pub fn default_file_stem(view: &ViewState) -> String {
    let palette: String = view
        .palette
        .label()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    format!("mandelzoom_z{:.2e}_{palette}", view.zoom)
}

/// First free `dir/stem.ext`, appending `_001`, `_002`, … on collision.
pub fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let base = dir.join(format!("{stem}.{ext}"));
    if !base.exists() {
        return base;
    }
    (1..1000)
        .map(|i| dir.join(format!("{stem}_{i:03}.{ext}")))
        .find(|p| !p.exists())
        .unwrap_or_else(|| dir.join(format!("{stem}_export.{ext}")))
}
