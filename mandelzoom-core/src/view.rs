use crate::complex::HostComplex;
use crate::error::CoreError;
use crate::extended::HostReal;
use crate::palette_id::PaletteId;

/// Fraction of the view height covered by one arrow-key nudge.
pub const NUDGE_PAN_FRACTION: f64 = 0.1;

/// Zoom multiplier of one `+`/`-` nudge.
pub const NUDGE_ZOOM_FACTOR: f64 = 1.25;

/// Zoom multiplier of one mouse-wheel notch.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.1;

/// Plane units spanned by the full view height at zoom 1.
const VIEW_HEIGHT_AT_UNIT_ZOOM: f64 = 4.0;

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// Physical render-surface size and the logical→physical pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
}

impl Screen {
    pub fn new(width: u32, height: u32, scale_factor: f32) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Build from logical points, rounding to whole device pixels.
    pub fn from_logical(width: f32, height: f32, scale_factor: f32) -> Self {
        Self {
            width: (width * scale_factor).round().max(0.0) as u32,
            height: (height * scale_factor).round().max(0.0) as u32,
            scale_factor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Convert a logical-point distance into physical pixels.
    pub fn to_physical(&self, logical: f32) -> f64 {
        logical as f64 * self.scale_factor as f64
    }

    pub fn validated(self) -> crate::Result<Self> {
        if self.is_empty() {
            return Err(CoreError::InvalidScreen {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(1280, 800, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Discrete keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
    ZoomIn,
    ZoomOut,
}

/// One user intent, already expressed in physical screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    /// Drag by `(dx, dy)` pixels; screen y grows downward.
    Pan { dx: f64, dy: f64 },
    /// Multiply zoom by `factor`, keeping the plane point under `(x, y)` fixed.
    ZoomAtPoint { x: f64, y: f64, factor: f64 },
    Nudge(NudgeDirection),
    Reset,
    SetPalette(PaletteId),
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// What is on screen: plane center, magnification and colour scheme.
///
/// The center is kept in `f64` pairs so that deep zooms keep sub-ulp
/// placement; zoom is a plain `f64` since only its ratio to neighbouring
/// frames matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub center: HostComplex,
    pub zoom: f64,
    pub palette: PaletteId,
}

impl ViewState {
    pub const DEFAULT_CENTER: (f64, f64) = (-0.75, 0.0);
    pub const DEFAULT_ZOOM: f64 = 1.0;

    pub fn new(center: HostComplex, zoom: f64, palette: PaletteId) -> crate::Result<Self> {
        if !(zoom > 0.0 && zoom.is_finite()) {
            return Err(CoreError::InvalidZoom(zoom));
        }
        Ok(Self {
            center,
            zoom,
            palette,
        })
    }

    /// Half the view height in plane units (`2/zoom`).
    #[inline]
    pub fn scale(&self) -> f64 {
        2.0 / self.zoom
    }

    /// Apply one event, returning the new state. Events that cannot be
    /// honoured (zero-size screen, degenerate zoom factor) leave the state
    /// unchanged.
    pub fn apply(self, event: ViewEvent, screen: &Screen) -> Self {
        match event {
            ViewEvent::Pan { dx, dy } => self.pan(dx, dy, screen),
            ViewEvent::ZoomAtPoint { x, y, factor } => self.zoom_at_point(x, y, factor, screen),
            ViewEvent::Nudge(direction) => self.nudge(direction),
            ViewEvent::Reset => Self {
                palette: self.palette,
                ..Self::default()
            },
            ViewEvent::SetPalette(palette) => Self { palette, ..self },
        }
    }

    fn pan(self, dx: f64, dy: f64, screen: &Screen) -> Self {
        if screen.is_empty() {
            return self;
        }
        let per_pixel = VIEW_HEIGHT_AT_UNIT_ZOOM / (self.zoom * screen.height as f64);
        self.offset(-dx * per_pixel, dy * per_pixel)
    }

    fn zoom_at_point(self, x: f64, y: f64, factor: f64, screen: &Screen) -> Self {
        if screen.is_empty() {
            return self;
        }
        let Some(zoom) = self.scaled_zoom(factor) else {
            return self;
        };
        let (nx, ny) = normalized(screen, x, y);
        let shift = self.scale() - 2.0 / zoom;
        Self {
            zoom,
            ..self.offset(nx * shift, ny * shift)
        }
    }

    fn nudge(self, direction: NudgeDirection) -> Self {
        let step = NUDGE_PAN_FRACTION * VIEW_HEIGHT_AT_UNIT_ZOOM / self.zoom;
        match direction {
            NudgeDirection::Left => self.offset(-step, 0.0),
            NudgeDirection::Right => self.offset(step, 0.0),
            NudgeDirection::Up => self.offset(0.0, step),
            NudgeDirection::Down => self.offset(0.0, -step),
            NudgeDirection::ZoomIn => self.with_zoom_factor(NUDGE_ZOOM_FACTOR),
            NudgeDirection::ZoomOut => self.with_zoom_factor(1.0 / NUDGE_ZOOM_FACTOR),
        }
    }

    fn with_zoom_factor(self, factor: f64) -> Self {
        match self.scaled_zoom(factor) {
            Some(zoom) => Self { zoom, ..self },
            None => self,
        }
    }

    fn scaled_zoom(&self, factor: f64) -> Option<f64> {
        let zoom = self.zoom * factor;
        (factor > 0.0 && zoom > 0.0 && zoom.is_finite()).then_some(zoom)
    }

    /// Shift the center by a plane-unit offset, accumulating in full precision.
    fn offset(self, d_re: f64, d_im: f64) -> Self {
        let center = HostComplex::new(
            self.center.re + HostReal::from_native(d_re),
            self.center.im + HostReal::from_native(d_im),
        );
        Self { center, ..self }
    }

    /// The plane point under screen position `(x, y)` (physical pixels,
    /// origin top-left). Pixel `(col, row)` is sampled at its centre,
    /// `(col + 0.5, row + 0.5)`.
    pub fn screen_to_plane(&self, screen: &Screen, x: f64, y: f64) -> HostComplex {
        if screen.is_empty() {
            return self.center;
        }
        let (nx, ny) = normalized(screen, x, y);
        let scale = self.scale();
        HostComplex::new(
            self.center.re + HostReal::from_native(nx * scale),
            self.center.im + HostReal::from_native(ny * scale),
        )
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            center: HostComplex::from_f64(Self::DEFAULT_CENTER.0, Self::DEFAULT_CENTER.1),
            zoom: Self::DEFAULT_ZOOM,
            palette: PaletteId::default(),
        }
    }
}

/// Screen position to aspect-corrected normalised coordinates: x spans
/// `[-aspect, aspect]`, y spans `[-1, 1]` with up positive.
fn normalized(screen: &Screen, x: f64, y: f64) -> (f64, f64) {
    let nx = (x / screen.width as f64 * 2.0 - 1.0) * screen.aspect();
    let ny = -(y / screen.height as f64 * 2.0 - 1.0);
    (nx, ny)
}

// ---------------------------------------------------------------------------
// Persisted form
// ---------------------------------------------------------------------------

/// Flat, serialisable copy of a [`ViewState`] with the full center pairs.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewSnapshot {
    pub re: [f64; 2],
    pub im: [f64; 2],
    pub zoom: f64,
    #[serde(default)]
    pub palette: PaletteId,
}

impl From<ViewState> for ViewSnapshot {
    fn from(v: ViewState) -> Self {
        Self {
            re: [v.center.re.hi, v.center.re.lo],
            im: [v.center.im.hi, v.center.im.lo],
            zoom: v.zoom,
            palette: v.palette,
        }
    }
}

impl TryFrom<ViewSnapshot> for ViewState {
    type Error = CoreError;

    fn try_from(s: ViewSnapshot) -> crate::Result<Self> {
        let center = HostComplex::new(
            HostReal::from_parts(s.re[0], s.re[1]),
            HostReal::from_parts(s.im[0], s.im[1]),
        );
        if !center.is_finite() {
            return Err(CoreError::InvalidCenter);
        }
        ViewState::new(center, s.zoom, s.palette)
    }
}
