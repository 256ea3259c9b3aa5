//! Bridges the host view state and the two numeric environments.
//!
//! The per-pixel renderer only has `f32` arithmetic, so it receives the
//! center and scale as `f32` hi/lo pairs plus the `f32` split constant.
//! The host probe evaluates single points with `f64` pairs and the `f64`
//! split constant. The two paths share the screen mapping but never each
//! other's arithmetic instantiation.

use tracing::debug;

use crate::complex::HostComplex;
use crate::eft::{NativeFloat, Splitter};
use crate::escape::{iterate, IterationResult};
use crate::extended::{ExtendedReal, HostReal, PrecisionTier, Rigorous};
use crate::palette_id::PaletteId;
use crate::policy::IterationPolicy;
use crate::view::{Screen, ViewState};

/// Half the view height in plane units, as handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameScale {
    /// Single `f32` (partial tier).
    Scalar(f32),
    /// `f32` hi/lo pair (rigorous tier).
    Pair([f32; 2]),
}

impl FrameScale {
    pub fn tier(&self) -> PrecisionTier {
        match self {
            Self::Scalar(_) => PrecisionTier::Partial,
            Self::Pair(_) => PrecisionTier::Rigorous,
        }
    }

    /// The scale as an `f32` pair; the scalar form has a zero low part.
    pub fn as_pair(&self) -> [f32; 2] {
        match *self {
            Self::Scalar(s) => [s, 0.0],
            Self::Pair(p) => p,
        }
    }
}

/// Immutable per-frame parameters for the parallel renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Output width and height in pixels.
    pub resolution: [f32; 2],
    pub center_re: [f32; 2],
    pub center_im: [f32; 2],
    pub scale: FrameScale,
    pub palette: PaletteId,
    pub max_iterations: u32,
    /// Veltkamp constant for `f32`, passed as data so it is never folded.
    pub split_constant: f32,
}

impl FrameParams {
    pub fn width(&self) -> u32 {
        self.resolution[0] as u32
    }

    pub fn height(&self) -> u32 {
        self.resolution[1] as u32
    }

    pub fn tier(&self) -> PrecisionTier {
        self.scale.tier()
    }
}

/// Builds renderer parameters and answers host-side point queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinator {
    parallel: IterationPolicy,
    host: IterationPolicy,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self {
            parallel: IterationPolicy::PARALLEL,
            host: IterationPolicy::HOST_PROBE,
        }
    }
}

impl Coordinator {
    pub fn parallel_policy(&self) -> IterationPolicy {
        self.parallel
    }

    /// Parameters for an on-screen frame.
    pub fn frame_params(
        &self,
        view: &ViewState,
        screen: &Screen,
        tier: PrecisionTier,
    ) -> crate::Result<FrameParams> {
        Self::frame_params_with(view, screen, tier, self.parallel)
    }

    /// Parameters for a frame with an explicit iteration policy (used by
    /// export, which renders at a larger size with its own budget).
    pub fn frame_params_with(
        view: &ViewState,
        screen: &Screen,
        tier: PrecisionTier,
        policy: IterationPolicy,
    ) -> crate::Result<FrameParams> {
        let screen = screen.validated()?;
        let scale = HostReal::from_native(view.scale());
        let scale = match tier {
            PrecisionTier::Partial => FrameScale::Scalar(scale.hi as f32),
            PrecisionTier::Rigorous => {
                let pair = ExtendedReal::<f32, Rigorous>::narrow(scale);
                FrameScale::Pair([pair.hi, pair.lo])
            }
        };
        let re = ExtendedReal::<f32, Rigorous>::narrow(view.center.re);
        let im = ExtendedReal::<f32, Rigorous>::narrow(view.center.im);
        let params = FrameParams {
            resolution: [screen.width as f32, screen.height as f32],
            center_re: [re.hi, re.lo],
            center_im: [im.hi, im.lo],
            scale,
            palette: view.palette,
            max_iterations: policy.max_iterations(view.zoom),
            split_constant: f32::split_constant(),
        };
        debug!(
            width = screen.width,
            height = screen.height,
            tier = tier.label(),
            max_iterations = params.max_iterations,
            zoom = view.zoom,
            "frame params built"
        );
        Ok(params)
    }

    /// Iterate the plane point under screen position `(x, y)`.
    pub fn probe(&self, view: &ViewState, screen: &Screen, x: f64, y: f64) -> IterationResult {
        let c = view.screen_to_plane(screen, x, y);
        self.probe_point(c, view.zoom)
    }

    /// Iterate an explicit plane point with the budget for `zoom`.
    pub fn probe_point(&self, c: HostComplex, zoom: f64) -> IterationResult {
        let max_iterations = self.host.max_iterations(zoom);
        let result = iterate(c, max_iterations, Splitter::<f64>::opaque());
        debug!(?result, max_iterations, "host probe");
        result
    }
}
