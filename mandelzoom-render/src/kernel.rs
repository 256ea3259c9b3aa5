//! The per-pixel program of the parallel renderer.
//!
//! Everything here runs in `f32`: the plane point of a pixel is rebuilt
//! from the frame's `f32` hi/lo pairs and iterated with `f32` extended
//! arithmetic, using the split constant carried in [`FrameParams`].

use mandelzoom_core::{
    iterate, ComplexExtended, ExtendedReal, FrameParams, FrameScale, IterationResult, Partial,
    Rigorous, Splitter, Tier,
};

use crate::palette;

/// Hard ceiling on the per-pixel loop, whatever the frame asks for.
pub const KERNEL_ITERATION_CAP: u32 = 5000;

/// Normalised, aspect-corrected coordinates of the centre of pixel
/// `(col, row)`; row 0 is the top of the image and y grows upward.
#[inline]
fn pixel_uv(params: &FrameParams, col: u32, row: u32) -> (f32, f32) {
    let [w, h] = params.resolution;
    let frag_x = col as f32 + 0.5;
    let frag_y = h - row as f32 - 0.5;
    let u = (frag_x / w * 2.0 - 1.0) * (w / h);
    let v = frag_y / h * 2.0 - 1.0;
    (u, v)
}

/// Plane point of a pixel, tier `T`.
#[inline]
fn pixel_point<T: Tier>(
    params: &FrameParams,
    col: u32,
    row: u32,
    splitter: Splitter<f32>,
) -> ComplexExtended<f32, T> {
    let (u, v) = pixel_uv(params, col, row);
    let center_re = ExtendedReal::<f32, T>::new(params.center_re[0], params.center_re[1]);
    let center_im = ExtendedReal::<f32, T>::new(params.center_im[0], params.center_im[1]);
    let offset = match params.scale {
        // Offsets are plain f32 products; only the centre carries extra bits.
        FrameScale::Scalar(s) => ComplexExtended::new(
            ExtendedReal::from_native(u * s),
            ExtendedReal::from_native(v * s),
        ),
        FrameScale::Pair([hi, lo]) => ComplexExtended::new(
            ExtendedReal::from_native(u),
            ExtendedReal::from_native(v),
        )
        .scale_with(ExtendedReal::new(hi, lo), splitter),
    };
    ComplexExtended::new(center_re, center_im) + offset
}

#[inline]
fn iterate_tier<T: Tier>(params: &FrameParams, col: u32, row: u32) -> IterationResult {
    let splitter = Splitter::new(params.split_constant);
    let c = pixel_point::<T>(params, col, row, splitter);
    iterate(c, params.max_iterations.min(KERNEL_ITERATION_CAP), splitter)
}

/// Escape result for one pixel.
#[inline]
pub fn iterate_pixel(params: &FrameParams, col: u32, row: u32) -> IterationResult {
    match params.scale {
        FrameScale::Scalar(_) => iterate_tier::<Partial>(params, col, row),
        FrameScale::Pair(_) => iterate_tier::<Rigorous>(params, col, row),
    }
}

/// Final RGBA colour for one pixel.
#[inline]
pub fn shade_pixel(params: &FrameParams, col: u32, row: u32) -> [u8; 4] {
    palette::color(params.palette, iterate_pixel(params, col, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelzoom_core::{Coordinator, PrecisionTier, Screen, ViewState};

    fn params(tier: PrecisionTier, w: u32, h: u32) -> FrameParams {
        Coordinator::default()
            .frame_params(&ViewState::default(), &Screen::new(w, h, 1.0), tier)
            .unwrap()
    }

    #[test]
    fn uv_spans_aspect_corrected_square() {
        let p = params(PrecisionTier::Partial, 200, 100);
        let (u, v) = pixel_uv(&p, 0, 0);
        assert!((u - (-2.0 + 0.01)).abs() < 1e-5);
        assert!((v - (1.0 - 0.01)).abs() < 1e-5);
        let (u, v) = pixel_uv(&p, 199, 99);
        assert!((u - (2.0 - 0.01)).abs() < 1e-5);
        assert!((v - (-1.0 + 0.01)).abs() < 1e-5);
    }

    #[test]
    fn pixel_point_matches_host_mapping() {
        let view = ViewState::default();
        let screen = Screen::new(300, 200, 1.0);
        for tier in [PrecisionTier::Partial, PrecisionTier::Rigorous] {
            let p = Coordinator::default().frame_params(&view, &screen, tier).unwrap();
            let s = Splitter::new(p.split_constant);
            for &(col, row) in &[(0u32, 0u32), (150, 100), (299, 13)] {
                let host = view
                    .screen_to_plane(&screen, col as f64 + 0.5, row as f64 + 0.5)
                    .to_f64();
                let single = match tier {
                    PrecisionTier::Partial => pixel_point::<Partial>(&p, col, row, s).to_f64(),
                    PrecisionTier::Rigorous => pixel_point::<Rigorous>(&p, col, row, s).to_f64(),
                };
                assert!((host.0 - single.0).abs() < 1e-6, "{tier:?} ({col}, {row})");
                assert!((host.1 - single.1).abs() < 1e-6, "{tier:?} ({col}, {row})");
            }
        }
    }

    #[test]
    fn centre_pixel_of_default_view_is_black() {
        let p = params(PrecisionTier::Partial, 101, 101);
        // Pixel 50 is the exact centre (-0.75, 0), which never escapes.
        assert_eq!(shade_pixel(&p, 50, 50), [0, 0, 0, 255]);
    }

    #[test]
    fn corner_pixel_escapes() {
        let p = params(PrecisionTier::Rigorous, 64, 64);
        assert!(iterate_pixel(&p, 0, 0).escaped());
    }

    #[test]
    fn tiers_agree_on_a_shallow_view() {
        // Both tiers run in f32 here; only pixels sitting on an escape
        // threshold may land on a different count.
        let w = 48;
        let h = 32;
        let partial = params(PrecisionTier::Partial, w, h);
        let rigorous = params(PrecisionTier::Rigorous, w, h);
        assert!(matches!(partial.scale, FrameScale::Scalar(_)));
        assert!(matches!(rigorous.scale, FrameScale::Pair(_)));

        let mut compared = 0;
        let mut agreed = 0;
        for row in 0..h {
            for col in 0..w {
                let a = iterate_pixel(&partial, col, row);
                let b = iterate_pixel(&rigorous, col, row);
                compared += 1;
                if a.escaped() == b.escaped() && a.count() == b.count() {
                    agreed += 1;
                }
            }
        }
        assert!(agreed * 100 >= compared * 98, "{agreed} of {compared} agree");
    }

    #[test]
    fn loop_is_capped() {
        let mut p = params(PrecisionTier::Partial, 11, 11);
        p.max_iterations = 1_000_000;
        assert_eq!(
            iterate_pixel(&p, 5, 5),
            IterationResult::Bounded {
                iterations: KERNEL_ITERATION_CAP
            }
        );
    }
}
