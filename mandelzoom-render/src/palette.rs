use mandelzoom_core::{IterationResult, PaletteId};

/// Smooth-value units per palette period.
const SMOOTH_PERIOD: f32 = 50.0;

const TAU: f32 = 6.28318;

const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Cosine gradient `a + b·cos(2π(c·t + d))`, per channel.
#[inline]
fn cosine(t: f32, a: [f32; 3], b: [f32; 3], c: [f32; 3], d: [f32; 3]) -> [f32; 3] {
    std::array::from_fn(|i| a[i] + b[i] * (TAU * (c[i] * t + d[i])).cos())
}

/// Linear RGB in `[0, 1]` for palette position `t = smooth / 50`.
pub fn palette_rgb(palette: PaletteId, t: f32) -> [f32; 3] {
    const HALF: [f32; 3] = [0.5, 0.5, 0.5];
    match palette {
        PaletteId::MidnightFire => cosine(
            t * 0.5,
            [0.8, 0.5, 0.4],
            [0.2, 0.4, 0.2],
            [2.0, 1.0, 1.0],
            [0.0, 0.25, 0.25],
        ),
        PaletteId::ElectricBlue => cosine(t, HALF, HALF, [1.0, 1.0, 1.0], [0.0, 0.10, 0.20]),
        PaletteId::Radioactive => {
            let k = (t * 20.0).sin() * 0.5 + 0.5;
            [0.1 * k, k, 0.2 * k]
        }
        PaletteId::CottonCandy => cosine(t, HALF, HALF, [1.0, 1.0, 0.5], [0.8, 0.90, 0.30]),
        PaletteId::Matrix => [0.0, (t * 5.0).rem_euclid(1.0), 0.0],
        PaletteId::Rainbow => cosine(t, HALF, HALF, [1.0, 1.0, 1.0], [0.0, 0.33, 0.67]),
    }
}

/// Smooth escape value in single precision: `n − log₂(max(1, log₂|z|))`.
#[inline]
pub fn smooth_value_f32(iterations: u32, norm_sq: f32) -> f32 {
    let n = iterations as f32 + 1.0;
    n - norm_sq.sqrt().log2().max(1.0).log2()
}

/// RGBA colour for one iteration result. Bounded points are black.
#[inline]
pub fn color(palette: PaletteId, result: IterationResult) -> [u8; 4] {
    match result {
        IterationResult::Bounded { .. } => BLACK,
        IterationResult::Escaped {
            iterations,
            norm_sq,
        } => {
            let t = smooth_value_f32(iterations, norm_sq as f32) / SMOOTH_PERIOD;
            let [r, g, b] = palette_rgb(palette, t);
            [to_byte(r), to_byte(g), to_byte(b), 255]
        }
    }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Sample a palette across one period (for the palette bar in the UI).
pub fn preview_colors(palette: PaletteId, count: usize) -> Vec<[u8; 4]> {
    (0..count)
        .map(|i| {
            let t = i as f32 / count.max(1) as f32;
            let [r, g, b] = palette_rgb(palette, t);
            [to_byte(r), to_byte(g), to_byte(b), 255]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(iterations: u32, norm_sq: f64) -> IterationResult {
        IterationResult::Escaped {
            iterations,
            norm_sq,
        }
    }

    #[test]
    fn bounded_is_black() {
        for id in PaletteId::ALL {
            assert_eq!(color(id, IterationResult::Bounded { iterations: 200 }), BLACK);
        }
    }

    #[test]
    fn escaped_is_opaque_and_in_range() {
        for id in PaletteId::ALL {
            for n in [0, 3, 17, 150, 2400] {
                let c = color(id, escaped(n, 7.5));
                assert_eq!(c[3], 255);
            }
        }
    }

    #[test]
    fn rainbow_at_zero() {
        // t = 0: 0.5 + 0.5·cos(2π·{0, 0.33, 0.67})
        let [r, g, b] = palette_rgb(PaletteId::Rainbow, 0.0);
        assert!((r - 1.0).abs() < 1e-5);
        assert!((g - (0.5 + 0.5 * (TAU * 0.33).cos())).abs() < 1e-5);
        assert!((b - (0.5 + 0.5 * (TAU * 0.67).cos())).abs() < 1e-5);
    }

    #[test]
    fn matrix_is_green_sawtooth() {
        let [r, g, b] = palette_rgb(PaletteId::Matrix, 0.1);
        assert_eq!((r, b), (0.0, 0.0));
        assert!((g - 0.5).abs() < 1e-5);
        let [_, g2, _] = palette_rgb(PaletteId::Matrix, 0.3);
        assert!((g2 - 0.5).abs() < 1e-5);
    }

    #[test]
    fn radioactive_keeps_hue() {
        let [r, g, b] = palette_rgb(PaletteId::Radioactive, 0.07);
        assert!((r - 0.1 * g).abs() < 1e-6);
        assert!((b - 0.2 * g).abs() < 1e-6);
    }

    #[test]
    fn smooth_value_matches_host_formula() {
        let host = mandelzoom_core::smooth_value(12, 9.0);
        let single = smooth_value_f32(12, 9.0);
        assert!((host as f32 - single).abs() < 1e-5);
    }

    #[test]
    fn palettes_differ() {
        let r = escaped(25, 6.0);
        let colors: Vec<_> = PaletteId::ALL.iter().map(|&id| color(id, r)).collect();
        for i in 0..colors.len() {
            for j in i + 1..colors.len() {
                assert_ne!(colors[i], colors[j], "{:?} vs {:?}", PaletteId::ALL[i], PaletteId::ALL[j]);
            }
        }
    }

    #[test]
    fn preview_colors_length() {
        assert_eq!(preview_colors(PaletteId::CottonCandy, 100).len(), 100);
        assert!(preview_colors(PaletteId::Matrix, 0).is_empty());
    }
}
