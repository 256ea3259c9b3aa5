use crate::error::CoreError;

/// Zoom-dependent iteration budget.
///
/// `clamp(floor(100 + 150·log10(zoom)), lower, upper)`. Deeper views need
/// more iterations to resolve the boundary; the bounds keep a frame's cost
/// finite in every environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationPolicy {
    lower: u32,
    upper: u32,
}

impl IterationPolicy {
    /// Bounds for the per-pixel renderer.
    pub const PARALLEL: Self = Self {
        lower: 200,
        upper: 2500,
    };

    /// Bounds for single-point host queries.
    pub const HOST_PROBE: Self = Self {
        lower: 200,
        upper: 10_000,
    };

    /// Bounds for high-resolution export.
    pub const EXPORT: Self = Self {
        lower: 200,
        upper: 5000,
    };

    const BASE: f64 = 100.0;
    const PER_DECADE: f64 = 150.0;

    pub fn new(lower: u32, upper: u32) -> crate::Result<Self> {
        if lower > upper {
            return Err(CoreError::InvalidIterationBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> u32 {
        self.lower
    }

    pub fn upper(&self) -> u32 {
        self.upper
    }

    /// Budget for a view at `zoom`. Non-finite or non-positive zoom maps to
    /// the lower bound.
    pub fn max_iterations(&self, zoom: f64) -> u32 {
        let raw = (Self::BASE + Self::PER_DECADE * zoom.log10()).floor();
        if raw.is_nan() || raw <= self.lower as f64 {
            return self.lower;
        }
        if raw >= self.upper as f64 {
            return self.upper;
        }
        raw as u32
    }
}

impl Default for IterationPolicy {
    fn default() -> Self {
        Self::PARALLEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn shallow_views_use_lower_bound() {
        assert_eq!(IterationPolicy::PARALLEL.max_iterations(1.0), 200);
        assert_eq!(IterationPolicy::PARALLEL.max_iterations(0.01), 200);
    }

    #[test]
    fn formula_between_bounds() {
        // 100 + 150·3 = 550
        assert_eq!(IterationPolicy::PARALLEL.max_iterations(1000.0), 550);
        // 100 + 150·6 = 1000
        assert_eq!(IterationPolicy::HOST_PROBE.max_iterations(1e6), 1000);
        // 100 + 150·30 = 4600, still under the export cap
        assert_eq!(IterationPolicy::EXPORT.max_iterations(1e30), 4600);
    }

    #[test]
    fn export_cap_reached_past_thirty_three_decades() {
        let p = IterationPolicy::EXPORT;
        assert!(p.max_iterations(1e32) < p.upper());
        assert_eq!(p.max_iterations(1e34), p.upper());
    }

    #[test]
    fn deep_views_hit_upper_bound() {
        assert_eq!(IterationPolicy::PARALLEL.max_iterations(1e20), 2500);
        assert_eq!(IterationPolicy::EXPORT.max_iterations(1e40), 5000);
        assert_eq!(IterationPolicy::HOST_PROBE.max_iterations(1e100), 10_000);
    }

    #[test]
    fn degenerate_zoom_uses_lower_bound() {
        let p = IterationPolicy::PARALLEL;
        assert_eq!(p.max_iterations(0.0), 200);
        assert_eq!(p.max_iterations(-5.0), 200);
        assert_eq!(p.max_iterations(f64::NAN), 200);
        assert_eq!(p.max_iterations(f64::INFINITY), 2500);
    }

    #[test]
    fn inverted_bounds_rejected() {
        assert!(IterationPolicy::new(500, 100).is_err());
        let p = IterationPolicy::new(100, 100).unwrap();
        assert_eq!(p.max_iterations(1e10), 100);
    }

    proptest! {
        #[test]
        fn monotonic_in_zoom(a in 1e-3f64..1e40, b in 1e-3f64..1e40) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for p in [IterationPolicy::PARALLEL, IterationPolicy::HOST_PROBE, IterationPolicy::EXPORT] {
                let n_lo = p.max_iterations(lo);
                let n_hi = p.max_iterations(hi);
                prop_assert!(n_lo <= n_hi);
                prop_assert!(n_lo >= p.lower() && n_hi <= p.upper());
            }
        }
    }
}
