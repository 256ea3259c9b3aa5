use crate::complex::ComplexExtended;
use crate::eft::{NativeFloat, Splitter};
use crate::extended::Tier;

/// Squared bailout radius. The iteration stops once `|z|² > 4`.
pub const ESCAPE_NORM_SQ: f64 = 4.0;

/// The result of iterating a single point.
///
/// Only raw iteration data is stored; colouring happens downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationResult {
    /// The orbit left the radius-2 disc. `norm_sq` is `|z|²` of the first
    /// iterate outside it.
    ///
    /// `iterations` is one less than the number of `z ← z² + c` updates
    /// performed before the escape was seen (saturating at 0), so
    /// `c = 1 + i`, which escapes after two updates, reports 1.
    Escaped { iterations: u32, norm_sq: f64 },

    /// The orbit stayed inside for the whole budget.
    Bounded { iterations: u32 },
}

impl IterationResult {
    /// Iteration count in `[0, max_iterations]`. For an escaped point this is
    /// one less than the number of updates performed.
    #[inline]
    pub fn count(&self) -> u32 {
        match *self {
            Self::Escaped { iterations, .. } | Self::Bounded { iterations } => iterations,
        }
    }

    #[inline]
    pub fn escaped(&self) -> bool {
        matches!(self, Self::Escaped { .. })
    }

    /// Continuous escape value `n − log₂(log₂|z|)`, `None` for bounded
    /// points.
    pub fn smooth_value(&self) -> Option<f64> {
        match *self {
            Self::Escaped {
                iterations,
                norm_sq,
            } => Some(smooth_value(iterations, norm_sq)),
            Self::Bounded { .. } => None,
        }
    }
}

/// Smooth colouring value for an escaped orbit.
///
/// The loop counter at escape is `iterations + 1`.
#[inline]
pub fn smooth_value(iterations: u32, norm_sq: f64) -> f64 {
    let n = iterations as f64 + 1.0;
    let log_mag = norm_sq.sqrt().log2().max(1.0);
    n - log_mag.log2()
}

/// Iterate `z ← z² + c` from `z = 0` for at most `max_iterations` steps.
///
/// The magnitude test runs on the high part of `|z|²` before each update,
/// so the squares computed for the test are reused by the update.
pub fn iterate<F: NativeFloat, T: Tier>(
    c: ComplexExtended<F, T>,
    max_iterations: u32,
    splitter: Splitter<F>,
) -> IterationResult {
    let bailout = F::from_f64(ESCAPE_NORM_SQ);
    let mut z = ComplexExtended::<F, T>::ZERO;

    for i in 0..max_iterations {
        let squares = z.squares_with(splitter);
        let norm_sq = squares.0 + squares.1;
        if norm_sq.hi > bailout {
            return IterationResult::Escaped {
                iterations: i.saturating_sub(1),
                norm_sq: norm_sq.hi.to_f64(),
            };
        }
        z = z.sqr_add_with(squares, c, splitter);
    }

    IterationResult::Bounded {
        iterations: max_iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::HostComplex;
    use crate::extended::{Partial, Rigorous};
    use proptest::prelude::*;

    fn host(re: f64, im: f64, max: u32) -> IterationResult {
        iterate(HostComplex::from_f64(re, im), max, Splitter::opaque())
    }

    fn single(re: f64, im: f64, max: u32) -> IterationResult {
        iterate(
            ComplexExtended::<f32, Partial>::from_f64(re, im),
            max,
            Splitter::opaque(),
        )
    }

    #[test]
    fn origin_is_bounded() {
        assert_eq!(host(0.0, 0.0, 1000), IterationResult::Bounded { iterations: 1000 });
    }

    #[test]
    fn one_plus_i_escapes_immediately() {
        // z1 = 1+i (|z|² = 2), z2 = 1+3i (|z|² = 10).
        let r = host(1.0, 1.0, 100);
        assert!(r.escaped());
        assert!(r.count() <= 1);
        assert_eq!(r.count(), 1);
    }

    #[test]
    fn far_point_reports_zero() {
        let r = host(3.0, 0.0, 100);
        assert_eq!(r.count(), 0);
        assert!(r.escaped());
    }

    #[test]
    fn minus_two_is_bounded() {
        // The orbit of -2 is 0, -2, 2, 2, ... and never exceeds |z|² = 4.
        assert!(!host(-2.0, 0.0, 500).escaped());
    }

    #[test]
    fn zero_budget_is_bounded_with_zero_count() {
        assert_eq!(host(5.0, 5.0, 0), IterationResult::Bounded { iterations: 0 });
    }

    #[test]
    fn escaped_norm_is_beyond_radius() {
        match host(0.5, 0.5, 100) {
            IterationResult::Escaped { norm_sq, .. } => assert!(norm_sq > ESCAPE_NORM_SQ),
            other => panic!("expected escape, got {other:?}"),
        }
    }

    #[test]
    fn smooth_value_only_for_escaped() {
        assert!(host(0.0, 0.0, 50).smooth_value().is_none());
        let s = host(1.0, 1.0, 50).smooth_value().unwrap();
        // n = 2, |z|² = 10: 2 - log2(log2(sqrt(10)))
        let expected = 2.0 - (10.0f64.sqrt().log2()).log2();
        assert!((s - expected).abs() < 1e-12);
    }

    #[test]
    fn single_precision_pair_agrees_on_easy_points() {
        for &(re, im) in &[(0.0, 0.0), (1.0, 1.0), (-0.75, 0.1), (0.28, 0.01), (-1.5, 0.0)] {
            assert_eq!(single(re, im, 300).count(), host(re, im, 300).count(), "c = ({re}, {im})");
        }
    }

    proptest! {
        #[test]
        fn escape_is_monotonic_in_budget(
            re in -2.0f64..1.0,
            im in -1.2f64..1.2,
            low in 1u32..200,
            extra in 0u32..400,
        ) {
            let short = host(re, im, low);
            let long = host(re, im, low + extra);
            if short.escaped() {
                prop_assert_eq!(short, long);
            } else {
                // A longer budget may find the escape at the very next step.
                prop_assert!(long.count() + 1 >= short.count());
            }
            prop_assert!(short.count() <= low);
        }

        #[test]
        fn tiers_agree_on_fast_escapes(re in -2.0f64..1.0, im in -1.2f64..1.2) {
            // Below a few dozen iterations neither tier has lost enough bits
            // to flip the bailout test, except for orbits grazing |z|² = 4.
            let rigorous = iterate(
                ComplexExtended::<f64, Rigorous>::from_f64(re, im),
                24,
                Splitter::opaque(),
            );
            let partial = iterate(
                ComplexExtended::<f64, Partial>::from_f64(re, im),
                24,
                Splitter::opaque(),
            );
            if let IterationResult::Escaped { norm_sq, .. } = rigorous {
                prop_assume!((norm_sq - ESCAPE_NORM_SQ).abs() > 1e-9);
            }
            prop_assert_eq!(rigorous.count(), partial.count());
        }
    }
}
