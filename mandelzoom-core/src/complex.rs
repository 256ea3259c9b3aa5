use std::ops::{Add, Neg, Sub};

use crate::eft::{NativeFloat, Splitter};
use crate::extended::{ExtendedReal, Rigorous, Tier};

/// A complex number with [`ExtendedReal`] components.
///
/// Used both for the iterated variable `z` and for the plane constant `c`.
pub struct ComplexExtended<F: NativeFloat, T: Tier> {
    pub re: ExtendedReal<F, T>,
    pub im: ExtendedReal<F, T>,
}

/// Host-side complex: `f64` pairs, rigorous tier.
pub type HostComplex = ComplexExtended<f64, Rigorous>;

impl<F: NativeFloat, T: Tier> ComplexExtended<F, T> {
    pub const ZERO: Self = Self {
        re: ExtendedReal::ZERO,
        im: ExtendedReal::ZERO,
    };

    #[inline]
    pub const fn new(re: ExtendedReal<F, T>, im: ExtendedReal<F, T>) -> Self {
        Self { re, im }
    }

    #[inline]
    pub fn from_f64(re: f64, im: f64) -> Self {
        Self::new(ExtendedReal::from_f64(re), ExtendedReal::from_f64(im))
    }

    /// Component squares `(re², im²)`. Their sum is `|z|²`.
    #[inline]
    pub fn squares_with(self, splitter: Splitter<F>) -> (ExtendedReal<F, T>, ExtendedReal<F, T>) {
        (self.re.sqr_with(splitter), self.im.sqr_with(splitter))
    }

    /// `z² + c`, reusing the squares from [`squares_with`](Self::squares_with).
    #[inline]
    pub fn sqr_add_with(
        self,
        (re2, im2): (ExtendedReal<F, T>, ExtendedReal<F, T>),
        c: Self,
        splitter: Splitter<F>,
    ) -> Self {
        Self {
            re: (re2 - im2) + c.re,
            im: (self.re + self.re).mul_with(self.im, splitter) + c.im,
        }
    }

    /// Scale both components by an extended real.
    #[inline]
    pub fn scale_with(self, k: ExtendedReal<F, T>, splitter: Splitter<F>) -> Self {
        Self {
            re: self.re.mul_with(k, splitter),
            im: self.im.mul_with(k, splitter),
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// Collapse each component to a single `f64`.
    #[inline]
    pub fn to_f64(self) -> (f64, f64) {
        (self.re.to_f64(), self.im.to_f64())
    }
}

impl<F: NativeFloat, T: Tier> Clone for ComplexExtended<F, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: NativeFloat, T: Tier> Copy for ComplexExtended<F, T> {}

impl<F: NativeFloat, T: Tier> Default for ComplexExtended<F, T> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<F: NativeFloat, T: Tier> PartialEq for ComplexExtended<F, T> {
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re && self.im == other.im
    }
}

impl<F: NativeFloat, T: Tier> std::fmt::Debug for ComplexExtended<F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplexExtended")
            .field("re", &self.re)
            .field("im", &self.im)
            .finish()
    }
}

impl<F: NativeFloat, T: Tier> std::fmt::Display for ComplexExtended<F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {}·i", self.re, self.im)
    }
}

// -- Arithmetic operators --

impl<F: NativeFloat, T: Tier> Add for ComplexExtended<F, T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl<F: NativeFloat, T: Tier> Sub for ComplexExtended<F, T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl<F: NativeFloat, T: Tier> Neg for ComplexExtended<F, T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extended::Partial;

    const EPSILON: f64 = 1e-12;

    fn c(re: f64, im: f64) -> HostComplex {
        HostComplex::from_f64(re, im)
    }

    fn approx_eq(a: HostComplex, b: HostComplex, eps: f64) -> bool {
        let d = a - b;
        d.re.abs().hi < eps && d.im.abs().hi < eps
    }

    #[test]
    fn addition() {
        assert!(approx_eq(c(1.0, 2.0) + c(3.0, 4.0), c(4.0, 6.0), EPSILON));
    }

    #[test]
    fn subtraction() {
        assert!(approx_eq(c(5.0, 3.0) - c(2.0, 1.0), c(3.0, 2.0), EPSILON));
    }

    #[test]
    fn negation() {
        assert!(approx_eq(-c(1.0, -2.0), c(-1.0, 2.0), EPSILON));
    }

    #[test]
    fn squares_sum_to_norm() {
        let (re2, im2) = c(3.0, 4.0).squares_with(Splitter::opaque());
        assert_eq!((re2 + im2).to_f64(), 25.0);
    }

    #[test]
    fn mandelbrot_step() {
        // (0.5 + 0.5i)² + (-0.75 + 0.1i) = -0.75 + 0.6i
        let z = c(0.5, 0.5);
        let s = Splitter::opaque();
        let next = z.sqr_add_with(z.squares_with(s), c(-0.75, 0.1), s);
        assert!(approx_eq(next, c(-0.75, 0.6), EPSILON));
    }

    #[test]
    fn scaling() {
        let k = ExtendedReal::from_native(4.0);
        let s = c(2.0, 3.0).scale_with(k, Splitter::opaque());
        assert!(approx_eq(s, c(8.0, 12.0), EPSILON));
    }

    #[test]
    fn single_precision_pair_step() {
        let z = ComplexExtended::<f32, Partial>::from_f64(0.5, 0.5);
        let cc = ComplexExtended::<f32, Partial>::from_f64(-0.75, 0.1);
        let s = Splitter::opaque();
        let next = z.sqr_add_with(z.squares_with(s), cc, s);
        let (re, im) = next.to_f64();
        assert!((re + 0.75).abs() < 1e-12);
        assert!((im - 0.6).abs() < 1e-12);
    }
}
