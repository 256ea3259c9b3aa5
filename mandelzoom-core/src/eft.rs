//! Error-free transformations over native floats.
//!
//! Every routine here returns a pair `(x, e)` such that `x + e` equals the
//! exact real result. They are the building blocks of [`ExtendedReal`].
//!
//! None of them rely on fused multiply-add: the per-pixel renderer runs on
//! `f32` without FMA guarantees, so products are made exact with a
//! Veltkamp split instead. The split constant depends on the mantissa
//! width of the float actually executing the code and travels as a
//! [`Splitter`] value.
//!
//! Reference: Dekker, "A floating-point technique for extending the
//! available precision" (1971); Shewchuk, "Adaptive Precision
//! Floating-Point Arithmetic" (1997).
//!
//! [`ExtendedReal`]: crate::extended::ExtendedReal

use std::fmt::{Debug, Display, LowerExp};
use std::ops::{Add, Div, Mul, Neg, Sub};

// ---------------------------------------------------------------------------
// Native float abstraction
// ---------------------------------------------------------------------------

/// A hardware float type the compensated routines can run on.
pub trait NativeFloat:
    Copy
    + Debug
    + Display
    + LowerExp
    + Default
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    const ZERO: Self;
    const ONE: Self;

    /// Significand width including the implicit leading bit.
    const MANTISSA_DIGITS: u32;

    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    fn abs(self) -> Self;
    fn is_finite(self) -> bool;

    /// Distance from `|self|` to the next representable float away from zero.
    ///
    /// Zero maps to the smallest subnormal; non-finite inputs map to NaN.
    fn ulp(self) -> Self;

    /// Veltkamp constant `2^⌈W/2⌉ + 1` for this width.
    fn split_constant() -> Self {
        let half = Self::MANTISSA_DIGITS.div_ceil(2);
        Self::from_f64((1u64 << half) as f64 + 1.0)
    }
}

impl NativeFloat for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const MANTISSA_DIGITS: u32 = f32::MANTISSA_DIGITS;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }

    fn ulp(self) -> Self {
        if !self.is_finite() {
            return f32::NAN;
        }
        let a = f32::abs(self);
        let next = f32::from_bits(a.to_bits() + 1);
        if next.is_infinite() {
            return a - f32::from_bits(a.to_bits() - 1);
        }
        next - a
    }
}

impl NativeFloat for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const MANTISSA_DIGITS: u32 = f64::MANTISSA_DIGITS;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }

    fn ulp(self) -> Self {
        if !self.is_finite() {
            return f64::NAN;
        }
        let a = f64::abs(self);
        let next = f64::from_bits(a.to_bits() + 1);
        if next.is_infinite() {
            return a - f64::from_bits(a.to_bits() - 1);
        }
        next - a
    }
}

// ---------------------------------------------------------------------------
// Split constant carrier
// ---------------------------------------------------------------------------

/// The Veltkamp split constant for one native float width.
///
/// Kept as a runtime value so the compiler cannot fold `a * k - (a * k - a)`
/// back into `a`, which would silently destroy the split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splitter<F: NativeFloat> {
    k: F,
}

impl<F: NativeFloat> Splitter<F> {
    /// Wrap an explicit constant (e.g. one received as a frame parameter).
    #[inline]
    pub fn new(k: F) -> Self {
        Self { k }
    }

    /// The constant for `F`, hidden from the optimiser.
    #[inline]
    pub fn opaque() -> Self {
        Self {
            k: std::hint::black_box(F::split_constant()),
        }
    }

    #[inline]
    pub fn constant(self) -> F {
        self.k
    }
}

// ---------------------------------------------------------------------------
// Error-free building blocks
// ---------------------------------------------------------------------------

/// Knuth's TwoSum. Returns `(s, e)` with `s = fl(a + b)` and `s + e = a + b`.
#[inline]
pub fn two_sum<F: NativeFloat>(a: F, b: F) -> (F, F) {
    let s = a + b;
    let v = s - a;
    let e = (a - (s - v)) + (b - v);
    (s, e)
}

/// Dekker's FastTwoSum. Same postcondition as [`two_sum`] but requires
/// `|a| >= |b|` (or `a == 0`).
#[inline]
pub fn quick_two_sum<F: NativeFloat>(a: F, b: F) -> (F, F) {
    let s = a + b;
    let e = b - (s - a);
    (s, e)
}

/// Veltkamp split of `a` into two halves with non-overlapping bits.
#[inline]
pub fn split<F: NativeFloat>(a: F, splitter: Splitter<F>) -> (F, F) {
    let t = a * splitter.k;
    let hi = t - (t - a);
    let lo = a - hi;
    (hi, lo)
}

/// Dekker's TwoProduct. Returns `(p, e)` with `p = fl(a·b)` and `p + e = a·b`.
#[inline]
pub fn two_product<F: NativeFloat>(a: F, b: F, splitter: Splitter<F>) -> (F, F) {
    let p = a * b;
    let (a_hi, a_lo) = split(a, splitter);
    let (b_hi, b_lo) = split(b, splitter);
    let e = a_lo * b_lo - (((p - a_hi * b_hi) - a_lo * b_hi) - a_hi * b_lo);
    (p, e)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
