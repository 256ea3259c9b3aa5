use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::eft::{quick_two_sum, two_product, two_sum, NativeFloat, Splitter};

/// An unevaluated sum `hi + lo` of two native floats.
///
/// With `F = f64` this carries ~31 significant decimal digits, with
/// `F = f32` ~14. The invariant `|lo| ≤ ½·ulp(hi)` holds after every
/// operation.
///
/// `T` selects the compensation tier: [`Partial`] is the cheaper one-pass
/// scheme used per pixel, [`Rigorous`] tracks more error terms and is the
/// reference behaviour. Both tiers are deterministic: the same inputs and
/// split constant always produce the same bits.
///
/// Reference: Hida, Li, Bailey — "Library for Double-Double and Quad-Double
/// Arithmetic" (2001).
pub struct ExtendedReal<F: NativeFloat, T: Tier> {
    pub hi: F,
    pub lo: F,
    tier: PhantomData<T>,
}

/// Host-side extended real: `f64` pair, rigorous tier.
pub type HostReal = ExtendedReal<f64, Rigorous>;

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Runtime tag for a compensation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionTier {
    Partial,
    #[default]
    Rigorous,
}

impl PrecisionTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Partial => "partial",
            Self::Rigorous => "rigorous",
        }
    }
}

/// A compensation scheme for pair arithmetic on `(hi, lo)` components.
pub trait Tier: Copy + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    const KIND: PrecisionTier;

    fn add<F: NativeFloat>(a: (F, F), b: (F, F)) -> (F, F);

    fn mul<F: NativeFloat>(a: (F, F), b: (F, F), splitter: Splitter<F>) -> (F, F);
}

/// One-pass compensation: the low parts are folded into the high-part
/// rounding error before a single renormalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Partial;

/// Full compensation: high and low parts are summed independently and
/// carries are propagated with two renormalisations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rigorous;

impl Tier for Partial {
    const KIND: PrecisionTier = PrecisionTier::Partial;

    #[inline]
    fn add<F: NativeFloat>(a: (F, F), b: (F, F)) -> (F, F) {
        let (s, e) = two_sum(a.0, b.0);
        let e = e + a.1 + b.1;
        quick_two_sum(s, e)
    }

    #[inline]
    fn mul<F: NativeFloat>(a: (F, F), b: (F, F), splitter: Splitter<F>) -> (F, F) {
        let (p, p_err) = two_product(a.0, b.0, splitter);
        let cross = a.0 * b.1 + a.1 * b.0;
        let (t, t_err) = two_sum(p, cross);
        let t_err = a.1 * b.1 + t_err + p_err;
        quick_two_sum(t, t_err)
    }
}

impl Tier for Rigorous {
    const KIND: PrecisionTier = PrecisionTier::Rigorous;

    #[inline]
    fn add<F: NativeFloat>(a: (F, F), b: (F, F)) -> (F, F) {
        let (s1, s2) = two_sum(a.0, b.0);
        let (t1, t2) = two_sum(a.1, b.1);
        let s2 = s2 + t1;
        let (s1, s2) = quick_two_sum(s1, s2);
        let s2 = s2 + t2;
        quick_two_sum(s1, s2)
    }

    /// `lo·lo` is dropped: it sits below the precision of the result.
    #[inline]
    fn mul<F: NativeFloat>(a: (F, F), b: (F, F), splitter: Splitter<F>) -> (F, F) {
        let (p1, p2) = two_product(a.0, b.0, splitter);
        let p2 = p2 + (a.0 * b.1 + a.1 * b.0);
        quick_two_sum(p1, p2)
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl<F: NativeFloat, T: Tier> ExtendedReal<F, T> {
    pub const ZERO: Self = Self {
        hi: F::ZERO,
        lo: F::ZERO,
        tier: PhantomData,
    };

    /// Build from raw components. The caller guarantees normalisation;
    /// use [`from_parts`](Self::from_parts) otherwise.
    #[inline]
    pub const fn new(hi: F, lo: F) -> Self {
        Self {
            hi,
            lo,
            tier: PhantomData,
        }
    }

    /// Build from two arbitrary floats, renormalising their sum.
    #[inline]
    pub fn from_parts(a: F, b: F) -> Self {
        let (hi, lo) = two_sum(a, b);
        Self::new(hi, lo)
    }

    #[inline]
    pub fn from_native(v: F) -> Self {
        Self::new(v, F::ZERO)
    }

    /// Nearest pair to an `f64` value. Exact for `F = f64`; for `F = f32`
    /// the residual of the first rounding lands in `lo`.
    #[inline]
    pub fn from_f64(v: f64) -> Self {
        let hi = F::from_f64(v);
        let lo = F::from_f64(v - hi.to_f64());
        let (hi, lo) = quick_two_sum(hi, lo);
        Self::new(hi, lo)
    }

    /// The combined value as a single `f64` (loses bits for `F = f64`).
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.hi.to_f64() + self.lo.to_f64()
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.hi < F::ZERO || (self.hi == F::ZERO && self.lo < F::ZERO)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.hi.is_finite() && self.lo.is_finite()
    }

    #[inline]
    pub fn abs(self) -> Self {
        if self.is_negative() {
            -self
        } else {
            self
        }
    }

    /// Whether `|lo| ≤ ½·ulp(hi)`.
    pub fn is_normalized(self) -> bool {
        if self.hi == F::ZERO {
            return self.lo == F::ZERO;
        }
        let half_ulp = self.hi.ulp() * F::from_f64(0.5);
        self.lo.abs() <= half_ulp
    }

    // -- Arithmetic with an explicit split constant --

    #[inline]
    pub fn mul_with(self, rhs: Self, splitter: Splitter<F>) -> Self {
        let (hi, lo) = T::mul((self.hi, self.lo), (rhs.hi, rhs.lo), splitter);
        Self::new(hi, lo)
    }

    #[inline]
    pub fn sqr_with(self, splitter: Splitter<F>) -> Self {
        self.mul_with(self, splitter)
    }

    /// Multiply by a native scalar.
    #[inline]
    pub fn mul_native(self, rhs: F, splitter: Splitter<F>) -> Self {
        self.mul_with(Self::from_native(rhs), splitter)
    }

    /// Long division with two correction steps (host-side helper).
    pub fn div_with(self, rhs: Self, splitter: Splitter<F>) -> Self {
        let q1 = self.hi / rhs.hi;
        let r = self - rhs.mul_native(q1, splitter);
        let q2 = r.hi / rhs.hi;
        let r = r - rhs.mul_native(q2, splitter);
        let q3 = r.hi / rhs.hi;
        let (q1, q2) = quick_two_sum(q1, q2);
        Self::new(q1, q2) + Self::from_native(q3)
    }
}

impl<F: NativeFloat> ExtendedReal<F, Rigorous> {
    /// Narrow an `f64` pair into the nearest pair of `F` components.
    ///
    /// For `F = f32` this is how host-precision coordinates are handed to the
    /// single-precision renderer: `hi` is `round(v)` and `lo` carries the
    /// next ~24 bits of the residual.
    pub fn narrow(v: HostReal) -> Self {
        let hi = F::from_f64(v.hi);
        let rest = HostReal::from_parts(v.hi - hi.to_f64(), v.lo);
        let lo = F::from_f64(rest.hi);
        let (hi, lo) = quick_two_sum(hi, lo);
        Self::new(hi, lo)
    }
}

// ---------------------------------------------------------------------------
// Trait impls (manual so `T` needs no bounds beyond `Tier`)
// ---------------------------------------------------------------------------

impl<F: NativeFloat, T: Tier> Clone for ExtendedReal<F, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: NativeFloat, T: Tier> Copy for ExtendedReal<F, T> {}

impl<F: NativeFloat, T: Tier> Default for ExtendedReal<F, T> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<F: NativeFloat, T: Tier> fmt::Debug for ExtendedReal<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedReal")
            .field("hi", &self.hi)
            .field("lo", &self.lo)
            .field("tier", &T::KIND)
            .finish()
    }
}

impl<F: NativeFloat, T: Tier> fmt::Display for ExtendedReal<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:e} + {:e})", self.hi, self.lo)
    }
}

impl<F: NativeFloat, T: Tier> From<F> for ExtendedReal<F, T> {
    #[inline]
    fn from(v: F) -> Self {
        Self::from_native(v)
    }
}

impl<F: NativeFloat, T: Tier> PartialEq for ExtendedReal<F, T> {
    fn eq(&self, other: &Self) -> bool {
        self.hi == other.hi && self.lo == other.lo
    }
}

impl<F: NativeFloat, T: Tier> PartialOrd for ExtendedReal<F, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.hi.partial_cmp(&other.hi) {
            Some(Ordering::Equal) => self.lo.partial_cmp(&other.lo),
            ord => ord,
        }
    }
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

impl<F: NativeFloat, T: Tier> Add for ExtendedReal<F, T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let (hi, lo) = T::add((self.hi, self.lo), (rhs.hi, rhs.lo));
        Self::new(hi, lo)
    }
}

impl<F: NativeFloat, T: Tier> AddAssign for ExtendedReal<F, T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: NativeFloat, T: Tier> Sub for ExtendedReal<F, T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<F: NativeFloat, T: Tier> SubAssign for ExtendedReal<F, T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<F: NativeFloat, T: Tier> Neg for ExtendedReal<F, T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.hi, -self.lo)
    }
}

/// Multiplication with the native split constant. Hot loops that receive
/// the constant from elsewhere use [`ExtendedReal::mul_with`] instead.
impl<F: NativeFloat, T: Tier> Mul for ExtendedReal<F, T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_with(rhs, Splitter::opaque())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
