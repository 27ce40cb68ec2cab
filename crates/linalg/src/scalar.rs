//! Scalar abstraction over real and complex floating point values.

use std::fmt::Debug;
use std::ops::{AddAssign, DivAssign, MulAssign, Neg, SubAssign};

use ndarray::LinalgScalar;
use num_complex::Complex64;

/// Field element the dense kernels operate on.
///
/// Implemented for `f64` (Jacobians, decision rules) and `Complex64`
/// (generalized Schur factors).
pub trait Scalar:
    LinalgScalar
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + PartialEq
    + Debug
    + Send
    + Sync
{
    /// Absolute value (`|z|` for complex values).
    fn modulus(self) -> f64;

    /// Complex conjugate; identity for real values.
    fn conj(self) -> Self;

    /// Embeds a real number.
    fn from_real(re: f64) -> Self;

    /// Returns `true` if no component is NaN or infinite.
    fn is_finite(self) -> bool;
}

impl Scalar for f64 {
    #[inline]
    fn modulus(self) -> f64 {
        self.abs()
    }

    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn from_real(re: f64) -> Self {
        re
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl Scalar for Complex64 {
    #[inline]
    fn modulus(self) -> f64 {
        self.norm()
    }

    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }

    #[inline]
    fn from_real(re: f64) -> Self {
        Complex64::new(re, 0.0)
    }

    #[inline]
    fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}
