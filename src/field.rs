//! Prime field element contract.
//!
//! The curve code is generic over the base field implementation; this
//! module defines the trait that a field backend must provide. The
//! `backend` module contains a portable reference implementation; a
//! deployment with side-channel requirements substitutes a dedicated
//! constant-time backend behind the same trait.

use num_bigint::BigUint;

/// An element of the prime field GF(p) underlying a curve.
///
/// Implementations are free to keep elements in a redundant internal
/// representation between operations; `set_normalize()` must bring the
/// element back to its canonical form, and `equals()`, `iszero()`,
/// `parity()`, `sign()` and `to_big()` must behave as if the element
/// had been normalized first.
///
/// Status and selection values follow the crate-wide mask convention:
/// `u32` with value 0xFFFFFFFF for "true" and 0x00000000 for "false".
/// On a constant-time backend, `set_cond()`, `cswap()`, `equals()` and
/// `iszero()` must not branch on, or index memory by, their operands.
pub trait GfElement: Clone + core::fmt::Debug {

    /// Returns the additive identity.
    fn zero() -> Self;

    /// Returns the multiplicative identity.
    fn one() -> Self;

    /// Builds an element from a small signed integer (reduced modulo p).
    fn from_small(v: i64) -> Self;

    /// Builds an element from a non-negative big integer (reduced
    /// modulo p).
    fn from_big(v: &BigUint) -> Self;

    /// Returns the canonical value of this element, in the 0 to p-1
    /// range.
    fn to_big(&self) -> BigUint;

    fn add(&self, rhs: &Self) -> Self;

    fn sub(&self, rhs: &Self) -> Self;

    fn neg(&self) -> Self;

    fn mul(&self, rhs: &Self) -> Self;

    fn square(&self) -> Self;

    /// Halves this element (multiplication by the inverse of 2).
    fn half(&self) -> Self;

    /// Multiplies this element by a small signed integer.
    fn mul_small(&self, v: i64) -> Self;

    /// Inverts this element; the inverse of zero is zero.
    fn invert(&self) -> Self;

    /// Reduces the internal representation to canonical form.
    fn set_normalize(&mut self);

    /// Returns 0xFFFFFFFF if this element is zero, 0x00000000 otherwise.
    fn iszero(&self) -> u32;

    /// Returns 0xFFFFFFFF if the two elements are equal, 0x00000000
    /// otherwise.
    fn equals(&self, rhs: &Self) -> u32;

    /// Returns the least significant bit of the canonical value (0 or 1).
    fn parity(&self) -> u32;

    /// Returns the "sign" of this element (0 or 1), defined as the
    /// parity of the canonical value.
    fn sign(&self) -> u32 {
        self.parity()
    }

    /// Quadratic residue test.
    ///
    /// Returns 0xFFFFFFFF if this element is a square in the field
    /// (zero counts as a square), 0x00000000 otherwise. If `hint` is
    /// provided then it receives backend-defined data from which a
    /// subsequent `sqrt()` of the same element can be completed
    /// cheaply.
    fn qr(&self, hint: Option<&mut Self>) -> u32;

    /// Square root.
    ///
    /// If this element is a square, returns a root `r` with
    /// `r.sign() == 0`, together with 0xFFFFFFFF; otherwise returns
    /// (zero, 0x00000000). A `hint` previously filled by `qr()` on the
    /// same element lets the backend skip the expensive part of the
    /// computation.
    fn sqrt(&self, hint: Option<&Self>) -> (Self, u32);

    /// Conditionally replaces this element with `rhs`.
    ///
    /// Value `ctl` MUST be 0xFFFFFFFF (replace) or 0x00000000 (keep).
    fn set_cond(&mut self, rhs: &Self, ctl: u32);

    /// Conditionally swaps two elements.
    ///
    /// Value `ctl` MUST be 0xFFFFFFFF (swap) or 0x00000000 (keep).
    fn cswap(a: &mut Self, b: &mut Self, ctl: u32);
}
