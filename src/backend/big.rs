//! Portable reference field implementation.
//!
//! `GfBig<M>` implements the `GfElement` contract for the odd prime
//! modulus designated by the marker type `M`. Values are kept fully
//! reduced at all times, so `set_normalize()` is a no-op. All
//! arithmetic goes through `num-bigint`, which allocates and branches
//! freely: this backend is NOT constant-time and must not be used
//! where timing side channels matter. The conditional move and swap
//! entry points honor their functional contract only.

use core::marker::PhantomData;

use num_bigint::BigUint;

use crate::field::GfElement;

/// Designates a prime modulus at the type level.
///
/// The returned reference must always point to the same value; it is
/// typically backed by a `OnceLock` in the implementing marker type.
/// The modulus must be an odd prime; this is not checked.
pub trait PrimeModulus: 'static {
    fn prime() -> &'static BigUint;
}

/// An element of GF(p) for the modulus selected by `M`.
pub struct GfBig<M: PrimeModulus> {
    v: BigUint,
    _m: PhantomData<M>,
}

impl<M: PrimeModulus> GfBig<M> {

    fn make(v: BigUint) -> Self {
        Self { v, _m: PhantomData }
    }

    fn p() -> &'static BigUint {
        M::prime()
    }

    fn is0(v: &BigUint) -> bool {
        v.bits() == 0
    }

    // Square root by exponentiation (p = 3 mod 4) or Tonelli-Shanks
    // (general case). Returns the candidate root without verifying
    // that the input was a square; callers check r^2 == v.
    fn sqrt_candidate(v: &BigUint) -> BigUint {
        let p = Self::p();
        let one = BigUint::from(1u32);
        if Self::is0(v) {
            return BigUint::from(0u32);
        }
        if p.bit(0) && p.bit(1) {
            // p = 3 mod 4: v^((p+1)/4)
            let e = (p + &one) >> 2u32;
            return v.modpow(&e, p);
        }

        // Tonelli-Shanks. Write p-1 = q*2^s with q odd.
        let mut q = p - &one;
        let mut s = 0u32;
        while !q.bit(0) {
            q >>= 1u32;
            s += 1;
        }

        // Find a non-residue z by trying small values.
        let pm1 = p - &one;
        let h = &pm1 >> 1u32;
        let mut z = BigUint::from(2u32);
        while z.modpow(&h, p) != pm1 {
            z += 1u32;
        }

        let mut m = s;
        let mut c = z.modpow(&q, p);
        let mut t = v.modpow(&q, p);
        let mut r = v.modpow(&((&q + &one) >> 1u32), p);
        while t != one {
            // Least i with t^(2^i) == 1.
            let mut i = 0u32;
            let mut tt = t.clone();
            while tt != one {
                tt = (&tt * &tt) % p;
                i += 1;
                if i == m {
                    // Not a square; any value will fail the caller's
                    // verification.
                    return BigUint::from(0u32);
                }
            }
            let mut b = c.clone();
            for _ in 0..(m - i - 1) {
                b = (&b * &b) % p;
            }
            m = i;
            c = (&b * &b) % p;
            t = (&t * &c) % p;
            r = (&r * &b) % p;
        }
        r
    }
}

impl<M: PrimeModulus> Clone for GfBig<M> {
    fn clone(&self) -> Self {
        Self::make(self.v.clone())
    }
}

impl<M: PrimeModulus> core::fmt::Debug for GfBig<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "0x{:x}", self.v)
    }
}

impl<M: PrimeModulus> GfElement for GfBig<M> {

    fn zero() -> Self {
        Self::make(BigUint::from(0u32))
    }

    fn one() -> Self {
        Self::make(BigUint::from(1u32))
    }

    fn from_small(v: i64) -> Self {
        let p = Self::p();
        let a = BigUint::from(v.unsigned_abs()) % p;
        if v < 0 && !Self::is0(&a) {
            Self::make(p - a)
        } else {
            Self::make(a)
        }
    }

    fn from_big(v: &BigUint) -> Self {
        Self::make(v % Self::p())
    }

    fn to_big(&self) -> BigUint {
        self.v.clone()
    }

    fn add(&self, rhs: &Self) -> Self {
        Self::make((&self.v + &rhs.v) % Self::p())
    }

    fn sub(&self, rhs: &Self) -> Self {
        Self::make(((Self::p() + &self.v) - &rhs.v) % Self::p())
    }

    fn neg(&self) -> Self {
        if Self::is0(&self.v) {
            Self::zero()
        } else {
            Self::make(Self::p() - &self.v)
        }
    }

    fn mul(&self, rhs: &Self) -> Self {
        Self::make((&self.v * &rhs.v) % Self::p())
    }

    fn square(&self) -> Self {
        self.mul(self)
    }

    fn half(&self) -> Self {
        if self.v.bit(0) {
            Self::make((&self.v + Self::p()) >> 1u32)
        } else {
            Self::make(&self.v >> 1u32)
        }
    }

    fn mul_small(&self, v: i64) -> Self {
        self.mul(&Self::from_small(v))
    }

    fn invert(&self) -> Self {
        // v^(p-2); the inverse of zero is zero.
        let p = Self::p();
        let e = p - BigUint::from(2u32);
        Self::make(self.v.modpow(&e, p))
    }

    fn set_normalize(&mut self) {
        // Values are kept reduced at all times.
    }

    fn iszero(&self) -> u32 {
        if Self::is0(&self.v) { 0xFFFFFFFF } else { 0 }
    }

    fn equals(&self, rhs: &Self) -> u32 {
        if self.v == rhs.v { 0xFFFFFFFF } else { 0 }
    }

    fn parity(&self) -> u32 {
        self.v.bit(0) as u32
    }

    fn qr(&self, hint: Option<&mut Self>) -> u32 {
        let p = Self::p();
        let r = if Self::is0(&self.v) {
            0xFFFFFFFF
        } else {
            let h = (p - BigUint::from(1u32)) >> 1u32;
            let e = self.v.modpow(&h, p);
            if e == BigUint::from(1u32) { 0xFFFFFFFF } else { 0 }
        };
        if let Some(h) = hint {
            // The hint is the root itself; sqrt() then only has to
            // verify and sign-normalize it.
            h.v = if r != 0 {
                Self::sqrt_candidate(&self.v)
            } else {
                BigUint::from(0u32)
            };
        }
        r
    }

    fn sqrt(&self, hint: Option<&Self>) -> (Self, u32) {
        let r = match hint {
            Some(h) => h.v.clone(),
            None => Self::sqrt_candidate(&self.v),
        };
        let p = Self::p();
        if (&r * &r) % p != self.v {
            return (Self::zero(), 0);
        }
        // Return the root of even parity.
        let r = if r.bit(0) { p - r } else { r };
        (Self::make(r), 0xFFFFFFFF)
    }

    fn set_cond(&mut self, rhs: &Self, ctl: u32) {
        if ctl != 0 {
            self.v = rhs.v.clone();
        }
    }

    fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
        if ctl != 0 {
            core::mem::swap(&mut a.v, &mut b.v);
        }
    }
}

// ========================================================================
