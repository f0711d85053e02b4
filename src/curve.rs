//! Curve model and parameter set definitions.
//!
//! A curve is described at the type level: a unit marker type
//! implements `CurveParams`, and `Point<C>` then carries the full
//! configuration in its type. There is no global curve state; any
//! number of curves can be used side by side, and the model tag is an
//! associated constant, so `match C::SHAPE` arms are resolved when the
//! point type is monomorphized rather than tested inside hot loops.

use num_bigint::BigUint;

use crate::field::GfElement;

/// The three supported curve models.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveShape {
    /// `y^2 = x^3 + A*x + B`
    Weierstrass,
    /// `A*x^2 + y^2 = 1 + B*x^2*y^2` (A is 1 or -1)
    Edwards,
    /// `y^2 = x^3 + A*x^2 + x`
    Montgomery,
}

/// Designated non-residue family of the base field.
///
/// The Elligator2 map multiplies a square by a fixed quadratic
/// non-residue of the field; which one is cheapest depends on the
/// residue class of the modulus. For p = 3 mod 4 the value -1 works;
/// for p = 5 mod 8 the value 2 works; other fields designate some
/// small non-residue explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NonResidue {
    MinusOne,
    Two,
    Small(i64),
}

/// Compile-time description of a curve.
///
/// `A_I` and `B_I` give the curve coefficients when they fit a small
/// integer; a parameter set whose B does not fit (e.g. P-256, or the
/// Edwards `d` constant) sets `B_I = 0` and overrides `b()`. `a()` and
/// `b()` are what the formulas consume; the small-integer mirrors only
/// enable fast paths.
///
/// `COFACTOR_I` is the curve cofactor when small (1, 4 or 8 on all
/// shipped sets); a set with a larger cofactor sets it to 0 and
/// overrides `cofactor()`.
pub trait CurveParams: 'static {

    /// Base field implementation.
    type F: GfElement;

    /// Curve model.
    const SHAPE: CurveShape;

    /// Curve coefficient A, as a small integer.
    const A_I: i64;

    /// Curve coefficient B, as a small integer (0 if not small).
    const B_I: i64;

    /// Curve cofactor, as a small integer (0 if not small).
    const COFACTOR_I: u64;

    /// Non-residue family used by the hash-to-curve maps.
    const QNR: NonResidue;

    /// Base field modulus.
    fn modulus() -> BigUint;

    /// Order of the prime subgroup generated by the base point.
    fn order() -> BigUint;

    /// x coordinate of the conventional base point.
    fn gx() -> Self::F;

    /// y coordinate of the conventional base point (unused for
    /// Montgomery curves).
    fn gy() -> Self::F;

    /// Curve coefficient A as a field element.
    fn a() -> Self::F {
        <Self::F as GfElement>::from_small(Self::A_I)
    }

    /// Curve coefficient B as a field element.
    fn b() -> Self::F {
        <Self::F as GfElement>::from_small(Self::B_I)
    }

    /// Curve cofactor.
    fn cofactor() -> BigUint {
        BigUint::from(Self::COFACTOR_I)
    }
}
