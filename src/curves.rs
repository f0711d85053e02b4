//! Shipped curve parameter sets.
//!
//! Each curve is a unit marker type implementing `CurveParams`; the
//! base fields get their own marker types implementing `PrimeModulus`
//! (Edwards25519 and Curve25519 share GF(2^255-19)). Values are the
//! standard ones from SEC 2, FIPS 186-4, RFC 7748 and RFC 8032.

use std::sync::OnceLock;

use num_bigint::BigUint;

use crate::backend::{GfBig, PrimeModulus};
use crate::curve::{CurveParams, CurveShape, NonResidue};
use crate::field::GfElement;

/// The field GF(2^256 - 2^32 - 977) (base field of secp256k1).
pub struct GfSecp256k1;

/// The field GF(2^256 - 2^224 + 2^192 + 2^96 - 1) (base field of P-256).
pub struct GfP256;

/// The field GF(2^255 - 19) (base field of Curve25519/Edwards25519).
pub struct Gf25519;

const SECP256K1_P: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFC, 0x2F,
];

const SECP256K1_N: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
    0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

const SECP256K1_GX: [u8; 32] = [
    0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC,
    0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B, 0x07,
    0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9,
    0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8, 0x17, 0x98,
];

const SECP256K1_GY: [u8; 32] = [
    0x48, 0x3A, 0xDA, 0x77, 0x26, 0xA3, 0xC4, 0x65,
    0x5D, 0xA4, 0xFB, 0xFC, 0x0E, 0x11, 0x08, 0xA8,
    0xFD, 0x17, 0xB4, 0x48, 0xA6, 0x85, 0x54, 0x19,
    0x9C, 0x47, 0xD0, 0x8F, 0xFB, 0x10, 0xD4, 0xB8,
];

const P256_P: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

const P256_N: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xBC, 0xE6, 0xFA, 0xAD, 0xA7, 0x17, 0x9E, 0x84,
    0xF3, 0xB9, 0xCA, 0xC2, 0xFC, 0x63, 0x25, 0x51,
];

const P256_B: [u8; 32] = [
    0x5A, 0xC6, 0x35, 0xD8, 0xAA, 0x3A, 0x93, 0xE7,
    0xB3, 0xEB, 0xBD, 0x55, 0x76, 0x98, 0x86, 0xBC,
    0x65, 0x1D, 0x06, 0xB0, 0xCC, 0x53, 0xB0, 0xF6,
    0x3B, 0xCE, 0x3C, 0x3E, 0x27, 0xD2, 0x60, 0x4B,
];

const P256_GX: [u8; 32] = [
    0x6B, 0x17, 0xD1, 0xF2, 0xE1, 0x2C, 0x42, 0x47,
    0xF8, 0xBC, 0xE6, 0xE5, 0x63, 0xA4, 0x40, 0xF2,
    0x77, 0x03, 0x7D, 0x81, 0x2D, 0xEB, 0x33, 0xA0,
    0xF4, 0xA1, 0x39, 0x45, 0xD8, 0x98, 0xC2, 0x96,
];

const P256_GY: [u8; 32] = [
    0x4F, 0xE3, 0x42, 0xE2, 0xFE, 0x1A, 0x7F, 0x9B,
    0x8E, 0xE7, 0xEB, 0x4A, 0x7C, 0x0F, 0x9E, 0x16,
    0x2B, 0xCE, 0x33, 0x57, 0x6B, 0x31, 0x5E, 0xCE,
    0xCB, 0xB6, 0x40, 0x68, 0x37, 0xBF, 0x51, 0xF5,
];

// Order of the prime subgroup of Curve25519 and Edwards25519
// (2^252 + 27742317777372353535851937790883648493).
const C25519_L: [u8; 32] = [
    0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x14, 0xDE, 0xF9, 0xDE, 0xA2, 0xF7, 0x9C, 0xD6,
    0x58, 0x12, 0x63, 0x1A, 0x5C, 0xF5, 0xD3, 0xED,
];

// Edwards25519 constant d = -121665/121666.
const ED25519_D: [u8; 32] = [
    0x52, 0x03, 0x6C, 0xEE, 0x2B, 0x6F, 0xFE, 0x73,
    0x8C, 0xC7, 0x40, 0x79, 0x77, 0x79, 0xE8, 0x98,
    0x00, 0x70, 0x0A, 0x4D, 0x41, 0x41, 0xD8, 0xAB,
    0x75, 0xEB, 0x4D, 0xCA, 0x13, 0x59, 0x78, 0xA3,
];

const ED25519_GX: [u8; 32] = [
    0x21, 0x69, 0x36, 0xD3, 0xCD, 0x6E, 0x53, 0xFE,
    0xC0, 0xA4, 0xE2, 0x31, 0xFD, 0xD6, 0xDC, 0x5C,
    0x69, 0x2C, 0xC7, 0x60, 0x95, 0x25, 0xA7, 0xB2,
    0xC9, 0x56, 0x2D, 0x60, 0x8F, 0x25, 0xD5, 0x1A,
];

// 4/5 in the field.
const ED25519_GY: [u8; 32] = [
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x58,
];

impl PrimeModulus for GfSecp256k1 {
    fn prime() -> &'static BigUint {
        static P: OnceLock<BigUint> = OnceLock::new();
        P.get_or_init(|| BigUint::from_bytes_be(&SECP256K1_P))
    }
}

impl PrimeModulus for GfP256 {
    fn prime() -> &'static BigUint {
        static P: OnceLock<BigUint> = OnceLock::new();
        P.get_or_init(|| BigUint::from_bytes_be(&P256_P))
    }
}

impl PrimeModulus for Gf25519 {
    fn prime() -> &'static BigUint {
        static P: OnceLock<BigUint> = OnceLock::new();
        P.get_or_init(|| {
            (BigUint::from(1u32) << 255u32) - BigUint::from(19u32)
        })
    }
}

/// The secp256k1 curve (SEC 2): `y^2 = x^3 + 7`.
pub struct Secp256k1;

impl CurveParams for Secp256k1 {
    type F = GfBig<GfSecp256k1>;
    const SHAPE: CurveShape = CurveShape::Weierstrass;
    const A_I: i64 = 0;
    const B_I: i64 = 7;
    const COFACTOR_I: u64 = 1;
    const QNR: NonResidue = NonResidue::MinusOne;

    fn modulus() -> BigUint {
        GfSecp256k1::prime().clone()
    }

    fn order() -> BigUint {
        BigUint::from_bytes_be(&SECP256K1_N)
    }

    fn gx() -> Self::F {
        GfElement::from_big(&BigUint::from_bytes_be(&SECP256K1_GX))
    }

    fn gy() -> Self::F {
        GfElement::from_big(&BigUint::from_bytes_be(&SECP256K1_GY))
    }
}

/// The NIST P-256 curve (FIPS 186-4): `y^2 = x^3 - 3*x + b`.
pub struct NistP256;

impl CurveParams for NistP256 {
    type F = GfBig<GfP256>;
    const SHAPE: CurveShape = CurveShape::Weierstrass;
    const A_I: i64 = -3;
    const B_I: i64 = 0;
    const COFACTOR_I: u64 = 1;
    const QNR: NonResidue = NonResidue::MinusOne;

    fn modulus() -> BigUint {
        GfP256::prime().clone()
    }

    fn order() -> BigUint {
        BigUint::from_bytes_be(&P256_N)
    }

    fn gx() -> Self::F {
        GfElement::from_big(&BigUint::from_bytes_be(&P256_GX))
    }

    fn gy() -> Self::F {
        GfElement::from_big(&BigUint::from_bytes_be(&P256_GY))
    }

    fn b() -> Self::F {
        GfElement::from_big(&BigUint::from_bytes_be(&P256_B))
    }
}

/// The Edwards25519 curve (RFC 8032): `-x^2 + y^2 = 1 + d*x^2*y^2`.
pub struct Ed25519;

impl CurveParams for Ed25519 {
    type F = GfBig<Gf25519>;
    const SHAPE: CurveShape = CurveShape::Edwards;
    const A_I: i64 = -1;
    const B_I: i64 = 0;
    const COFACTOR_I: u64 = 8;
    const QNR: NonResidue = NonResidue::Two;

    fn modulus() -> BigUint {
        Gf25519::prime().clone()
    }

    fn order() -> BigUint {
        BigUint::from_bytes_be(&C25519_L)
    }

    fn gx() -> Self::F {
        GfElement::from_big(&BigUint::from_bytes_be(&ED25519_GX))
    }

    fn gy() -> Self::F {
        GfElement::from_big(&BigUint::from_bytes_be(&ED25519_GY))
    }

    fn b() -> Self::F {
        GfElement::from_big(&BigUint::from_bytes_be(&ED25519_D))
    }
}

/// The Curve25519 curve (RFC 7748): `y^2 = x^3 + 486662*x^2 + x`.
pub struct Curve25519;

impl CurveParams for Curve25519 {
    type F = GfBig<Gf25519>;
    const SHAPE: CurveShape = CurveShape::Montgomery;
    const A_I: i64 = 486662;
    const B_I: i64 = 0;
    const COFACTOR_I: u64 = 8;
    const QNR: NonResidue = NonResidue::Two;

    fn modulus() -> BigUint {
        Gf25519::prime().clone()
    }

    fn order() -> BigUint {
        BigUint::from_bytes_be(&C25519_L)
    }

    fn gx() -> Self::F {
        GfElement::from_small(9)
    }

    fn gy() -> Self::F {
        GfElement::zero()
    }
}

// ========================================================================

#[cfg(test)]
mod tests {

    use num_bigint::BigUint;

    use super::*;

    #[test]
    fn residue_classes() {
        // QNR choices must match the modulus residue class.
        assert_eq!(&Secp256k1::modulus() % BigUint::from(4u32),
            BigUint::from(3u32));
        assert_eq!(&NistP256::modulus() % BigUint::from(4u32),
            BigUint::from(3u32));
        assert_eq!(&Ed25519::modulus() % BigUint::from(8u32),
            BigUint::from(5u32));
    }

    #[test]
    fn field_sizes() {
        assert_eq!(Secp256k1::modulus().bits(), 256);
        assert_eq!(NistP256::modulus().bits(), 256);
        assert_eq!(Curve25519::modulus().bits(), 255);
        assert!(Secp256k1::order() < Secp256k1::modulus());
        assert!(Ed25519::order() < Ed25519::modulus());
    }
}
