//! Anycurve is a Rust library for elliptic curve point arithmetic.
//!
//! This library implements group operations on elliptic curves defined
//! over a prime field, for the three usual curve models: short
//! Weierstraß (`y^2 = x^3 + A*x + B`), twisted Edwards
//! (`A*x^2 + y^2 = 1 + B*x^2*y^2`) and Montgomery
//! (`y^2 = x^3 + A*x^2 + x`). A single generic `Point` type covers the
//! three models; the model and the curve constants are a compile-time
//! parameter of the point type (the `CurveParams` trait), so that
//! several curves can coexist in the same process with no global
//! state, and so that the model is resolved once per monomorphized
//! entry point instead of being re-examined inside hot loops.
//!
//! Supported operations are point construction and validation, the
//! complete group law (addition, doubling, Montgomery differential
//! addition), constant-time scalar multiplication (Montgomery ladder
//! and signed fixed-window), joint double-scalar multiplication,
//! cofactor clearing, fixed-format point encoding and decoding, and
//! deterministic hash-to-curve maps (Elligator2 and simplified SWU).
//!
//! Field element arithmetic is abstracted behind the `GfElement` trait
//! (module `field`); the curve code never looks inside a field
//! element. The `backend` module provides a portable reference
//! implementation built on big integers; it is correct for any odd
//! prime modulus but is NOT constant-time, and deployments with
//! side-channel requirements are expected to plug a dedicated
//! limb-based backend behind the same trait.
//!
//! # Conventions
//!
//! All operations on secret data are written to be constant-time at
//! the point level, assuming a constant-time field backend. In order
//! to avoid unwanted side-channel leaks, Booleans are avoided
//! (compilers tend to "optimize" things a bit too eagerly when
//! handling `bool` values). All functions that return or use a
//! potentially secret Boolean value use the `u32` type; the convention
//! is that 0xFFFFFFFF means "true", and 0x00000000 means "false". No
//! other value shall be used, for they would lead to unpredictable
//! results. Similarly, the `Eq` or `PartialEq` traits are not
//! implemented; points are compared with `equals()`.
//!
//! Throughout the code, functions that modify the object on which they
//! are called have a name in `set_*()` (e.g. `P.set_double()` doubles
//! the point in place, while `P.double()` returns the double as a new
//! instance).
//!
//! One residual side channel is documented rather than removed: the
//! loop bound of scalar multiplication is derived from the bit length
//! of the scalar, so the *magnitude* of the scalar (not its value) may
//! leak through timing. Callers that need to hide the magnitude as
//! well must pad or blind the scalar before calling.
//!
//! # Error handling
//!
//! Invalid inputs (off-curve coordinates, unsatisfiable sign requests,
//! malformed or out-of-range encodings, unrecognized encoding tags)
//! never abort; the affected constructor yields the group identity
//! instead, and callers are expected to check `isneutral()`. The
//! `set_*` constructor variants additionally return a `u32` status
//! mask, and `decode()` returns an `Option`, for boundaries that want
//! an explicit failure signal.

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

mod ct;

pub mod backend;
pub mod curve;
pub mod curves;
pub mod field;
pub mod point;
