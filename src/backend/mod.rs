//! Field backend implementations.
//!
//! Only one backend is currently provided: `GfBig`, a portable
//! reference implementation over big integers. It supports any odd
//! prime modulus, which makes it convenient for tests, prototyping and
//! exotic parameter sets, but it is NOT constant-time; a deployment
//! with side-channel requirements replaces it with a limb-based
//! backend implementing the same `GfElement` trait.

mod big;

pub use big::{GfBig, PrimeModulus};
