//! Quaternion algebra for orienting molecules.
//!
//! The functions in [`quaternion`] are generic over nalgebra's `RealField`, so the
//! double-precision reference backend and the single-precision accelerated backend share a
//! single implementation of the Shoemake construction and the sandwich-product rotation.

pub mod quaternion;
