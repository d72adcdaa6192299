//! # Data Models Module
//!
//! Value types flowing through a simulation run.
//!
//! - [`structure`] - `Atom` and the rigid `AtomicStructure` template
//! - [`qgrid`] - The detector's momentum-transfer vectors
//! - [`orientation`] - Orientation seeds, their validation and drawing from a random source
//! - [`intensity`] - The accumulated `IntensityField`
//! - [`error`] - Validation failures raised while constructing any of the above
//!
//! Every constructor validates its input, so downstream code never re-checks emptiness,
//! atomic numbers or finiteness.

pub mod error;
pub mod intensity;
pub mod orientation;
pub mod qgrid;
pub mod structure;
