//! # Core Module
//!
//! Fundamental building blocks shared by every backend: the molecular and detector data
//! models, the quaternion algebra used to orient molecules, the atomic form factor model and
//! the text formats used to load inputs and store results.
//!
//! ## Architecture
//!
//! - **Mathematics** ([`math`]) - Quaternion algebra generic over `f32` and `f64`
//! - **Scattering Physics** ([`scattering`]) - Cromer-Mann atomic form factors
//! - **Data Models** ([`models`]) - Atomic templates, q-vector grids, orientation seeds and
//!   intensity fields, with construction-time validation
//! - **File I/O** ([`io`]) - Whitespace-delimited tables and CSV intensity output
//!
//! Nothing in this layer holds mutable global state; every function is either pure or
//! operates on values it owns.

pub mod io;
pub mod math;
pub mod models;
pub mod scattering;
