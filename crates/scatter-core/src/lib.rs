//! # XScatter Core Library
//!
//! A library for simulating coherent elastic X-ray scattering from an ensemble of identical,
//! randomly oriented molecules, producing the intensity a detector would record at each
//! momentum-transfer vector.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that the numerical model, the
//! accumulation machinery and the user-facing entry points can evolve independently.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomicStructure`, `QGrid`,
//!   `IntensityField`), pure mathematics (quaternion algebra, Cromer-Mann form factors) and
//!   plain-text I/O for templates, q-grids and orientation seeds.
//!
//! - **[`engine`]: The Accumulation Core.** The orientation ensemble generator and the two
//!   intensity backends: a serial double-precision reference and a data-parallel
//!   single-precision accelerated implementation with fixed-size atom batches and molecule
//!   blocks.
//!
//! - **[`workflows`]: The Public API.** The `simulate` operation and the consistency harness
//!   that cross-checks the accelerated backend against the reference.

pub mod core;
pub mod engine;
pub mod workflows;
