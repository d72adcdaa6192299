//! # Scattering Physics Module
//!
//! Atomic scattering amplitudes for the molecular structure factor.
//!
//! [`form_factor`] holds the Cromer-Mann coefficient table and the single formula evaluated
//! by both intensity backends. Atomic numbers without a table entry are handled by an
//! explicit, named nitrogen approximation rather than by guessing better physics, so
//! results stay reproducible across backends and releases.

pub mod form_factor;
