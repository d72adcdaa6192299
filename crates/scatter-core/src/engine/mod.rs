//! # Engine Module
//!
//! Turns a template, a q-grid and an ensemble size into an intensity field.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Backend selection, batch sizes, padding policy and tolerances
//! - **Ensemble** ([`ensemble`]) - Resolves every orientation seed before accumulation starts
//! - **Reference backend** ([`reference`]) - Serial, double-precision ground truth
//! - **Accelerated backend** ([`accelerated`]) - Data-parallel, single-precision accumulation
//!   with fixed atom batches and molecule blocks
//! - **Backend abstraction** ([`backend`]) - The [`backend::IntensityBackend`] trait and dispatcher
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! The accelerated backend requires the `parallel` cargo feature (enabled by default).

pub mod accelerated;
pub mod backend;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod progress;
pub mod reference;
