//! # Workflows Module
//!
//! High-level entry points that tie the `engine` and `core` layers together.
//!
//! - **Simulation** ([`simulate`]) - Predicted intensity of a randomly oriented ensemble on a
//!   chosen backend.
//! - **Consistency** ([`consistency`]) - Runs the reference and accelerated backends on the
//!   same ensemble and checks that they agree within a tolerance.

pub mod consistency;
pub mod simulate;
