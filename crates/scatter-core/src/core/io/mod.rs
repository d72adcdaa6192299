//! # File I/O Module
//!
//! Plain-text exchange formats for simulation inputs and outputs.
//!
//! Inputs are whitespace-delimited numeric tables read through the [`traits::TableFile`]
//! trait: atom templates ([`text::StructureFile`]), q-vector grids ([`text::QGridFile`]) and
//! orientation seed lists ([`text::SeedFile`]). Results are written as CSV by
//! [`intensity::IntensityCsv`].
//!
//! Binary crystallographic formats, HDF5 experiment descriptors and detector geometry are
//! handled by other tools; this module only covers what a simulation run consumes and
//! produces directly.

pub mod error;
pub mod intensity;
pub mod text;
pub mod traits;
