use super::batching::BatchLayout;
use crate::core::models::error::ModelError;
use crate::core::models::structure::{AtomicNumber, AtomicStructure};
use crate::core::scattering::form_factor::{
    CromerMann, FormFactorSource, evaluate_coefficients, lookup,
};
use crate::engine::error::EngineError;
use nalgebra::Vector3;
use tracing::{debug, warn};

pub type SpeciesIndex = u16;
pub type StagedCoefficients = [f32; CromerMann::COEFFICIENT_COUNT];

/// Single-precision Cromer-Mann coefficients for each distinct species of a template.
///
/// The last slot is the null species: all coefficients zero, so its form factor vanishes
/// at every q. Padding atoms point at it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesTable {
    atomic_numbers: Vec<AtomicNumber>,
    coefficients: Vec<StagedCoefficients>,
}

impl SpeciesTable {
    pub fn from_structure(structure: &AtomicStructure) -> Result<Self, EngineError> {
        let atomic_numbers = structure.species();
        // One index past the last species is reserved for the null slot.
        let limit = SpeciesIndex::MAX as usize;
        if atomic_numbers.len() > limit {
            return Err(ModelError::TooManySpecies {
                count: atomic_numbers.len(),
                limit,
            }
            .into());
        }

        let mut coefficients = Vec::with_capacity(atomic_numbers.len() + 1);
        for &z in &atomic_numbers {
            let (params, source) = lookup(z);
            if source == FormFactorSource::NitrogenApproximation {
                warn!(
                    atomic_number = z,
                    "No tabulated form factor; using the nitrogen approximation."
                );
            }
            coefficients.push(params.to_array().map(|c| c as f32));
        }
        coefficients.push([0.0; CromerMann::COEFFICIENT_COUNT]);

        debug!(species = atomic_numbers.len(), "Species coefficients staged.");
        Ok(Self {
            atomic_numbers,
            coefficients,
        })
    }

    pub fn species_count(&self) -> usize {
        self.atomic_numbers.len()
    }

    pub fn null_index(&self) -> SpeciesIndex {
        self.atomic_numbers.len() as SpeciesIndex
    }

    pub fn index_of(&self, atomic_number: AtomicNumber) -> Option<SpeciesIndex> {
        self.atomic_numbers
            .binary_search(&atomic_number)
            .ok()
            .map(|i| i as SpeciesIndex)
    }

    /// Form factor of every slot, null slot included, at `q`.
    pub fn form_factors_at(&self, q: &Vector3<f32>) -> Vec<f32> {
        self.coefficients
            .iter()
            .map(|c| evaluate_coefficients(c, q))
            .collect()
    }
}

/// A template laid out for the kernel: f32 positions and compact species indices, padded
/// to a whole number of atom batches.
#[derive(Debug, Clone)]
pub struct StagedTemplate {
    pub species: SpeciesTable,
    pub positions: Vec<Vector3<f32>>,
    pub species_indices: Vec<SpeciesIndex>,
}

impl StagedTemplate {
    pub fn stage(structure: &AtomicStructure, layout: &BatchLayout) -> Result<Self, EngineError> {
        let species = SpeciesTable::from_structure(structure)?;
        let null = species.null_index();

        let mut positions = Vec::with_capacity(layout.padded_atom_count);
        let mut species_indices = Vec::with_capacity(layout.padded_atom_count);
        for atom in structure.atoms() {
            positions.push(atom.position.coords.map(|c| c as f32));
            species_indices.push(species.index_of(atom.atomic_number).unwrap_or(null));
        }
        positions.resize(layout.padded_atom_count, Vector3::zeros());
        species_indices.resize(layout.padded_atom_count, null);

        Ok(Self {
            species,
            positions,
            species_indices,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
