use super::error::ModelError;
use itertools::Itertools;
use nalgebra::Point3;

pub type AtomicNumber = u32;

/// A single atom of a molecular template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    /// Position in the same length units as the reciprocal q-vectors.
    pub position: Point3<f64>,
    /// Atomic number; selects the form factor coefficients.
    pub atomic_number: AtomicNumber,
}

impl Atom {
    pub fn new(position: Point3<f64>, atomic_number: AtomicNumber) -> Self {
        Self {
            position,
            atomic_number,
        }
    }
}

/// A rigid molecular template shared, unrotated, by every molecule of an ensemble.
///
/// The structure is validated on construction and immutable afterwards: it is never empty,
/// every atomic number is positive and every coordinate is finite. Center-of-mass handling
/// is expected to have happened upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicStructure {
    atoms: Vec<Atom>,
}

impl AtomicStructure {
    pub fn new(atoms: Vec<Atom>) -> Result<Self, ModelError> {
        if atoms.is_empty() {
            return Err(ModelError::EmptyStructure);
        }
        for (index, atom) in atoms.iter().enumerate() {
            if atom.atomic_number == 0 {
                return Err(ModelError::InvalidAtomicNumber {
                    index,
                    atomic_number: atom.atomic_number,
                });
            }
            if !atom.position.iter().all(|c| c.is_finite()) {
                return Err(ModelError::NonFiniteCoordinate {
                    index,
                    position: [atom.position.x, atom.position.y, atom.position.z],
                });
            }
        }
        Ok(Self { atoms })
    }

    /// Builds a structure from parallel position and atomic number sequences.
    pub fn from_parts(
        positions: &[Point3<f64>],
        atomic_numbers: &[AtomicNumber],
    ) -> Result<Self, ModelError> {
        if positions.len() != atomic_numbers.len() {
            return Err(ModelError::LengthMismatch {
                positions: positions.len(),
                atomic_numbers: atomic_numbers.len(),
            });
        }
        Self::new(
            positions
                .iter()
                .zip(atomic_numbers)
                .map(|(&position, &atomic_number)| Atom::new(position, atomic_number))
                .collect(),
        )
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> + '_ {
        self.atoms.iter().map(|a| &a.position)
    }

    /// Distinct atomic numbers present, in ascending order.
    pub fn species(&self) -> Vec<AtomicNumber> {
        self.atoms
            .iter()
            .map(|a| a.atomic_number)
            .sorted_unstable()
            .dedup()
            .collect()
    }
}
