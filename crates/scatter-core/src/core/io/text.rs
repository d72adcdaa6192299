use super::error::IoError;
use super::traits::TableFile;
use crate::core::models::orientation::{OrientationSeed, validate_seeds};
use crate::core::models::qgrid::QGrid;
use crate::core::models::structure::{Atom, AtomicNumber, AtomicStructure};
use nalgebra::{Point3, Vector3};

/// Atom template table: `x y z Z` per line, the atomic number written as a number.
pub struct StructureFile;

/// Q-vector table: `qx qy qz` per line.
pub struct QGridFile;

/// Orientation seed table: `u1 u2 u3` per line, each in `[0, 1)`.
pub struct SeedFile;

impl TableFile for StructureFile {
    type Output = AtomicStructure;
    const COLUMNS: usize = 4;

    fn from_rows(rows: Vec<Vec<f64>>) -> Result<AtomicStructure, IoError> {
        let atoms = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let atomic_number = parse_atomic_number(row[3])
                    .ok_or(IoError::AtomicNumber { index, value: row[3] })?;
                Ok(Atom::new(Point3::new(row[0], row[1], row[2]), atomic_number))
            })
            .collect::<Result<Vec<_>, IoError>>()?;
        Ok(AtomicStructure::new(atoms)?)
    }
}

impl TableFile for QGridFile {
    type Output = QGrid;
    const COLUMNS: usize = 3;

    fn from_rows(rows: Vec<Vec<f64>>) -> Result<QGrid, IoError> {
        Ok(QGrid::new(
            rows.iter()
                .map(|row| Vector3::new(row[0], row[1], row[2]))
                .collect(),
        )?)
    }
}

impl TableFile for SeedFile {
    type Output = Vec<OrientationSeed>;
    const COLUMNS: usize = 3;

    fn from_rows(rows: Vec<Vec<f64>>) -> Result<Vec<OrientationSeed>, IoError> {
        let seeds: Vec<OrientationSeed> = rows.iter().map(|row| [row[0], row[1], row[2]]).collect();
        validate_seeds(&seeds, seeds.len())?;
        Ok(seeds)
    }
}

fn parse_atomic_number(value: f64) -> Option<AtomicNumber> {
    let valid = value.is_finite()
        && value.fract() == 0.0
        && value >= 1.0
        && value <= AtomicNumber::MAX as f64;
    valid.then_some(value as AtomicNumber)
}
