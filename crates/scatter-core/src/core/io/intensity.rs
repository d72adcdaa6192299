use super::error::IoError;
use crate::core::models::intensity::IntensityField;
use crate::core::models::qgrid::QGrid;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

/// One row of an intensity CSV: the q-vector and the intensity recorded there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityRecord {
    pub qx: f64,
    pub qy: f64,
    pub qz: f64,
    pub intensity: f64,
}

/// CSV exchange format for simulated intensities, with a `qx,qy,qz,intensity` header.
pub struct IntensityCsv;

impl IntensityCsv {
    pub fn write_to(
        q_grid: &QGrid,
        field: &IntensityField,
        writer: &mut impl Write,
    ) -> Result<(), IoError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for (q, &intensity) in q_grid.vectors().iter().zip(field.iter()) {
            csv_writer.serialize(IntensityRecord {
                qx: q.x,
                qy: q.y,
                qz: q.z,
                intensity,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(
        q_grid: &QGrid,
        field: &IntensityField,
        path: P,
    ) -> Result<(), IoError> {
        let mut file = std::fs::File::create(path)?;
        Self::write_to(q_grid, field, &mut file)
    }

    pub fn read_from(reader: impl Read) -> Result<Vec<IntensityRecord>, IoError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        csv_reader
            .deserialize::<IntensityRecord>()
            .map(|record| record.map_err(IoError::from))
            .collect()
    }
}
