use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Atomic structure contains no atoms")]
    EmptyStructure,

    #[error("Q-vector grid contains no vectors")]
    EmptyQGrid,

    #[error(
        "Position count ({positions}) does not match atomic number count ({atomic_numbers})"
    )]
    LengthMismatch {
        positions: usize,
        atomic_numbers: usize,
    },

    #[error("Atom {index} has invalid atomic number {atomic_number}; atomic numbers must be positive")]
    InvalidAtomicNumber { index: usize, atomic_number: u32 },

    #[error("Atom {index} has a non-finite coordinate: {position:?}")]
    NonFiniteCoordinate { index: usize, position: [f64; 3] },

    #[error("Q-vector {index} has a non-finite component: {vector:?}")]
    NonFiniteQVector { index: usize, vector: [f64; 3] },

    #[error("{supplied} orientation seed(s) supplied but {required} molecule(s) requested")]
    InsufficientSeeds { required: usize, supplied: usize },

    #[error("Structure has {count} distinct species; at most {limit} are supported")]
    TooManySpecies { count: usize, limit: usize },

    #[error("Orientation seed {index} has component {value} outside [0, 1)")]
    SeedOutOfRange { index: usize, value: f64 },
}
