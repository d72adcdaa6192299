use crate::engine::config::{AcceleratedConfig, AtomPaddingPolicy};
use crate::engine::error::{BatchDimension, EngineError};
use tracing::warn;

/// How a run is cut into atom batches and molecule blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLayout {
    pub atom_count: usize,
    pub padded_atom_count: usize,
    pub atom_batch_size: usize,
    pub molecule_count: usize,
    pub molecule_block_size: usize,
}

impl BatchLayout {
    /// Checks `atom_count` and `molecule_count` against the configured sizes.
    ///
    /// Molecules are never padded: a count that is not a multiple of the block size is
    /// rejected. Atoms are padded up to the next batch boundary with null-form-factor atoms
    /// under [`AtomPaddingPolicy::ZeroPad`] and rejected under [`AtomPaddingPolicy::Strict`].
    pub fn plan(
        atom_count: usize,
        molecule_count: usize,
        config: &AcceleratedConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let batch = config.atom_batch_size;
        let block = config.molecule_block_size;

        if molecule_count % block != 0 {
            return Err(EngineError::UnsupportedBatchSize {
                dimension: BatchDimension::Molecules,
                count: molecule_count,
                batch_size: block,
            });
        }

        let padded_atom_count = match (atom_count % batch, config.padding) {
            (0, _) => atom_count,
            (_, AtomPaddingPolicy::Strict) => {
                return Err(EngineError::UnsupportedBatchSize {
                    dimension: BatchDimension::Atoms,
                    count: atom_count,
                    batch_size: batch,
                });
            }
            (_, AtomPaddingPolicy::ZeroPad) => {
                let padded = atom_count.div_ceil(batch) * batch;
                warn!(
                    atom_count,
                    padded_atom_count = padded,
                    atom_batch_size = batch,
                    "Atom count is not a multiple of the batch size; padding with null atoms."
                );
                padded
            }
        };

        Ok(Self {
            atom_count,
            padded_atom_count,
            atom_batch_size: batch,
            molecule_count,
            molecule_block_size: block,
        })
    }

    pub fn atom_batches(&self) -> usize {
        self.padded_atom_count / self.atom_batch_size
    }

    pub fn padding_atoms(&self) -> usize {
        self.padded_atom_count - self.atom_count
    }

    pub fn molecule_blocks(&self) -> usize {
        self.molecule_count / self.molecule_block_size
    }
}
