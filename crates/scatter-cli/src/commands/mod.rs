pub mod check;
pub mod simulate;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng, thread_rng};
use std::path::Path;
use tracing::info;
use xscatter::core::io::text::{QGridFile, SeedFile, StructureFile};
use xscatter::core::io::traits::TableFile;
use xscatter::core::models::orientation::OrientationSeed;
use xscatter::core::models::qgrid::QGrid;
use xscatter::core::models::structure::AtomicStructure;

/// Everything a subcommand reads from disk.
pub struct Inputs {
    pub structure: AtomicStructure,
    pub q_grid: QGrid,
    pub seeds: Option<Vec<OrientationSeed>>,
}

impl Inputs {
    pub fn load(args: &InputArgs) -> Result<Self> {
        info!("Loading atom template from {:?}", &args.structure);
        let structure = read_table::<StructureFile>(&args.structure)?;

        info!("Loading q-vector grid from {:?}", &args.q_grid);
        let mut q_grid = read_table::<QGridFile>(&args.q_grid)?;
        if let Some(n) = args.num_q {
            q_grid = q_grid
                .truncated(n)
                .map_err(|e| CliError::Argument(format!("--num-q {n}: {e}")))?;
        }

        let seeds = match &args.seeds {
            Some(path) => {
                info!("Loading orientation seeds from {:?}", path);
                Some(read_table::<SeedFile>(path)?)
            }
            None => None,
        };

        info!(
            atoms = structure.len(),
            species = ?structure.species(),
            q_vectors = q_grid.len(),
            "Inputs loaded."
        );
        Ok(Self {
            structure,
            q_grid,
            seeds,
        })
    }

    pub fn seed_count(&self) -> Option<usize> {
        self.seeds.as_ref().map(Vec::len)
    }

    pub fn seeds(&self) -> Option<&[OrientationSeed]> {
        self.seeds.as_deref()
    }
}

pub fn read_table<F: TableFile>(path: &Path) -> Result<F::Output> {
    F::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// A reproducible generator when a seed is configured, the thread-local one otherwise.
pub fn make_rng(rng_seed: Option<u64>) -> Box<dyn RngCore> {
    match rng_seed {
        Some(seed) => {
            info!(seed, "Using seeded random generator.");
            Box::new(StdRng::seed_from_u64(seed))
        }
        None => Box::new(thread_rng()),
    }
}
