//! Data-parallel, single-precision intensity accumulation.
//!
//! A run is cut into molecule blocks of [`AcceleratedConfig::molecule_block_size`]
//! molecules; inside a block every (molecule, q-vector) pair is an independent work unit
//! that sums the complex amplitude of the template over atom batches of
//! [`AcceleratedConfig::atom_batch_size`] atoms. Units fold into per-thread partial fields,
//! which are reduced into the block partial and then into the final field.
//!
//! - [`batching`] validates counts against the configured sizes and decides padding.
//! - [`staging`] builds the per-species coefficient table and the padded f32 template.
//! - [`kernel`] evaluates one work unit.

pub mod batching;
#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
pub mod kernel;
pub mod staging;

use super::config::AcceleratedConfig;
use super::ensemble::Ensemble;
use super::error::EngineError;
use super::progress::ProgressReporter;
use crate::core::models::intensity::IntensityField;
use crate::core::models::qgrid::QGrid;

#[cfg(feature = "parallel")]
use {
    super::progress::Progress,
    crate::core::math::quaternion::random_unit_quaternion,
    batching::BatchLayout,
    kernel::Kernel,
    nalgebra::{Quaternion, Vector3},
    rayon::prelude::*,
    staging::StagedTemplate,
    tracing::{debug, info, instrument},
};

const BACKEND_NAME: &str = "accelerated";

pub struct AcceleratedBackend {
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    config: AcceleratedConfig,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl AcceleratedBackend {
    /// Prepares the backend, building a dedicated worker pool when
    /// [`AcceleratedConfig::num_threads`] is set.
    ///
    /// Fails with [`EngineError::BackendUnavailable`] when the crate was built without the
    /// `parallel` feature or the pool cannot be created.
    pub fn new(config: AcceleratedConfig) -> Result<Self, EngineError> {
        config.validate()?;

        #[cfg(not(feature = "parallel"))]
        {
            Err(EngineError::BackendUnavailable {
                backend: BACKEND_NAME,
                reason: "built without the `parallel` feature".to_string(),
            })
        }

        #[cfg(feature = "parallel")]
        {
            let pool = config
                .num_threads
                .map(|threads| {
                    rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .thread_name(|i| format!("xscatter-accel-{i}"))
                        .build()
                        .map_err(|e| EngineError::BackendUnavailable {
                            backend: BACKEND_NAME,
                            reason: format!("failed to build a {threads}-thread pool: {e}"),
                        })
                })
                .transpose()?;
            Ok(Self { config, pool })
        }
    }

    #[cfg(not(feature = "parallel"))]
    pub fn accumulate(
        &self,
        _ensemble: &Ensemble<'_>,
        _q_grid: &QGrid,
        _reporter: &ProgressReporter,
    ) -> Result<IntensityField, EngineError> {
        Err(EngineError::BackendUnavailable {
            backend: BACKEND_NAME,
            reason: "built without the `parallel` feature".to_string(),
        })
    }

    #[cfg(feature = "parallel")]
    #[instrument(skip_all, name = "accelerated_accumulate", fields(molecules = ensemble.len(), q_vectors = q_grid.len()))]
    pub fn accumulate(
        &self,
        ensemble: &Ensemble<'_>,
        q_grid: &QGrid,
        reporter: &ProgressReporter,
    ) -> Result<IntensityField, EngineError> {
        let layout = BatchLayout::plan(ensemble.template().len(), ensemble.len(), &self.config)?;
        let staged = StagedTemplate::stage(ensemble.template(), &layout)?;
        info!(
            atom_batches = layout.atom_batches(),
            padding_atoms = layout.padding_atoms(),
            molecule_blocks = layout.molecule_blocks(),
            species = staged.species.species_count(),
            "Accelerated layout planned."
        );

        let q_vectors: Vec<Vector3<f32>> = q_grid
            .vectors()
            .iter()
            .map(|q| q.map(|c| c as f32))
            .collect();
        let form_factors: Vec<Vec<f32>> = q_vectors
            .iter()
            .map(|q| staged.species.form_factors_at(q))
            .collect();
        let orientations: Vec<Quaternion<f32>> = ensemble
            .seeds()
            .iter()
            .map(|seed| random_unit_quaternion(seed.map(|u| u as f32)))
            .collect();

        let kernel = Kernel::new(&staged, &q_vectors, &form_factors, layout.atom_batch_size);
        let n_q = q_grid.len();

        reporter.report(Progress::TaskStart {
            total_steps: layout.molecule_blocks() as u64,
        });

        let run = || {
            orientations
                .par_chunks(layout.molecule_block_size)
                .map(|block| {
                    let partial = accumulate_block(&kernel, block);
                    reporter.report(Progress::TaskIncrement);
                    IntensityField::from_values(partial.into_iter().map(f64::from).collect())
                })
                .reduce(
                    || IntensityField::zeros(n_q),
                    |mut total, partial| {
                        total += &partial;
                        total
                    },
                )
        };
        let field = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        reporter.report(Progress::TaskFinish);
        debug!(total = field.total(), "Accelerated accumulation finished.");
        Ok(field)
    }
}

/// Intensity of one molecule block, one f32 entry per q-vector.
#[cfg(feature = "parallel")]
fn accumulate_block(kernel: &Kernel<'_>, block: &[Quaternion<f32>]) -> Vec<f32> {
    let n_q = kernel.q_count();
    let rotated: Vec<Vec<Vector3<f32>>> = block
        .par_iter()
        .map(|orientation| kernel.rotate_template(orientation))
        .collect();

    (0..block.len() * n_q)
        .into_par_iter()
        .fold(
            || vec![0.0_f32; n_q],
            |mut partial, unit| {
                let (molecule, q_index) = (unit / n_q, unit % n_q);
                partial[q_index] += kernel.unit_intensity(&rotated[molecule], q_index);
                partial
            },
        )
        .reduce(
            || vec![0.0_f32; n_q],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            },
        )
}
