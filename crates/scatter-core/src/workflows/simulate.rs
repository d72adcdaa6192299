use crate::core::models::intensity::IntensityField;
use crate::core::models::orientation::OrientationSeed;
use crate::core::models::qgrid::QGrid;
use crate::core::models::structure::AtomicStructure;
use crate::engine::backend::backend_for;
use crate::engine::config::{SimulationConfig, SimulationConfigBuilder};
use crate::engine::ensemble::Ensemble;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rand::{Rng, thread_rng};
use tracing::{info, instrument};

/// Simulates the intensity of `num_molecules` randomly oriented copies of `template` on the
/// reference backend.
///
/// When `seeds` is `None` the orientations are drawn from the thread-local generator.
pub fn simulate(
    template: &AtomicStructure,
    q_grid: &QGrid,
    num_molecules: usize,
    seeds: Option<&[OrientationSeed]>,
) -> Result<IntensityField, EngineError> {
    let config = SimulationConfigBuilder::new()
        .num_molecules(num_molecules)
        .build()?;
    run(
        template,
        q_grid,
        &config,
        seeds,
        &mut thread_rng(),
        &ProgressReporter::new(),
    )
}

/// Simulates the intensity field with the backend selected in `config`.
///
/// Seeds are validated, or drawn from `rng`, before any accumulation starts. An ensemble of
/// zero molecules yields an all-zero field.
#[instrument(skip_all, name = "simulate_workflow", fields(backend = %config.backend, molecules = config.num_molecules))]
pub fn run<R: Rng + ?Sized>(
    template: &AtomicStructure,
    q_grid: &QGrid,
    config: &SimulationConfig,
    seeds: Option<&[OrientationSeed]>,
    rng: &mut R,
    reporter: &ProgressReporter,
) -> Result<IntensityField, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let backend = backend_for(config)?;
    let ensemble = Ensemble::new(template, config.num_molecules, seeds, rng)?;
    info!(
        atoms = template.len(),
        q_vectors = q_grid.len(),
        seeds_supplied = seeds.is_some(),
        "Ensemble prepared."
    );
    reporter.report(Progress::PhaseFinish);

    if ensemble.is_empty() {
        info!("Empty ensemble; returning a zero intensity field.");
        return Ok(IntensityField::zeros(q_grid.len()));
    }

    reporter.report(Progress::PhaseStart {
        name: "Accumulation",
    });
    let field = backend.accumulate(&ensemble, q_grid, reporter)?;
    reporter.report(Progress::PhaseFinish);

    info!(total = field.total(), "Simulation finished.");
    Ok(field)
}
