use super::{Inputs, make_rng};
use crate::cli::CheckArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use tracing::info;
use xscatter::engine::progress::ProgressReporter;
use xscatter::workflows::consistency::ConsistencyHarness;

/// Fails with the worst tolerance violation when the backends disagree.
pub fn run(args: CheckArgs, progress_handler: CliProgressHandler) -> Result<()> {
    let inputs = Inputs::load(&args.input)?;

    let partial_config = PartialConfig::load(args.input.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_check(&args, inputs.seed_count())?;

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut rng = make_rng(settings.rng_seed);
    let harness = ConsistencyHarness::new(settings.tolerance)?;

    println!(
        "Comparing reference and accelerated backends on {} molecule(s)...",
        settings.num_molecules
    );
    let report = harness.run(
        &inputs.structure,
        &inputs.q_grid,
        settings.num_molecules,
        inputs.seeds(),
        &settings.accelerated,
        &mut *rng,
        &reporter,
    )?;

    println!(
        "  q-vectors: {}, violations: {}, max relative deviation: {:.3e} (rtol {:.1e}, atol {:.1e})",
        report.deviations.len(),
        report.violations().count(),
        report.max_relative_deviation(),
        settings.tolerance.relative,
        settings.tolerance.absolute,
    );
    report.into_result()?;

    println!("✓ Backends agree within tolerance.");
    Ok(())
}
