use super::{Inputs, make_rng};
use crate::cli::SimulateArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use tracing::info;
use xscatter::core::io::intensity::IntensityCsv;
use xscatter::engine::progress::ProgressReporter;
use xscatter::workflows;

pub fn run(args: SimulateArgs, progress_handler: CliProgressHandler) -> Result<()> {
    let inputs = Inputs::load(&args.input)?;

    let partial_config = PartialConfig::load(args.input.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_simulate(&args, inputs.seed_count())?;

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut rng = make_rng(settings.rng_seed);

    println!(
        "Simulating {} molecule(s) on the {} backend...",
        settings.core.num_molecules, settings.core.backend
    );
    let field = workflows::simulate::run(
        &inputs.structure,
        &inputs.q_grid,
        &settings.core,
        inputs.seeds(),
        &mut *rng,
        &reporter,
    )?;

    info!("Writing {} intensities to {:?}", field.len(), &args.output);
    IntensityCsv::write_to_path(&inputs.q_grid, &field, &args.output).map_err(|e| {
        CliError::FileParsing {
            path: args.output.clone(),
            source: e.into(),
        }
    })?;

    println!(
        "✓ Intensity field ({} q-vectors, total {:.6e}) written to: {}",
        field.len(),
        field.total(),
        args.output.display()
    );
    Ok(())
}
