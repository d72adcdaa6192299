use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "XScatter Developers",
    version,
    about = "xscatter - Predicts X-ray scattering intensities of randomly oriented molecular ensembles.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE, -vvvv adds per-molecule traces)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads of the global worker pool.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate the intensity field of an ensemble and write it as CSV.
    Simulate(SimulateArgs),
    /// Run the reference and accelerated backends on the same ensemble and compare them.
    Check(CheckArgs),
}

/// Inputs shared by every subcommand.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Atom template, one `x y z Z` line per atom.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub structure: PathBuf,

    /// Q-vector grid, one `qx qy qz` line per vector.
    #[arg(short = 'g', long = "q-grid", required = true, value_name = "PATH")]
    pub q_grid: PathBuf,

    /// Orientation seeds, one `u1 u2 u3` line per molecule. Drawn at random when omitted.
    #[arg(short = 'r', long, value_name = "PATH")]
    pub seeds: Option<PathBuf>,

    /// Use only the first N q-vectors of the grid.
    #[arg(long, value_name = "INT")]
    pub num_q: Option<usize>,

    /// Number of molecules in the ensemble.
    #[arg(short, long, value_name = "INT")]
    pub num_molecules: Option<usize>,

    /// Seed of the random generator used when no seed file is given.
    #[arg(long, value_name = "U64")]
    pub rng_seed: Option<u64>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S accelerated.padding=strict
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Overrides for the accelerated backend.
#[derive(Args, Debug, Default)]
pub struct AcceleratedArgs {
    /// Atoms per kernel invocation.
    #[arg(long, value_name = "INT")]
    pub atom_batch_size: Option<usize>,

    /// Molecules per execution block.
    #[arg(long, value_name = "INT")]
    pub molecule_block_size: Option<usize>,

    /// Treatment of atom counts off the batch boundary ('zero-pad' or 'strict').
    #[arg(long, value_name = "POLICY")]
    pub padding: Option<String>,

    /// Run the accelerated backend on a dedicated pool of this many threads.
    #[arg(long, value_name = "NUM")]
    pub accel_threads: Option<usize>,
}

/// Arguments for the `simulate` subcommand.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output CSV path (`qx,qy,qz,intensity`).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Backend to run ('reference' or 'accelerated').
    #[arg(short, long, value_name = "NAME")]
    pub backend: Option<String>,

    #[command(flatten)]
    pub accelerated: AcceleratedArgs,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Relative tolerance of the comparison.
    #[arg(long, value_name = "FLOAT")]
    pub rtol: Option<f64>,

    /// Absolute tolerance of the comparison.
    #[arg(long, value_name = "FLOAT")]
    pub atol: Option<f64>,

    #[command(flatten)]
    pub accelerated: AcceleratedArgs,
}
