use crate::cli::{AcceleratedArgs, CheckArgs, InputArgs, SimulateArgs};
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;
use xscatter::engine::config::{
    self as core_config, AcceleratedConfig, AtomPaddingPolicy, BackendKind, SimulationConfig,
    SimulationConfigBuilder, Tolerance,
};

pub struct DefaultsConfig {
    pub num_molecules: usize,
    pub backend: BackendKind,
    pub padding: AtomPaddingPolicy,
    pub relative_tolerance: f64,
    pub absolute_tolerance: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            num_molecules: core_config::DEFAULT_MOLECULE_BLOCK_SIZE,
            backend: BackendKind::Reference,
            padding: AtomPaddingPolicy::ZeroPad,
            relative_tolerance: core_config::DEFAULT_RELATIVE_TOLERANCE,
            absolute_tolerance: 0.0,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSimulationConfig {
    num_molecules: Option<usize>,
    backend: Option<String>,
    rng_seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialAcceleratedConfig {
    atom_batch_size: Option<usize>,
    molecule_block_size: Option<usize>,
    padding: Option<String>,
    threads: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialConsistencyConfig {
    relative_tolerance: Option<f64>,
    absolute_tolerance: Option<f64>,
}

/// Configuration as read from a TOML file, every field optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    simulation: Option<PartialSimulationConfig>,
    accelerated: Option<PartialAcceleratedConfig>,
    consistency: Option<PartialConsistencyConfig>,
}

/// Fully resolved settings of the `simulate` subcommand.
#[derive(Debug)]
pub struct SimulateSettings {
    pub core: SimulationConfig,
    pub rng_seed: Option<u64>,
}

/// Fully resolved settings of the `check` subcommand.
#[derive(Debug)]
pub struct CheckSettings {
    pub num_molecules: usize,
    pub accelerated: AcceleratedConfig,
    pub tolerance: Tolerance,
    pub rng_seed: Option<u64>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the molecule count as CLI flag, then config file, then seed-file length,
    /// then the built-in default.
    pub fn merge_simulate(
        mut self,
        args: &SimulateArgs,
        seed_count: Option<usize>,
    ) -> Result<SimulateSettings> {
        self.apply_set_values(&args.input.set_values)?;
        let defaults = DefaultsConfig::default();
        let sim = self.simulation.take().unwrap_or_default();

        let backend = match args.backend.as_deref().or(sim.backend.as_deref()) {
            Some(name) => parse_named::<BackendKind>(name)?,
            None => defaults.backend,
        };
        let num_molecules = Self::resolve_num_molecules(&args.input, &sim, seed_count, &defaults);
        let accelerated = self.merge_accelerated(&args.accelerated, &defaults)?;

        let core = SimulationConfigBuilder::new()
            .num_molecules(num_molecules)
            .backend(backend)
            .accelerated(accelerated)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(SimulateSettings {
            core,
            rng_seed: args.input.rng_seed.or(sim.rng_seed),
        })
    }

    pub fn merge_check(mut self, args: &CheckArgs, seed_count: Option<usize>) -> Result<CheckSettings> {
        self.apply_set_values(&args.input.set_values)?;
        let defaults = DefaultsConfig::default();
        let sim = self.simulation.take().unwrap_or_default();
        let consistency = self.consistency.take().unwrap_or_default();

        let tolerance = Tolerance {
            relative: args
                .rtol
                .or(consistency.relative_tolerance)
                .unwrap_or(defaults.relative_tolerance),
            absolute: args
                .atol
                .or(consistency.absolute_tolerance)
                .unwrap_or(defaults.absolute_tolerance),
        };
        tolerance
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(CheckSettings {
            num_molecules: Self::resolve_num_molecules(&args.input, &sim, seed_count, &defaults),
            accelerated: self.merge_accelerated(&args.accelerated, &defaults)?,
            tolerance,
            rng_seed: args.input.rng_seed.or(sim.rng_seed),
        })
    }

    fn resolve_num_molecules(
        input: &InputArgs,
        sim: &PartialSimulationConfig,
        seed_count: Option<usize>,
        defaults: &DefaultsConfig,
    ) -> usize {
        input
            .num_molecules
            .or(sim.num_molecules)
            .or(seed_count)
            .unwrap_or(defaults.num_molecules)
    }

    fn merge_accelerated(
        &mut self,
        args: &AcceleratedArgs,
        defaults: &DefaultsConfig,
    ) -> Result<AcceleratedConfig> {
        let partial = self.accelerated.take().unwrap_or_default();
        let fallback = AcceleratedConfig::default();

        let padding = match args.padding.as_deref().or(partial.padding.as_deref()) {
            Some(name) => parse_named::<AtomPaddingPolicy>(name)?,
            None => defaults.padding,
        };
        let config = AcceleratedConfig {
            atom_batch_size: args
                .atom_batch_size
                .or(partial.atom_batch_size)
                .unwrap_or(fallback.atom_batch_size),
            molecule_block_size: args
                .molecule_block_size
                .or(partial.molecule_block_size)
                .unwrap_or(fallback.molecule_block_size),
            padding,
            num_threads: args.accel_threads.or(partial.threads),
        };
        config
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "simulation.num-molecules" => {
                    self.simulation
                        .get_or_insert_with(Default::default)
                        .num_molecules = Some(parse_value(key, value_str)?);
                }
                "simulation.backend" => {
                    self.simulation.get_or_insert_with(Default::default).backend =
                        Some(value_str.to_string());
                }
                "simulation.rng-seed" => {
                    self.simulation.get_or_insert_with(Default::default).rng_seed =
                        Some(parse_value(key, value_str)?);
                }
                "accelerated.atom-batch-size" => {
                    self.accelerated
                        .get_or_insert_with(Default::default)
                        .atom_batch_size = Some(parse_value(key, value_str)?);
                }
                "accelerated.molecule-block-size" => {
                    self.accelerated
                        .get_or_insert_with(Default::default)
                        .molecule_block_size = Some(parse_value(key, value_str)?);
                }
                "accelerated.padding" => {
                    self.accelerated.get_or_insert_with(Default::default).padding =
                        Some(value_str.to_string());
                }
                "accelerated.threads" => {
                    self.accelerated.get_or_insert_with(Default::default).threads =
                        Some(parse_value(key, value_str)?);
                }
                "consistency.relative-tolerance" => {
                    self.consistency
                        .get_or_insert_with(Default::default)
                        .relative_tolerance = Some(parse_value(key, value_str)?);
                }
                "consistency.absolute-tolerance" => {
                    self.consistency
                        .get_or_insert_with(Default::default)
                        .absolute_tolerance = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value_str)))
}

fn parse_named<T>(name: &str) -> Result<T>
where
    T: FromStr<Err = core_config::ConfigError>,
{
    name.parse().map_err(|e: core_config::ConfigError| CliError::Argument(e.to_string()))
}
