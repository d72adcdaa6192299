use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Atoms processed per accelerated kernel invocation.
pub const DEFAULT_ATOM_BATCH_SIZE: usize = 512;
/// Molecules per accelerated execution block.
pub const DEFAULT_MOLECULE_BLOCK_SIZE: usize = 512;
/// Relative tolerance of the reference/accelerated consistency check.
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Serial, double-precision ground truth.
    #[default]
    Reference,
    /// Data-parallel, single-precision implementation with fixed batch sizes.
    Accelerated,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Accelerated => "accelerated",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reference" | "cpu" => Ok(Self::Reference),
            "accelerated" | "parallel" => Ok(Self::Accelerated),
            _ => Err(ConfigError::UnknownVariant {
                kind: "backend",
                value: s.to_string(),
            }),
        }
    }
}

/// How the accelerated backend treats atom counts that are not a multiple of its batch size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtomPaddingPolicy {
    /// Pad the last batch with atoms whose form factor is identically zero.
    #[default]
    ZeroPad,
    /// Reject the structure with `UnsupportedBatchSize`.
    Strict,
}

impl FromStr for AtomPaddingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero-pad" | "zeropad" | "pad" => Ok(Self::ZeroPad),
            "strict" => Ok(Self::Strict),
            _ => Err(ConfigError::UnknownVariant {
                kind: "padding policy",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceleratedConfig {
    pub atom_batch_size: usize,
    pub molecule_block_size: usize,
    pub padding: AtomPaddingPolicy,
    /// Size of a dedicated worker pool; `None` runs on the current rayon pool.
    pub num_threads: Option<usize>,
}

impl Default for AcceleratedConfig {
    fn default() -> Self {
        Self {
            atom_batch_size: DEFAULT_ATOM_BATCH_SIZE,
            molecule_block_size: DEFAULT_MOLECULE_BLOCK_SIZE,
            padding: AtomPaddingPolicy::default(),
            num_threads: None,
        }
    }
}

impl AcceleratedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.atom_batch_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "atom_batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.atom_batch_size > u16::MAX as usize {
            return Err(ConfigError::InvalidParameter {
                name: "atom_batch_size",
                reason: format!("must not exceed {}", u16::MAX),
            });
        }
        if self.molecule_block_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "molecule_block_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.num_threads == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "num_threads",
                reason: "must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }
}

/// Acceptance band for comparing accelerated output against the reference.
///
/// A value passes when `|accelerated - reference| <= absolute + relative * |reference|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub relative: f64,
    pub absolute: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relative: DEFAULT_RELATIVE_TOLERANCE,
            absolute: 0.0,
        }
    }
}

impl Tolerance {
    pub fn relative(relative: f64) -> Self {
        Self {
            relative,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("relative_tolerance", self.relative),
            ("absolute_tolerance", self.absolute),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be a finite non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn accepts(&self, reference: f64, candidate: f64) -> bool {
        (candidate - reference).abs() <= self.absolute + self.relative * reference.abs()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub num_molecules: usize,
    pub backend: BackendKind,
    pub accelerated: AcceleratedConfig,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    num_molecules: Option<usize>,
    backend: Option<BackendKind>,
    accelerated: Option<AcceleratedConfig>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_molecules(mut self, n: usize) -> Self {
        self.num_molecules = Some(n);
        self
    }
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = Some(backend);
        self
    }
    pub fn accelerated(mut self, config: AcceleratedConfig) -> Self {
        self.accelerated = Some(config);
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let accelerated = self.accelerated.unwrap_or_default();
        accelerated.validate()?;
        Ok(SimulationConfig {
            num_molecules: self
                .num_molecules
                .ok_or(ConfigError::MissingParameter("num_molecules"))?,
            backend: self.backend.unwrap_or_default(),
            accelerated,
        })
    }
}
