use super::accelerated::AcceleratedBackend;
use super::config::{BackendKind, SimulationConfig};
use super::ensemble::Ensemble;
use super::error::EngineError;
use super::progress::ProgressReporter;
use super::reference;
use crate::core::models::intensity::IntensityField;
use crate::core::models::qgrid::QGrid;

/// An implementation of intensity accumulation over an oriented ensemble.
///
/// Implementations must agree with [`ReferenceBackend`] within the consistency tolerance.
pub trait IntensityBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn accumulate(
        &self,
        ensemble: &Ensemble<'_>,
        q_grid: &QGrid,
        reporter: &ProgressReporter,
    ) -> Result<IntensityField, EngineError>;
}

/// Serial double-precision backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceBackend;

impl IntensityBackend for ReferenceBackend {
    fn name(&self) -> &'static str {
        BackendKind::Reference.name()
    }

    fn accumulate(
        &self,
        ensemble: &Ensemble<'_>,
        q_grid: &QGrid,
        reporter: &ProgressReporter,
    ) -> Result<IntensityField, EngineError> {
        Ok(reference::accumulate(ensemble, q_grid, reporter))
    }
}

impl IntensityBackend for AcceleratedBackend {
    fn name(&self) -> &'static str {
        BackendKind::Accelerated.name()
    }

    fn accumulate(
        &self,
        ensemble: &Ensemble<'_>,
        q_grid: &QGrid,
        reporter: &ProgressReporter,
    ) -> Result<IntensityField, EngineError> {
        AcceleratedBackend::accumulate(self, ensemble, q_grid, reporter)
    }
}

/// Instantiates the backend selected by `config`.
pub fn backend_for(config: &SimulationConfig) -> Result<Box<dyn IntensityBackend>, EngineError> {
    Ok(match config.backend {
        BackendKind::Reference => Box::new(ReferenceBackend),
        BackendKind::Accelerated => Box::new(AcceleratedBackend::new(config.accelerated)?),
    })
}
