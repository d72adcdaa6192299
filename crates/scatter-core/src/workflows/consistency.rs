use crate::core::models::intensity::IntensityField;
use crate::core::models::orientation::OrientationSeed;
use crate::core::models::qgrid::QGrid;
use crate::core::models::structure::AtomicStructure;
use crate::engine::accelerated::AcceleratedBackend;
use crate::engine::backend::{IntensityBackend, ReferenceBackend};
use crate::engine::config::{AcceleratedConfig, Tolerance};
use crate::engine::ensemble::Ensemble;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rand::Rng;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Simulation failed: {0}")]
    Simulation(#[from] EngineError),

    #[error(
        "Accelerated intensity {accelerated} deviates from reference {reference} at q-vector {index} (relative error {relative_error:.3e}, tolerance {tolerance:.1e})"
    )]
    ToleranceViolation {
        index: usize,
        reference: f64,
        accelerated: f64,
        relative_error: f64,
        tolerance: f64,
    },
}

/// Reference and accelerated intensity at one q-vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    pub index: usize,
    pub reference: f64,
    pub accelerated: f64,
    pub within_tolerance: bool,
}

impl Deviation {
    pub fn absolute_error(&self) -> f64 {
        (self.accelerated - self.reference).abs()
    }

    /// Error relative to the reference value; infinite when only the reference is zero.
    pub fn relative_error(&self) -> f64 {
        let error = self.absolute_error();
        if error == 0.0 {
            0.0
        } else {
            error / self.reference.abs()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsistencyReport {
    pub tolerance: Tolerance,
    pub reference: IntensityField,
    pub accelerated: IntensityField,
    pub deviations: Vec<Deviation>,
}

impl ConsistencyReport {
    fn new(tolerance: Tolerance, reference: IntensityField, accelerated: IntensityField) -> Self {
        let deviations = reference
            .iter()
            .zip(accelerated.iter())
            .enumerate()
            .map(|(index, (&r, &a))| Deviation {
                index,
                reference: r,
                accelerated: a,
                within_tolerance: tolerance.accepts(r, a),
            })
            .collect();
        Self {
            tolerance,
            reference,
            accelerated,
            deviations,
        }
    }

    pub fn max_relative_deviation(&self) -> f64 {
        self.deviations
            .iter()
            .map(Deviation::relative_error)
            .fold(0.0, f64::max)
    }

    pub fn violations(&self) -> impl Iterator<Item = &Deviation> + '_ {
        self.deviations.iter().filter(|d| !d.within_tolerance)
    }

    pub fn passed(&self) -> bool {
        self.violations().next().is_none()
    }

    /// The report itself when every q-vector passes, otherwise the worst violation.
    pub fn into_result(self) -> Result<Self, HarnessError> {
        let worst = self
            .violations()
            .max_by(|a, b| a.relative_error().total_cmp(&b.relative_error()))
            .copied();
        match worst {
            None => Ok(self),
            Some(d) => Err(HarnessError::ToleranceViolation {
                index: d.index,
                reference: d.reference,
                accelerated: d.accelerated,
                relative_error: d.relative_error(),
                tolerance: self.tolerance.relative,
            }),
        }
    }
}

/// Runs both backends on one ensemble and compares them q-vector by q-vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsistencyHarness {
    tolerance: Tolerance,
}

impl ConsistencyHarness {
    pub fn new(tolerance: Tolerance) -> Result<Self, EngineError> {
        tolerance.validate()?;
        Ok(Self { tolerance })
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Seeds are resolved once, validated or drawn from `rng`, and the same orientations
    /// are fed to both backends.
    #[instrument(skip_all, name = "consistency_harness", fields(molecules = num_molecules, q_vectors = q_grid.len()))]
    #[allow(clippy::too_many_arguments)]
    pub fn run<R: Rng + ?Sized>(
        &self,
        template: &AtomicStructure,
        q_grid: &QGrid,
        num_molecules: usize,
        seeds: Option<&[OrientationSeed]>,
        accelerated: &AcceleratedConfig,
        rng: &mut R,
        reporter: &ProgressReporter,
    ) -> Result<ConsistencyReport, HarnessError> {
        reporter.report(Progress::PhaseStart {
            name: "Preparation",
        });
        let accelerated_backend = AcceleratedBackend::new(*accelerated)?;
        let ensemble =
            Ensemble::new(template, num_molecules, seeds, rng).map_err(EngineError::from)?;
        reporter.report(Progress::PhaseFinish);

        let reference = self.run_backend(&ReferenceBackend, &ensemble, q_grid, reporter)?;
        let accelerated = self.run_backend(&accelerated_backend, &ensemble, q_grid, reporter)?;

        let report = ConsistencyReport::new(self.tolerance, reference, accelerated);
        let violations = report.violations().count();
        if violations == 0 {
            info!(
                max_relative_deviation = report.max_relative_deviation(),
                "Backends agree within tolerance."
            );
        } else {
            warn!(
                violations,
                max_relative_deviation = report.max_relative_deviation(),
                "Backends disagree beyond tolerance."
            );
        }
        Ok(report)
    }

    fn run_backend(
        &self,
        backend: &dyn IntensityBackend,
        ensemble: &Ensemble<'_>,
        q_grid: &QGrid,
        reporter: &ProgressReporter,
    ) -> Result<IntensityField, EngineError> {
        if ensemble.is_empty() {
            return Ok(IntensityField::zeros(q_grid.len()));
        }
        reporter.report(Progress::PhaseStart {
            name: backend.name(),
        });
        let field = backend.accumulate(ensemble, q_grid, reporter)?;
        reporter.report(Progress::PhaseFinish);
        Ok(field)
    }
}
