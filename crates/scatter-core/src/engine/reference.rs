use super::ensemble::Ensemble;
use super::progress::{Progress, ProgressReporter};
use crate::core::models::intensity::IntensityField;
use crate::core::models::qgrid::QGrid;
use crate::core::scattering::form_factor::form_factor;
use nalgebra::{Complex, Vector3};
use tracing::{debug, instrument, trace};

/// Serial double-precision accumulation, the ground truth for every other backend.
///
/// For each molecule and each q-vector the molecular structure factor
/// `F(q) = Σ_j f_j(q)·exp(i·q·r_j)` is formed from the rotated positions and `|F(q)|²`
/// is added to the field.
#[instrument(skip_all, name = "reference_accumulate", fields(molecules = ensemble.len(), q_vectors = q_grid.len()))]
pub fn accumulate(
    ensemble: &Ensemble<'_>,
    q_grid: &QGrid,
    reporter: &ProgressReporter,
) -> IntensityField {
    let mut field = IntensityField::zeros(q_grid.len());
    let form_factors = tabulate_form_factors(ensemble, q_grid);

    reporter.report(Progress::TaskStart {
        total_steps: ensemble.len() as u64,
    });

    for molecule in 0..ensemble.len() {
        let positions = ensemble.rotated_positions(molecule);
        for (index, (q, factors)) in q_grid.vectors().iter().zip(&form_factors).enumerate() {
            field.accumulate(index, structure_factor(q, &positions, factors).norm_sqr());
        }
        trace!(molecule, "Molecule accumulated.");
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    debug!(total = field.total(), "Reference accumulation finished.");
    field
}

/// `f_j(q)` for every q-vector (outer) and atom (inner). Form factors depend only on `|q|`,
/// so one table serves every orientation.
fn tabulate_form_factors(ensemble: &Ensemble<'_>, q_grid: &QGrid) -> Vec<Vec<f64>> {
    q_grid
        .vectors()
        .iter()
        .map(|q| {
            ensemble
                .template()
                .atoms()
                .iter()
                .map(|atom| form_factor(q, atom.atomic_number))
                .collect()
        })
        .collect()
}

fn structure_factor(q: &Vector3<f64>, positions: &[Vector3<f64>], factors: &[f64]) -> Complex<f64> {
    positions
        .iter()
        .zip(factors)
        .fold(Complex::new(0.0, 0.0), |amplitude, (r, &f)| {
            let phase = q.dot(r);
            amplitude + Complex::new(f * phase.cos(), f * phase.sin())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::AtomicStructure;
    use nalgebra::Point3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn relative_approx_equal(a: f64, b: f64, rtol: f64) -> bool {
        (a - b).abs() <= rtol * b.abs().max(f64::MIN_POSITIVE)
    }

    #[test]
    fn single_atom_at_origin_scatters_form_factor_squared_per_molecule() {
        let template = AtomicStructure::from_parts(&[Point3::origin()], &[26]).unwrap();
        let q_grid = QGrid::new(vec![Vector3::new(0.3, -1.2, 0.8)]).unwrap();
        let ensemble = Ensemble::new(&template, 5, None, &mut StdRng::seed_from_u64(3)).unwrap();

        let field = accumulate(&ensemble, &q_grid, &ProgressReporter::new());

        let f = form_factor(&q_grid.vectors()[0], 26);
        assert!(relative_approx_equal(field[0], 5.0 * f * f, 1e-12));
    }

    #[test]
    fn two_atoms_follow_analytic_interference_term() {
        let r1 = Point3::new(0.5, -0.25, 1.0);
        let r2 = Point3::new(-1.0, 0.75, 0.0);
        let template = AtomicStructure::from_parts(&[r1, r2], &[8, 79]).unwrap();
        let q = Vector3::new(0.7, 0.2, -0.4);
        let q_grid = QGrid::new(vec![q]).unwrap();
        let seeds = [[0.0, 0.5, 0.0]];
        let ensemble =
            Ensemble::new(&template, 1, Some(&seeds[..]), &mut StdRng::seed_from_u64(0)).unwrap();

        let field = accumulate(&ensemble, &q_grid, &ProgressReporter::new());

        let f1 = form_factor(&q, 8);
        let f2 = form_factor(&q, 79);
        let expected = f1 * f1 + f2 * f2 + 2.0 * f1 * f2 * q.dot(&(r1 - r2)).cos();
        assert!(relative_approx_equal(field[0], expected, 1e-12));
    }

    #[test]
    fn forward_scattering_is_squared_total_amplitude() {
        let template = AtomicStructure::from_parts(
            &[Point3::new(1.0, 2.0, 3.0), Point3::new(-3.0, 0.0, 1.0)],
            &[1, 8],
        )
        .unwrap();
        let q_grid = QGrid::new(vec![Vector3::zeros()]).unwrap();
        let ensemble = Ensemble::new(&template, 3, None, &mut StdRng::seed_from_u64(9)).unwrap();

        let field = accumulate(&ensemble, &q_grid, &ProgressReporter::new());

        let origin = Vector3::<f64>::zeros();
        let total = form_factor(&origin, 1) + form_factor(&origin, 8);
        assert!(relative_approx_equal(field[0], 3.0 * total * total, 1e-12));
    }

    #[test]
    fn molecule_order_does_not_change_result_beyond_round_off() {
        let template = AtomicStructure::from_parts(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.4, 0.3, -0.2),
                Point3::new(-0.9, 1.1, 0.6),
            ],
            &[6, 7, 8],
        )
        .unwrap();
        let q_grid =
            QGrid::new(vec![Vector3::new(1.0, 0.5, 0.0), Vector3::new(0.0, 2.0, -1.0)]).unwrap();
        let seeds = [[0.1, 0.2, 0.3], [0.9, 0.4, 0.7], [0.5, 0.05, 0.95]];
        let reversed: Vec<_> = seeds.iter().rev().copied().collect();

        let mut rng = StdRng::seed_from_u64(0);
        let forward = Ensemble::new(&template, 3, Some(&seeds[..]), &mut rng).unwrap();
        let backward = Ensemble::new(&template, 3, Some(&reversed[..]), &mut rng).unwrap();

        let a = accumulate(&forward, &q_grid, &ProgressReporter::new());
        let b = accumulate(&backward, &q_grid, &ProgressReporter::new());
        for i in 0..q_grid.len() {
            assert!(relative_approx_equal(a[i], b[i], 1e-12));
        }
    }

    #[test]
    fn progress_counts_one_increment_per_molecule() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let template = AtomicStructure::from_parts(&[Point3::origin()], &[1]).unwrap();
        let q_grid = QGrid::new(vec![Vector3::new(1.0, 0.0, 0.0)]).unwrap();
        let ensemble = Ensemble::new(&template, 7, None, &mut StdRng::seed_from_u64(1)).unwrap();

        let increments = AtomicUsize::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if event == Progress::TaskIncrement {
                increments.fetch_add(1, Ordering::Relaxed);
            }
        }));
        accumulate(&ensemble, &q_grid, &reporter);
        drop(reporter);

        assert_eq!(increments.into_inner(), 7);
    }
}
