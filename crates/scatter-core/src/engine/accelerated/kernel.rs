use super::staging::{SpeciesIndex, StagedTemplate};
use crate::core::math::quaternion::rotate;
use nalgebra::{Complex, Quaternion, Vector3};

/// Shared, read-only inputs of one accelerated pass.
///
/// The work unit is a (molecule, q-vector) pair. Form factors are evaluated once per
/// q-vector and species ahead of time, so a unit only gathers them by species index.
pub struct Kernel<'a> {
    staged: &'a StagedTemplate,
    q_vectors: &'a [Vector3<f32>],
    form_factors: &'a [Vec<f32>],
    atom_batch_size: usize,
}

impl<'a> Kernel<'a> {
    pub fn new(
        staged: &'a StagedTemplate,
        q_vectors: &'a [Vector3<f32>],
        form_factors: &'a [Vec<f32>],
        atom_batch_size: usize,
    ) -> Self {
        Self {
            staged,
            q_vectors,
            form_factors,
            atom_batch_size,
        }
    }

    pub fn q_count(&self) -> usize {
        self.q_vectors.len()
    }

    /// Padded template positions rotated by `orientation`.
    pub fn rotate_template(&self, orientation: &Quaternion<f32>) -> Vec<Vector3<f32>> {
        self.staged
            .positions
            .iter()
            .map(|r| rotate(orientation, r))
            .collect()
    }

    /// `|F(q)|²` of one rotated molecule at q-vector `q_index`.
    ///
    /// Partial amplitudes of the atom batches are summed before squaring.
    pub fn unit_intensity(&self, rotated: &[Vector3<f32>], q_index: usize) -> f32 {
        let q = &self.q_vectors[q_index];
        let factors = &self.form_factors[q_index];
        rotated
            .chunks(self.atom_batch_size)
            .zip(self.staged.species_indices.chunks(self.atom_batch_size))
            .map(|(positions, species)| batch_amplitude(q, positions, species, factors))
            .fold(Complex::new(0.0, 0.0), |total, partial| total + partial)
            .norm_sqr()
    }
}

/// Complex amplitude contributed by one batch of atoms at `q`.
#[inline]
pub fn batch_amplitude(
    q: &Vector3<f32>,
    positions: &[Vector3<f32>],
    species: &[SpeciesIndex],
    form_factors: &[f32],
) -> Complex<f32> {
    let mut re = 0.0_f32;
    let mut im = 0.0_f32;
    for (r, &s) in positions.iter().zip(species) {
        let f = form_factors[s as usize];
        let (sin, cos) = q.dot(r).sin_cos();
        re += f * cos;
        im += f * sin;
    }
    Complex::new(re, im)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::AtomicStructure;
    use crate::core::scattering::form_factor::form_factor;
    use crate::engine::accelerated::batching::BatchLayout;
    use crate::engine::config::AcceleratedConfig;
    use nalgebra::Point3;

    fn f32_approx_equal(a: f32, b: f32, rtol: f32) -> bool {
        (a - b).abs() <= rtol * b.abs().max(f32::MIN_POSITIVE)
    }

    fn stage(structure: &AtomicStructure, atom_batch_size: usize) -> StagedTemplate {
        let config = AcceleratedConfig {
            atom_batch_size,
            molecule_block_size: 1,
            ..AcceleratedConfig::default()
        };
        let layout = BatchLayout::plan(structure.len(), 1, &config).unwrap();
        StagedTemplate::stage(structure, &layout).unwrap()
    }

    fn chain() -> AtomicStructure {
        AtomicStructure::from_parts(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.2, 0.1, -0.3),
                Point3::new(2.5, -0.4, 0.2),
                Point3::new(3.7, 0.0, 0.9),
                Point3::new(4.1, 1.3, -1.0),
            ],
            &[6, 8, 1, 26, 7],
        )
        .unwrap()
    }

    #[test]
    fn amplitude_sum_over_batches_matches_single_batch() {
        let structure = chain();
        let q = vec![Vector3::new(0.8_f32, -0.3, 0.5)];

        let whole = stage(&structure, 8);
        let whole_factors = vec![whole.species.form_factors_at(&q[0])];
        let whole_kernel = Kernel::new(&whole, &q, &whole_factors, 8);

        let split = stage(&structure, 2);
        let split_factors = vec![split.species.form_factors_at(&q[0])];
        let split_kernel = Kernel::new(&split, &q, &split_factors, 2);

        let identity = Quaternion::identity();
        let a = whole_kernel.unit_intensity(&whole_kernel.rotate_template(&identity), 0);
        let b = split_kernel.unit_intensity(&split_kernel.rotate_template(&identity), 0);
        assert!(f32_approx_equal(a, b, 1e-5));
    }

    #[test]
    fn coincident_atoms_in_separate_batches_interfere() {
        let structure = AtomicStructure::from_parts(
            &[Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)],
            &[8, 8],
        )
        .unwrap();
        let staged = stage(&structure, 1);
        let q = vec![Vector3::new(0.5_f32, 0.0, 0.0)];
        let factors = vec![staged.species.form_factors_at(&q[0])];
        let kernel = Kernel::new(&staged, &q, &factors, 1);

        let intensity = kernel.unit_intensity(&kernel.rotate_template(&Quaternion::identity()), 0);
        let f = form_factor(&q[0], 8);
        let per_batch_squared = 2.0 * f * f;
        assert!(f32_approx_equal(intensity, 4.0 * f * f, 1e-5));
        assert!(!f32_approx_equal(intensity, per_batch_squared, 1e-2));
    }

    #[test]
    fn null_species_atoms_contribute_no_amplitude() {
        let q = Vector3::new(1.0_f32, 2.0, 3.0);
        let factors = [3.5_f32, 0.0];
        let positions = [Vector3::new(0.2_f32, 0.0, 0.0), Vector3::new(5.0, 5.0, 5.0)];

        let with_null = batch_amplitude(&q, &positions, &[0, 1], &factors);
        let without = batch_amplitude(&q, &positions[..1], &[0], &factors);
        assert_eq!(with_null, without);
    }

    #[test]
    fn single_atom_unit_is_form_factor_squared_in_any_orientation() {
        let structure = AtomicStructure::from_parts(&[Point3::origin()], &[79]).unwrap();
        let staged = stage(&structure, 4);
        let q = vec![Vector3::new(0.4_f32, 0.4, -0.2)];
        let factors = vec![staged.species.form_factors_at(&q[0])];
        let kernel = Kernel::new(&staged, &q, &factors, 4);

        let orientation = Quaternion::new(0.5_f32, 0.5, 0.5, 0.5);
        let intensity = kernel.unit_intensity(&kernel.rotate_template(&orientation), 0);
        let f = form_factor(&q[0], 79);
        assert!(f32_approx_equal(intensity, f * f, 1e-5));
    }
}
