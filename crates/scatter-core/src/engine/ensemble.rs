use crate::core::math::quaternion::{random_unit_quaternion, rotate};
use crate::core::models::error::ModelError;
use crate::core::models::orientation::{OrientationSeed, draw_seeds, validate_seeds};
use crate::core::models::structure::AtomicStructure;
use nalgebra::{Quaternion, Vector3};
use rand::Rng;
use std::borrow::Cow;
use tracing::debug;

/// M randomly oriented copies of one rigid template.
///
/// Every seed is resolved when the ensemble is built, so the accumulators never touch a
/// random number generator and molecules can be visited in any order.
#[derive(Debug, Clone)]
pub struct Ensemble<'a> {
    template: &'a AtomicStructure,
    seeds: Cow<'a, [OrientationSeed]>,
}

impl<'a> Ensemble<'a> {
    /// Builds an ensemble of `num_molecules` instances of `template`.
    ///
    /// With `supplied` seeds the first `num_molecules` are used verbatim after validation.
    /// Without them, fresh seeds are drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(
        template: &'a AtomicStructure,
        num_molecules: usize,
        supplied: Option<&'a [OrientationSeed]>,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        let seeds = match supplied {
            Some(seeds) => {
                validate_seeds(seeds, num_molecules)?;
                Cow::Borrowed(&seeds[..num_molecules])
            }
            None => {
                debug!(num_molecules, "Drawing orientation seeds.");
                Cow::Owned(draw_seeds(num_molecules, rng))
            }
        };
        Ok(Self { template, seeds })
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn template(&self) -> &'a AtomicStructure {
        self.template
    }

    pub fn seeds(&self) -> &[OrientationSeed] {
        &self.seeds
    }

    pub fn orientation(&self, molecule: usize) -> Quaternion<f64> {
        random_unit_quaternion(self.seeds[molecule])
    }

    /// Template positions rotated into the orientation of `molecule`.
    pub fn rotated_positions(&self, molecule: usize) -> Vec<Vector3<f64>> {
        let q = self.orientation(molecule);
        self.template
            .positions()
            .map(|p| rotate(&q, &p.coords))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn water() -> AtomicStructure {
        AtomicStructure::from_parts(
            &[
                Point3::new(0.0, 0.0, 0.117),
                Point3::new(0.0, 0.757, -0.467),
                Point3::new(0.0, -0.757, -0.467),
            ],
            &[8, 1, 1],
        )
        .unwrap()
    }

    #[test]
    fn supplied_seeds_are_truncated_to_molecule_count() {
        let template = water();
        let seeds = [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6], [0.7, 0.8, 0.9]];
        let ensemble =
            Ensemble::new(&template, 2, Some(&seeds[..]), &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(ensemble.len(), 2);
        assert_eq!(ensemble.seeds(), &seeds[..2]);
    }

    #[test]
    fn too_few_supplied_seeds_are_rejected() {
        let template = water();
        let seeds = [[0.1, 0.2, 0.3]];
        let result = Ensemble::new(&template, 2, Some(&seeds[..]), &mut StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(ModelError::InsufficientSeeds {
                required: 2,
                supplied: 1
            })
        ));
    }

    #[test]
    fn drawn_seeds_are_reproducible_with_seeded_rng() {
        let template = water();
        let a = Ensemble::new(&template, 8, None, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = Ensemble::new(&template, 8, None, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a.len(), 8);
        assert_eq!(a.seeds(), b.seeds());
    }

    #[test]
    fn rotated_positions_preserve_interatomic_distances_and_template() {
        let template = water();
        let seeds = [[0.3, 0.6, 0.9]];
        let ensemble =
            Ensemble::new(&template, 1, Some(&seeds[..]), &mut StdRng::seed_from_u64(0)).unwrap();
        let rotated = ensemble.rotated_positions(0);

        let original: Vec<_> = template.positions().map(|p| p.coords).collect();
        let d_before = (original[1] - original[2]).norm();
        let d_after = (rotated[1] - rotated[2]).norm();
        assert!((d_before - d_after).abs() < 1e-12);
        assert_eq!(template.atoms()[1].position, Point3::new(0.0, 0.757, -0.467));
    }

    #[test]
    fn identity_seed_leaves_positions_unchanged() {
        let template = water();
        let seeds = [[0.0, 0.25, 0.0]];
        let ensemble =
            Ensemble::new(&template, 1, Some(&seeds[..]), &mut StdRng::seed_from_u64(0)).unwrap();
        for (rotated, atom) in ensemble.rotated_positions(0).iter().zip(template.atoms()) {
            assert!((rotated - atom.position.coords).norm() < 1e-12);
        }
    }

    #[test]
    fn zero_molecules_yield_empty_ensemble() {
        let template = water();
        let ensemble = Ensemble::new(&template, 0, None, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(ensemble.is_empty());
    }
}
