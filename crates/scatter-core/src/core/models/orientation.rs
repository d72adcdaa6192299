use super::error::ModelError;
use rand::Rng;
use rand::distributions::Standard;

/// Three uniform scalars in `[0, 1)` from which one molecule's orientation is built.
pub type OrientationSeed = [f64; 3];

/// Draws `count` seeds from `rng`, all ahead of any accumulation work.
pub fn draw_seeds<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<OrientationSeed> {
    (0..count)
        .map(|_| [rng.sample(Standard), rng.sample(Standard), rng.sample(Standard)])
        .collect()
}

/// Checks that `seeds` can orient `required` molecules: at least that many triples, each
/// component finite and in `[0, 1)`. Seeds beyond `required` are not inspected.
pub fn validate_seeds(seeds: &[OrientationSeed], required: usize) -> Result<(), ModelError> {
    if seeds.len() < required {
        return Err(ModelError::InsufficientSeeds {
            required,
            supplied: seeds.len(),
        });
    }
    for (index, seed) in seeds.iter().take(required).enumerate() {
        if let Some(&value) = seed.iter().find(|u| !(0.0..1.0).contains(*u)) {
            return Err(ModelError::SeedOutOfRange { index, value });
        }
    }
    Ok(())
}
