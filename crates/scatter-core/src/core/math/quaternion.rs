use nalgebra::{Quaternion, RealField, Vector3};
use rand::Rng;
use rand::distributions::Standard;

/// Builds a unit quaternion uniformly distributed over the rotation group from three
/// uniform scalars in `[0, 1)` (Shoemake's method).
///
/// The quaternion is returned in `(w, x, y, z)` convention. Boundary inputs such as
/// `u[0] == 0.0` or `u[0] == 1.0` are valid and still produce a unit quaternion.
///
/// # Arguments
///
/// * `u` - Three uniform random scalars; `u[0]` splits the norm between the two planes,
///   `u[1]` and `u[2]` are the two rotation phases.
pub fn random_unit_quaternion<T: RealField + Copy>(u: [T; 3]) -> Quaternion<T> {
    let s = u[0];
    let sigma1 = s.sqrt();
    let sigma2 = (T::one() - s).sqrt();

    let theta1 = T::two_pi() * u[1];
    let theta2 = T::two_pi() * u[2];

    Quaternion::new(
        theta2.cos() * sigma2,
        theta1.sin() * sigma1,
        theta1.cos() * sigma1,
        theta2.sin() * sigma2,
    )
}

/// Hamilton product `q1 * q2`. Non-commutative.
#[inline]
pub fn product<T: RealField + Copy>(q1: &Quaternion<T>, q2: &Quaternion<T>) -> Quaternion<T> {
    q1 * q2
}

#[inline]
pub fn conjugate<T: RealField + Copy>(q: &Quaternion<T>) -> Quaternion<T> {
    q.conjugate()
}

/// Rotates `v` by the sandwich product `q * (0, v) * conj(q)`.
///
/// `q` is expected to be a unit quaternion; the scalar part of the result is discarded.
#[inline]
pub fn rotate<T: RealField + Copy>(q: &Quaternion<T>, v: &Vector3<T>) -> Vector3<T> {
    let embedded = Quaternion::from_imag(*v);
    product(&product(q, &embedded), &conjugate(q)).imag()
}

/// Draws a uniformly random orientation from an explicitly supplied random source.
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Quaternion<f64> {
    random_unit_quaternion([rng.sample(Standard), rng.sample(Standard), rng.sample(Standard)])
}

/// Rotates a single vector by a freshly drawn random orientation.
pub fn rand_rotate_vector<R: Rng + ?Sized>(v: &Vector3<f64>, rng: &mut R) -> Vector3<f64> {
    rotate(&random_rotation(rng), v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn vectors_approx_equal(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
        (a - b).norm() < TOLERANCE * (1.0 + a.norm())
    }

    fn random_vector(rng: &mut StdRng) -> Vector3<f64> {
        Vector3::new(
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-20.0..20.0),
        )
    }

    #[test]
    fn random_unit_quaternion_follows_shoemake_layout() {
        let q = random_unit_quaternion([0.25_f64, 0.125, 0.5]);
        let sigma1 = 0.5_f64;
        let sigma2 = 0.75_f64.sqrt();
        let theta1 = std::f64::consts::PI / 4.0;
        let theta2 = std::f64::consts::PI;

        assert!(f64_approx_equal(q.w, theta2.cos() * sigma2));
        assert!(f64_approx_equal(q.i, theta1.sin() * sigma1));
        assert!(f64_approx_equal(q.j, theta1.cos() * sigma1));
        assert!(f64_approx_equal(q.k, theta2.sin() * sigma2));
    }

    #[test]
    fn random_unit_quaternion_has_unit_norm_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let q = random_rotation(&mut rng);
            assert!(f64_approx_equal(q.norm(), 1.0));
        }
    }

    #[test]
    fn random_unit_quaternion_accepts_boundary_inputs() {
        for u in [[0.0_f64, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.999_999, 0.999_999], [1.0, 0.5, 0.5]] {
            let q = random_unit_quaternion(u);
            assert!(q.coords.iter().all(|c| c.is_finite()));
            assert!(f64_approx_equal(q.norm(), 1.0));
        }
    }

    #[test]
    fn zero_norm_split_and_zero_phase_is_identity() {
        let q = random_unit_quaternion([0.0_f64, 0.3, 0.0]);
        let v = Vector3::new(1.5, -2.0, 3.25);
        assert!(vectors_approx_equal(&rotate(&q, &v), &v));
    }

    #[test]
    fn product_follows_hamilton_rules() {
        let i = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let j = Quaternion::new(0.0, 0.0, 1.0, 0.0);
        let k = Quaternion::new(0.0, 0.0, 0.0, 1.0);

        assert_eq!(product(&i, &j), k);
        assert_eq!(product(&j, &i), Quaternion::new(0.0, 0.0, 0.0, -1.0));
        assert_eq!(product(&i, &i), Quaternion::new(-1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn product_matches_bilinear_formula() {
        let q1 = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let q2 = Quaternion::new(5.0, 6.0, 7.0, 8.0);
        let q = product(&q1, &q2);

        assert_eq!(q.w, 1.0 * 5.0 - 2.0 * 6.0 - 3.0 * 7.0 - 4.0 * 8.0);
        assert_eq!(q.i, 1.0 * 6.0 + 2.0 * 5.0 + 3.0 * 8.0 - 4.0 * 7.0);
        assert_eq!(q.j, 1.0 * 7.0 - 2.0 * 8.0 + 3.0 * 5.0 + 4.0 * 6.0);
        assert_eq!(q.k, 1.0 * 8.0 + 2.0 * 7.0 - 3.0 * 6.0 + 4.0 * 5.0);
    }

    #[test]
    fn conjugate_negates_vector_part() {
        let q = conjugate(&Quaternion::new(1.0, -2.0, 3.0, -4.0));
        assert_eq!(q, Quaternion::new(1.0, 2.0, -3.0, 4.0));
    }

    #[test]
    fn rotate_quarter_turn_about_z_maps_x_to_y() {
        let half = std::f64::consts::FRAC_PI_4;
        let q = Quaternion::new(half.cos(), 0.0, 0.0, half.sin());
        let rotated = rotate(&q, &Vector3::x());
        assert!(vectors_approx_equal(&rotated, &Vector3::y()));
    }

    #[test]
    fn rotate_preserves_norm() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let q = random_rotation(&mut rng);
            let v = random_vector(&mut rng);
            let rotated = rotate(&q, &v);
            assert!((rotated.norm() - v.norm()).abs() < 1e-11);
        }
    }

    #[test]
    fn rotate_composes_with_product() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..500 {
            let q1 = random_rotation(&mut rng);
            let q2 = random_rotation(&mut rng);
            let v = random_vector(&mut rng);

            let composed = rotate(&product(&q1, &q2), &v);
            let sequential = rotate(&q1, &rotate(&q2, &v));
            assert!((composed - sequential).norm() < 1e-10);
        }
    }

    #[test]
    fn single_precision_rotation_tracks_double_precision() {
        let seed = [0.37_f64, 0.81, 0.05];
        let v = Vector3::new(12.5, -3.0, 7.75);

        let q64 = random_unit_quaternion(seed);
        let q32 = random_unit_quaternion(seed.map(|u| u as f32));
        let r64 = rotate(&q64, &v);
        let r32 = rotate(&q32, &v.cast::<f32>());

        assert!((r32.cast::<f64>() - r64).norm() < 1e-4);
    }

    #[test]
    fn rand_rotate_vector_is_deterministic_for_seeded_rng() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let a = rand_rotate_vector(&v, &mut StdRng::seed_from_u64(5));
        let b = rand_rotate_vector(&v, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
        assert!((a.norm() - v.norm()).abs() < 1e-12);
    }
}
