use crate::core::models::structure::AtomicNumber;
use nalgebra::{RealField, Vector3, convert};
use phf::{Map, phf_map};
use std::fmt;

/// Cromer-Mann parameterization of an atomic form factor: four Gaussians plus a constant.
///
/// The amplitude at momentum transfer `q` is `Σ aᵢ·exp(−bᵢ·s) + c` with `s = |q|²/(16π²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CromerMann {
    pub a: [f64; 4],
    pub b: [f64; 4],
    pub c: f64,
}

impl CromerMann {
    pub const COEFFICIENT_COUNT: usize = 9;

    /// Flattens the coefficients as `[a1, a2, a3, a4, b1, b2, b3, b4, c]`.
    pub fn to_array(&self) -> [f64; Self::COEFFICIENT_COUNT] {
        [
            self.a[0], self.a[1], self.a[2], self.a[3], self.b[0], self.b[1], self.b[2],
            self.b[3], self.c,
        ]
    }

    /// The amplitude at zero momentum transfer, where every exponential equals one.
    pub fn forward_amplitude(&self) -> f64 {
        self.a.iter().sum::<f64>() + self.c
    }

    #[inline]
    pub fn evaluate<T: RealField + Copy>(&self, q: &Vector3<T>) -> T {
        evaluate_coefficients(&self.to_array().map(convert::<f64, T>), q)
    }
}

/// Where a species' coefficients came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormFactorSource {
    /// The species has its own entry in the table.
    Tabulated,
    /// The species is not tabulated and is approximated by nitrogen-like coefficients.
    NitrogenApproximation,
}

impl fmt::Display for FormFactorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tabulated => write!(f, "tabulated"),
            Self::NitrogenApproximation => write!(f, "nitrogen approximation"),
        }
    }
}

/// Coefficients used for every atomic number absent from [`FORM_FACTOR_TABLE`].
pub const NITROGEN_APPROXIMATION: CromerMann = CromerMann {
    a: [12.2126, 3.13220, 2.01250, 1.16630],
    b: [0.005700, 9.89330, 28.9975, 0.582600],
    c: -11.529,
};

pub static FORM_FACTOR_TABLE: Map<u32, CromerMann> = phf_map! {
    1u32 => CromerMann {
        a: [0.493002, 0.322912, 0.140191, 0.040810],
        b: [10.5109, 26.1257, 3.14236, 57.7997],
        c: 0.003038,
    },
    8u32 => CromerMann {
        a: [3.04850, 2.28680, 1.54630, 0.867000],
        b: [13.2771, 5.70110, 0.323900, 32.9089],
        c: 0.2508,
    },
    26u32 => CromerMann {
        a: [11.7695, 7.35730, 3.52220, 2.30450],
        b: [4.7611, 0.307200, 15.3535, 76.8805],
        c: 1.03690,
    },
    79u32 => CromerMann {
        a: [16.8819, 18.5913, 25.5582, 5.86],
        b: [0.4611, 8.6216, 1.4826, 36.3956],
        c: 12.0658,
    },
};

/// Returns the coefficients for `atomic_number` together with how they were obtained.
pub fn lookup(atomic_number: AtomicNumber) -> (&'static CromerMann, FormFactorSource) {
    match FORM_FACTOR_TABLE.get(&atomic_number) {
        Some(params) => (params, FormFactorSource::Tabulated),
        None => (
            &NITROGEN_APPROXIMATION,
            FormFactorSource::NitrogenApproximation,
        ),
    }
}

/// Atomic form factor of `atomic_number` at momentum transfer `q`.
///
/// Untabulated species silently use [`NITROGEN_APPROXIMATION`]; callers that need to know
/// should consult [`lookup`].
#[inline]
pub fn form_factor<T: RealField + Copy>(q: &Vector3<T>, atomic_number: AtomicNumber) -> T {
    lookup(atomic_number).0.evaluate(q)
}

/// Evaluates a flattened `[a1..a4, b1..b4, c]` coefficient set at `q`.
///
/// This is the single formula shared by both intensity backends. An all-zero coefficient
/// set yields exactly zero, which the accelerated backend relies on for padding atoms.
#[inline]
pub fn evaluate_coefficients<T: RealField + Copy>(
    coefficients: &[T; CromerMann::COEFFICIENT_COUNT],
    q: &Vector3<T>,
) -> T {
    let s = q.norm_squared() / (convert::<f64, T>(16.0) * T::pi() * T::pi());
    let mut f = coefficients[8];
    for i in 0..4 {
        f += coefficients[i] * (-coefficients[i + 4] * s).exp();
    }
    f
}
