use std::ops::{AddAssign, Index};

/// Scattered intensity accumulated at each q-vector of a grid.
///
/// Created zero-filled; only ever grows by additive accumulation, so molecule contributions
/// and partial fields can be combined in any order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntensityField {
    values: Vec<f64>,
}

impl IntensityField {
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Wraps already-accumulated values.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn accumulate(&mut self, index: usize, intensity: f64) {
        self.values[index] += intensity;
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.values.iter()
    }
}

impl AddAssign<&IntensityField> for IntensityField {
    fn add_assign(&mut self, rhs: &IntensityField) {
        assert_eq!(
            self.len(),
            rhs.len(),
            "cannot combine intensity fields of different lengths"
        );
        for (lhs, rhs) in self.values.iter_mut().zip(&rhs.values) {
            *lhs += rhs;
        }
    }
}

impl Index<usize> for IntensityField {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}
