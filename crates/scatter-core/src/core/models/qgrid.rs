use super::error::ModelError;
use nalgebra::Vector3;

/// The momentum-transfer vectors sampled by the detector, one per detector point.
///
/// Produced upstream by detector geometry; immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct QGrid {
    vectors: Vec<Vector3<f64>>,
}

impl QGrid {
    pub fn new(vectors: Vec<Vector3<f64>>) -> Result<Self, ModelError> {
        if vectors.is_empty() {
            return Err(ModelError::EmptyQGrid);
        }
        if let Some((index, q)) = vectors
            .iter()
            .enumerate()
            .find(|(_, q)| !q.iter().all(|c| c.is_finite()))
        {
            return Err(ModelError::NonFiniteQVector {
                index,
                vector: [q.x, q.y, q.z],
            });
        }
        Ok(Self { vectors })
    }

    pub fn vectors(&self) -> &[Vector3<f64>] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Keeps only the first `n` vectors.
    pub fn truncated(&self, n: usize) -> Result<Self, ModelError> {
        Self::new(self.vectors.iter().take(n).copied().collect())
    }
}
