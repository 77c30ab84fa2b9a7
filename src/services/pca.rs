use ndarray::{Array1, Array2, Axis};
use tracing::debug;

const POWER_ITERATIONS: usize = 20;

/// A linear projection fit once on a reference embedding distribution.
///
/// Fitting learns the mean and the leading principal directions of the
/// reference matrix by power iteration with deflation. The same fitted
/// state must project every vector that is later compared by similarity.
#[derive(Debug, Clone)]
pub struct Pca {
    mean: Array1<f32>,
    /// One principal direction per row, shape (n_components, n_features).
    components: Array2<f32>,
    explained_variance: Vec<f32>,
    total_variance: f32,
}

impl Pca {
    pub fn fit(data: &Array2<f32>, n_components: usize) -> Self {
        let n_features = data.ncols();
        let mean = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        let mut centered = data - &mean;

        let total_variance: f32 = centered.iter().map(|x| x * x).sum();

        let mut components = Array2::zeros((n_components, n_features));
        let mut explained_variance = Vec::with_capacity(n_components);

        for c in 0..n_components {
            // Fixed per-component seed keeps repeated fits identical
            let mut pc = Array1::from_iter(
                (0..n_features).map(|i| ((i * (2 * c + 7) + 11) % 101) as f32 / 101.0),
            );
            unit(&mut pc);

            // pc <- X^T (X pc), renormalized each round
            for _ in 0..POWER_ITERATIONS {
                let projected = centered.dot(&pc);
                pc = centered.t().dot(&projected);
                unit(&mut pc);
            }

            let scores = centered.dot(&pc);
            explained_variance.push(scores.iter().map(|s| s * s).sum());

            // Deflate: remove this direction before finding the next one
            for (mut row, &s) in centered.rows_mut().into_iter().zip(scores.iter()) {
                row.scaled_add(-s, &pc);
            }

            components.row_mut(c).assign(&pc);
        }

        debug!(
            "Fit {} principal components over {} features",
            n_components, n_features
        );

        Self {
            mean,
            components,
            explained_variance,
            total_variance,
        }
    }

    /// Project a raw vector into the reduced space.
    pub fn transform(&self, v: &Array1<f32>) -> Array1<f32> {
        let centered = v - &self.mean;
        self.components.dot(&centered)
    }

    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.components.ncols()
    }

    /// Fraction of the reference variance the kept components capture.
    pub fn explained_variance_ratio(&self) -> f32 {
        if self.total_variance > 0.0 {
            self.explained_variance.iter().sum::<f32>() / self.total_variance
        } else {
            0.0
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(mean: Array1<f32>, components: Array2<f32>) -> Self {
        Self {
            mean,
            components,
            explained_variance: Vec::new(),
            total_variance: 0.0,
        }
    }
}

fn unit(v: &mut Array1<f32>) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-10 {
        v.mapv_inplace(|x| x / norm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const TOLERANCE: f32 = 1e-3;

    #[test]
    fn finds_dominant_direction() {
        // All samples lie on the line spanned by (0.6, 0.8)
        let data = array![
            [-6.0, -8.0],
            [-3.0, -4.0],
            [3.0, 4.0],
            [6.0, 8.0],
        ];
        let pca = Pca::fit(&data, 1);

        let c = pca.components.row(0);
        let alignment: f32 = c[0] * 0.6 + c[1] * 0.8;
        assert!(alignment.abs() > 1.0 - TOLERANCE);
        assert!(pca.explained_variance_ratio() > 1.0 - TOLERANCE);
    }

    #[test]
    fn components_are_ordered_and_orthogonal() {
        // Variance 8 along x, variance 2 along y
        let data = array![
            [2.0, 0.0],
            [-2.0, 0.0],
            [0.0, 1.0],
            [0.0, -1.0],
        ];
        let pca = Pca::fit(&data, 2);

        let c0 = pca.components.row(0);
        let c1 = pca.components.row(1);
        assert!(c0[0].abs() > 1.0 - TOLERANCE);
        assert!(c1[1].abs() > 1.0 - TOLERANCE);

        let dot: f32 = c0.iter().zip(c1.iter()).map(|(a, b)| a * b).sum();
        assert!(dot.abs() < TOLERANCE);

        assert!(pca.explained_variance[0] > pca.explained_variance[1]);
    }

    #[test]
    fn transform_centers_then_projects() {
        let pca = Pca::from_parts(
            array![1.0, 1.0],
            array![[1.0, 0.0], [0.0, 1.0]],
        );
        let reduced = pca.transform(&array![2.0, 3.0]);
        assert_eq!(reduced, array![1.0, 2.0]);
    }

    #[test]
    fn repeated_fits_are_identical() {
        let data = array![
            [1.0, 2.0, 0.5],
            [-1.0, 0.0, 1.5],
            [0.5, -2.0, 0.0],
            [2.0, 1.0, -1.0],
        ];
        let a = Pca::fit(&data, 2);
        let b = Pca::fit(&data, 2);
        assert_eq!(a.components, b.components);
        assert_eq!(a.mean, b.mean);
    }
}
