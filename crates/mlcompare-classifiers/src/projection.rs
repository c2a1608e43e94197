//! Two-component PCA used to draw a dataset on the plane.
//!
//! The covariance matrix is diagonalised with the cyclic Jacobi method, which
//! is exact enough for the small feature counts involved (at most a few dozen
//! columns) and gives the same answer on every run. Component signs are fixed
//! so that the loading with the largest magnitude is positive.
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::Serialize;

use crate::datasets::Dataset;
use crate::error::{ClassifierError, Result};

const MAX_SWEEPS: usize = 100;
const EPSILON: f64 = 1e-12;

/// Planar coordinates of every dataset row, in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub labels: Vec<usize>,
    pub explained_variance_ratio: [f64; 2],
}

impl Projection {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Principal component analysis fitted on a feature matrix.
#[derive(Debug, Clone)]
pub struct Pca {
    n_components: usize,
    mean: Array1<f64>,
    /// One component per row, `n_components x n_features`.
    components: Array2<f64>,
    explained_variance: Array1<f64>,
    explained_variance_ratio: Array1<f64>,
}

impl Pca {
    /// Fit `n_components` principal axes on the rows of `x`.
    pub fn fit(x: ArrayView2<'_, f64>, n_components: usize) -> Result<Self> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(ClassifierError::InvalidParameter(
                "cannot fit PCA on an empty matrix".to_string(),
            ));
        }
        if n_components == 0 || n_components > n_features {
            return Err(ClassifierError::InvalidParameter(format!(
                "n_components must lie in 1..={}, got {}",
                n_features, n_components
            )));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ClassifierError::InvalidParameter("empty matrix".to_string()))?;
        let centred = &x - &mean;
        let denom = (n_samples.max(2) - 1) as f64;
        let covariance = centred.t().dot(&centred) / denom;

        let (eigenvalues, eigenvectors) = jacobi_eigen(covariance);

        let mut order: Vec<usize> = (0..n_features).collect();
        order.sort_by(|&a, &b| {
            eigenvalues[b]
                .partial_cmp(&eigenvalues[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total: f64 = eigenvalues.iter().map(|v| v.max(0.0)).sum();
        let mut components = Array2::<f64>::zeros((n_components, n_features));
        let mut explained_variance = Array1::<f64>::zeros(n_components);

        for (i, &idx) in order.iter().take(n_components).enumerate() {
            let mut axis = eigenvectors.column(idx).to_owned();
            if dominant_loading(&axis) < 0.0 {
                axis.mapv_inplace(|v| -v);
            }
            components.row_mut(i).assign(&axis);
            explained_variance[i] = eigenvalues[idx].max(0.0);
        }

        let explained_variance_ratio = if total > 0.0 {
            &explained_variance / total
        } else {
            Array1::zeros(n_components)
        };

        Ok(Pca {
            n_components,
            mean,
            components,
            explained_variance,
            explained_variance_ratio,
        })
    }

    /// Project rows of `x` onto the fitted components.
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            return Err(ClassifierError::InvalidParameter(format!(
                "PCA was fitted on {} features but got {}",
                self.mean.len(),
                x.ncols()
            )));
        }
        let centred = &x - &self.mean;
        Ok(centred.dot(&self.components.t()))
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn components(&self) -> &Array2<f64> {
        &self.components
    }

    pub fn explained_variance(&self) -> &Array1<f64> {
        &self.explained_variance
    }

    pub fn explained_variance_ratio(&self) -> &Array1<f64> {
        &self.explained_variance_ratio
    }
}

/// Signed value of the entry with the largest magnitude (first one on ties).
fn dominant_loading(axis: &Array1<f64>) -> f64 {
    axis.iter()
        .fold(0.0_f64, |best, &v| if v.abs() > best.abs() { v } else { best })
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns the eigenvalues and a matrix whose columns are the matching unit
/// eigenvectors.
fn jacobi_eigen(mut a: Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut v = Array2::<f64>::eye(n);

    let scale: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt().max(f64::MIN_POSITIVE);

    for sweep in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[(i, j)] * a[(i, j)])
            .sum::<f64>()
            .sqrt();
        if off <= EPSILON * scale {
            log::trace!("Jacobi converged after {} sweeps", sweep);
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[(p, q)];
                if apq.abs() <= f64::MIN_POSITIVE {
                    continue;
                }

                let theta = (a[(q, q)] - a[(p, p)]) / (2.0 * apq);
                let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
                let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                // A <- A J
                for k in 0..n {
                    let akp = a[(k, p)];
                    let akq = a[(k, q)];
                    a[(k, p)] = c * akp - s * akq;
                    a[(k, q)] = s * akp + c * akq;
                }
                // A <- J^T A
                for k in 0..n {
                    let apk = a[(p, k)];
                    let aqk = a[(q, k)];
                    a[(p, k)] = c * apk - s * aqk;
                    a[(q, k)] = s * apk + c * aqk;
                }
                // V <- V J
                for k in 0..n {
                    let vkp = v[(k, p)];
                    let vkq = v[(k, q)];
                    v[(k, p)] = c * vkp - s * vkq;
                    v[(k, q)] = s * vkp + c * vkq;
                }
            }
        }
    }

    (a.diag().to_owned(), v)
}

/// Project every row of `dataset` onto its first two principal components.
///
/// The projection is fitted on the whole dataset, not on a training split.
pub fn project(dataset: &Dataset) -> Result<Projection> {
    if dataset.ncols() < 2 {
        return Err(ClassifierError::InsufficientFeatures {
            found: dataset.ncols(),
        });
    }

    let pca = Pca::fit(dataset.records.view(), 2)?;
    let coords = pca.transform(dataset.records.view())?;
    let ratio = pca.explained_variance_ratio();

    log::debug!(
        "PCA on {} rows: explained variance ratio [{:.4}, {:.4}]",
        dataset.nrows(),
        ratio[0],
        ratio[1]
    );

    Ok(Projection {
        x: coords.column(0).to_vec(),
        y: coords.column(1).to_vec(),
        labels: dataset.targets.to_vec(),
        explained_variance_ratio: [ratio[0], ratio[1]],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_jacobi_diagonal_matrix() {
        let (values, vectors) = jacobi_eigen(array![[3.0, 0.0], [0.0, 1.0]]);
        assert_eq!(values.to_vec(), vec![3.0, 1.0]);
        assert_eq!(vectors, Array2::<f64>::eye(2));
    }

    #[test]
    fn test_jacobi_reconstructs_matrix() {
        let a = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.5, 0.2, 1.0]];
        let (values, vectors) = jacobi_eigen(a.clone());
        let rebuilt = vectors.dot(&Array2::from_diag(&values)).dot(&vectors.t());
        for (x, y) in rebuilt.iter().zip(a.iter()) {
            assert!((x - y).abs() < 1e-9, "{} != {}", x, y);
        }
    }

    #[test]
    fn test_points_on_a_line() {
        let x = array![[0.0, 0.0], [1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let pca = Pca::fit(x.view(), 2).unwrap();
        let ratio = pca.explained_variance_ratio();
        assert!((ratio[0] - 1.0).abs() < 1e-9);
        assert!(ratio[1].abs() < 1e-9);

        let first = pca.components().row(0).to_owned();
        let norm = 5f64.sqrt();
        assert!((first[0] - 1.0 / norm).abs() < 1e-9);
        assert!((first[1] - 2.0 / norm).abs() < 1e-9);
    }

    #[test]
    fn test_dominant_loading_is_positive() {
        let x = array![[2.0, -1.0, 0.3], [-2.0, 1.1, 0.1], [1.0, -0.4, -0.2], [-1.0, 0.5, 0.0]];
        let pca = Pca::fit(x.view(), 2).unwrap();
        for row in pca.components().outer_iter() {
            assert!(dominant_loading(&row.to_owned()) > 0.0);
        }
    }

    #[test]
    fn test_invalid_component_count() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(Pca::fit(x.view(), 3).is_err());
        assert!(Pca::fit(x.view(), 0).is_err());
    }

    #[test]
    fn test_single_column_projection_fails() {
        let ds = Dataset::new(array![[1.0], [2.0]], array![0usize, 1], vec![], vec![]).unwrap();
        assert!(matches!(
            project(&ds),
            Err(ClassifierError::InsufficientFeatures { found: 1 })
        ));
    }

    #[test]
    fn test_constant_data_has_zero_ratios() {
        let x = Array2::<f64>::ones((5, 3));
        let pca = Pca::fit(x.view(), 2).unwrap();
        assert_eq!(pca.explained_variance_ratio().to_vec(), vec![0.0, 0.0]);
    }
}
