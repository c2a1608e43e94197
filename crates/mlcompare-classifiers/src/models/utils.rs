//! Input checks and voting helpers shared by the classifier implementations.
use ndarray::{ArrayView1, ArrayView2};

use crate::error::{ClassifierError, Result};

pub(crate) fn check_fit_inputs(x: &ArrayView2<'_, f64>, y: &ArrayView1<'_, usize>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(ClassifierError::ShapeMismatch {
            rows: x.nrows(),
            labels: y.len(),
        });
    }
    if x.nrows() == 0 {
        return Err(ClassifierError::InvalidParameter(
            "cannot fit on an empty training set".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_predict_inputs(n_features: usize, x: &ArrayView2<'_, f64>) -> Result<()> {
    if x.ncols() != n_features {
        return Err(ClassifierError::InvalidParameter(format!(
            "model was fitted on {} features but got {}",
            n_features,
            x.ncols()
        )));
    }
    Ok(())
}

/// Sorted distinct labels of `y`.
pub(crate) fn unique_labels(y: &ArrayView1<'_, usize>) -> Vec<usize> {
    let mut labels: Vec<usize> = y.iter().copied().collect();
    labels.sort_unstable();
    labels.dedup();
    labels
}

/// Index of the largest value; ties go to the lowest index.
pub(crate) fn argmax<T: PartialOrd + Copy>(values: &[T]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[1, 3, 3, 0]), 1);
        assert_eq!(argmax(&[0.5, 0.1]), 0);
        assert_eq!(argmax(&[2usize]), 0);
    }

    #[test]
    fn test_unique_labels_sorted() {
        let y = array![2usize, 0, 2, 1, 0];
        assert_eq!(unique_labels(&y.view()), vec![0, 1, 2]);
    }

    #[test]
    fn test_check_fit_inputs() {
        let x = Array2::<f64>::zeros((3, 2));
        let y = array![0usize, 1];
        assert!(check_fit_inputs(&x.view(), &y.view()).is_err());
        let empty = Array2::<f64>::zeros((0, 2));
        let no_labels = ndarray::Array1::<usize>::zeros(0);
        assert!(check_fit_inputs(&empty.view(), &no_labels.view()).is_err());
    }
}
