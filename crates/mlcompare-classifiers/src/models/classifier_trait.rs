use ndarray::{Array1, ArrayView2, ArrayView1};

use crate::error::Result;

/// Common contract of the classifiers built by the factory.
///
/// Labels are 0-based class indices. A classifier starts untrained; `fit`
/// replaces any previously learned state.
pub trait Classifier {
    /// Fit the model on rows of `x` labelled by `y`.
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, usize>) -> Result<()>;

    /// Predict one label per row of `x`.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<usize>>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
