use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::Classifier;
use crate::models::utils::{argmax, check_fit_inputs, check_predict_inputs};

/// k-nearest-neighbours classifier with Euclidean distance and uniform
/// voting.
///
/// Fitting only memorises the training rows. At prediction time the `k`
/// closest rows vote; a tie between classes goes to the smallest label and
/// rows at equal distance keep their training order.
pub struct KnnClassifier {
    k: usize,
    train_x: Option<Array2<f64>>,
    train_y: Option<Array1<usize>>,
    n_classes: usize,
}

impl KnnClassifier {
    pub fn new(k: usize) -> Self {
        KnnClassifier {
            k,
            train_x: None,
            train_y: None,
            n_classes: 0,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>, train_x: &Array2<f64>, train_y: &Array1<usize>) -> usize {
        let mut distances: Vec<(f64, usize)> = train_x
            .outer_iter()
            .enumerate()
            .map(|(i, train_row)| {
                let d: f64 = row
                    .iter()
                    .zip(train_row.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                (d, i)
            })
            .collect();

        // Stable sort keeps training order among equal distances.
        distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut votes = vec![0usize; self.n_classes];
        for &(_, idx) in distances.iter().take(self.k) {
            votes[train_y[idx]] += 1;
        }
        argmax(&votes)
    }
}

impl Classifier for KnnClassifier {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, usize>) -> Result<()> {
        check_fit_inputs(&x, &y)?;
        if self.k > x.nrows() {
            return Err(ClassifierError::hyperparameter(
                "K",
                format!("{} neighbours requested but only {} training rows", self.k, x.nrows()),
            ));
        }

        self.n_classes = y.iter().max().map_or(0, |&m| m + 1);
        self.train_x = Some(x.to_owned());
        self.train_y = Some(y.to_owned());

        log::debug!(
            "KNN fitted: k = {}, {} training rows, {} classes",
            self.k,
            x.nrows(),
            self.n_classes
        );
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        let (train_x, train_y) = match (&self.train_x, &self.train_y) {
            (Some(tx), Some(ty)) => (tx, ty),
            _ => return Err(ClassifierError::NotFitted),
        };
        check_predict_inputs(train_x.ncols(), &x)?;

        Ok(x
            .outer_iter()
            .map(|row| self.predict_row(row, train_x, train_y))
            .collect())
    }

    fn name(&self) -> &str {
        "KNN"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_knn_classifier() {
        let x = array![
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [5.0, 5.0],
            [5.1, 5.0],
            [5.0, 5.1]
        ];
        let y = array![0usize, 0, 0, 1, 1, 1];

        let mut knn = KnnClassifier::new(3);
        knn.fit(x.view(), y.view()).unwrap();

        let test = array![[0.05, 0.05], [4.9, 5.2]];
        let pred = knn.predict(test.view()).unwrap();
        assert_eq!(pred.to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_k_equal_one_memorises_training_set() {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let y = array![2usize, 0, 1];
        let mut knn = KnnClassifier::new(1);
        knn.fit(x.view(), y.view()).unwrap();
        assert_eq!(knn.predict(x.view()).unwrap(), y);
    }

    #[test]
    fn test_vote_tie_goes_to_smallest_label() {
        let x = array![[0.0], [2.0]];
        let y = array![1usize, 0];
        let mut knn = KnnClassifier::new(2);
        knn.fit(x.view(), y.view()).unwrap();
        let pred = knn.predict(array![[1.0]].view()).unwrap();
        assert_eq!(pred[0], 0);
    }

    #[test]
    fn test_k_larger_than_training_set_fails() {
        let x = array![[0.0], [1.0]];
        let y = array![0usize, 1];
        let mut knn = KnnClassifier::new(3);
        assert!(matches!(
            knn.fit(x.view(), y.view()),
            Err(ClassifierError::InvalidHyperparameter { .. })
        ));
    }

    #[test]
    fn test_predict_before_fit() {
        let knn = KnnClassifier::new(1);
        assert!(matches!(
            knn.predict(array![[0.0]].view()),
            Err(ClassifierError::NotFitted)
        ));
    }

    #[test]
    fn test_feature_count_mismatch() {
        let mut knn = KnnClassifier::new(1);
        knn.fit(array![[0.0, 1.0]].view(), array![0usize].view()).unwrap();
        assert!(knn.predict(array![[0.0]].view()).is_err());
    }
}
