use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::Svm;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::Classifier;
use crate::models::utils::{argmax, check_fit_inputs, check_predict_inputs, unique_labels};

/// Binary SVM trained on the rows of two classes; `true` means `positive`.
struct PairwiseSvm {
    positive: usize,
    negative: usize,
    model: Svm<f64, bool>,
}

enum FittedSvm {
    /// Only one class was present in the training data.
    Constant(usize),
    OneVsOne {
        classes: Vec<usize>,
        machines: Vec<PairwiseSvm>,
    },
}

/// Support vector classifier with an RBF kernel.
///
/// The kernel width follows the usual `gamma = 1 / (n_features * Var(X))`
/// scaling. Problems with more than two classes are decomposed one-vs-one and
/// resolved by majority vote, ties going to the smallest label.
pub struct SvmClassifier {
    c: f64,
    model: Option<FittedSvm>,
    n_features: usize,
}

impl SvmClassifier {
    pub fn new(c: f64) -> Self {
        SvmClassifier {
            c,
            model: None,
            n_features: 0,
        }
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    /// linfa's Gaussian kernel is `exp(-|x - y|^2 / eps)`, i.e. `eps = 1 / gamma`.
    fn kernel_eps(x: &ArrayView2<'_, f64>) -> f64 {
        let n = x.len() as f64;
        let mean = x.sum() / n;
        let var = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        if var > 0.0 {
            x.ncols() as f64 * var
        } else {
            1.0
        }
    }

    fn fit_pair(
        &self,
        x: &ArrayView2<'_, f64>,
        y: &ArrayView1<'_, usize>,
        positive: usize,
        negative: usize,
        eps: f64,
    ) -> Result<PairwiseSvm> {
        let rows: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == positive || label == negative)
            .map(|(i, _)| i)
            .collect();

        let records: Array2<f64> = x.select(Axis(0), &rows);
        let targets: Array1<bool> = rows.iter().map(|&i| y[i] == positive).collect();
        let dataset = Dataset::new(records, targets);

        let params = Svm::<f64, bool>::params()
            .pos_neg_weights(self.c, self.c)
            .gaussian_kernel(eps);

        let model = params
            .fit(&dataset)
            .map_err(|e| ClassifierError::Fit(format!("SVM {} vs {}: {}", positive, negative, e)))?;

        Ok(PairwiseSvm {
            positive,
            negative,
            model,
        })
    }
}

impl Classifier for SvmClassifier {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, usize>) -> Result<()> {
        check_fit_inputs(&x, &y)?;
        self.n_features = x.ncols();

        let classes = unique_labels(&y);
        if classes.len() == 1 {
            log::debug!("SVM fitted on a single class ({}); predicting it everywhere", classes[0]);
            self.model = Some(FittedSvm::Constant(classes[0]));
            return Ok(());
        }

        let eps = Self::kernel_eps(&x);
        let mut machines = Vec::with_capacity(classes.len() * (classes.len() - 1) / 2);
        for (i, &positive) in classes.iter().enumerate() {
            for &negative in &classes[i + 1..] {
                machines.push(self.fit_pair(&x, &y, positive, negative, eps)?);
            }
        }

        log::debug!(
            "SVM fitted: C = {}, gamma = {:.6}, {} classes, {} binary machines",
            self.c,
            1.0 / eps,
            classes.len(),
            machines.len()
        );
        self.model = Some(FittedSvm::OneVsOne { classes, machines });
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotFitted)?;
        check_predict_inputs(self.n_features, &x)?;

        match model {
            FittedSvm::Constant(label) => Ok(Array1::from_elem(x.nrows(), *label)),
            FittedSvm::OneVsOne { classes, machines } => {
                let records = x.to_owned();
                let max_label = classes.iter().copied().max().unwrap_or(0);
                let mut votes = Array2::<usize>::zeros((x.nrows(), max_label + 1));

                for machine in machines {
                    let pred: Array1<bool> = machine.model.predict(&records);
                    for (row, &is_positive) in pred.iter().enumerate() {
                        let winner = if is_positive {
                            machine.positive
                        } else {
                            machine.negative
                        };
                        votes[(row, winner)] += 1;
                    }
                }

                Ok(votes
                    .outer_iter()
                    .map(|row| argmax(&row.to_vec()))
                    .collect())
            }
        }
    }

    fn name(&self) -> &str {
        "SVM"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn blobs() -> (Array2<f64>, Array1<usize>) {
        let x = array![
            [0.0, 0.0],
            [0.2, 0.1],
            [0.1, 0.3],
            [-0.2, 0.1],
            [5.0, 5.0],
            [5.2, 4.9],
            [4.8, 5.1],
            [5.1, 5.3],
            [0.0, 5.0],
            [0.2, 5.1],
            [-0.1, 4.8],
            [0.1, 5.2]
        ];
        let y = array![0usize, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2];
        (x, y)
    }

    #[test]
    fn test_svm_classifier() {
        let (x, y) = blobs();
        let mut svm = SvmClassifier::new(1.0);
        svm.fit(x.view(), y.view()).unwrap();

        let pred = svm.predict(x.view()).unwrap();
        assert_eq!(pred.len(), y.len());
        let correct = pred.iter().zip(y.iter()).filter(|(p, t)| p == t).count();
        assert!(correct >= 10, "only {} of 12 training rows recovered", correct);
    }

    #[test]
    fn test_single_class_predicts_constant() {
        let x = array![[0.0, 1.0], [1.0, 0.0]];
        let y = array![1usize, 1];
        let mut svm = SvmClassifier::new(1.0);
        svm.fit(x.view(), y.view()).unwrap();
        let pred = svm.predict(array![[3.0, 3.0]].view()).unwrap();
        assert_eq!(pred.to_vec(), vec![1]);
    }

    #[test]
    fn test_constant_features_use_unit_gamma() {
        let x = Array2::<f64>::ones((3, 2));
        assert_eq!(SvmClassifier::kernel_eps(&x.view()), 1.0);
    }

    #[test]
    fn test_predict_before_fit() {
        let svm = SvmClassifier::new(1.0);
        assert!(matches!(
            svm.predict(array![[0.0, 0.0]].view()),
            Err(ClassifierError::NotFitted)
        ));
    }
}
