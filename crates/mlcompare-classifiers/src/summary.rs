//! Per-feature values grouped by class, with descriptive statistics.
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::datasets::Dataset;

/// Five-number summary plus mean and standard deviation of one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub class: usize,
    pub class_name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl ClassSummary {
    fn from_values(class: usize, class_name: &str, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        ClassSummary {
            class,
            class_name: class_name.to_string(),
            count: values.len(),
            mean: Statistics::mean(values.iter()),
            std: Statistics::std_dev(values.iter()),
            min: Statistics::min(values.iter()),
            q1: linear_quantile(&sorted, 0.25),
            median: linear_quantile(&sorted, 0.5),
            q3: linear_quantile(&sorted, 0.75),
            max: Statistics::max(values.iter()),
        }
    }
}

/// Quantile of an ascending, non-empty slice, interpolating linearly between
/// the two closest ranks at position `q * (n - 1)`.
fn linear_quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// One feature column split by class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureGroup {
    pub index: usize,
    pub name: String,
    /// `values_by_class[c]` holds the feature values of every row with label `c`.
    pub values_by_class: Vec<Vec<f64>>,
    pub summaries: Vec<ClassSummary>,
}

/// Group every feature column of `dataset` by class label.
///
/// Classes without rows keep an empty value list and get no summary.
pub fn feature_groups(dataset: &Dataset) -> Vec<FeatureGroup> {
    let n_classes = dataset.target_names.len();

    dataset
        .feature_names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let mut values_by_class = vec![Vec::new(); n_classes];
            for (value, &label) in dataset.records.column(index).iter().zip(dataset.targets.iter()) {
                values_by_class[label].push(*value);
            }

            let summaries = values_by_class
                .iter()
                .enumerate()
                .filter(|(_, values)| !values.is_empty())
                .map(|(class, values)| ClassSummary::from_values(class, &dataset.target_names[class], values))
                .collect();

            FeatureGroup {
                index,
                name: name.clone(),
                values_by_class,
                summaries,
            }
        })
        .collect()
}
