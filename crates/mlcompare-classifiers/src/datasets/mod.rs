//! Built-in toy datasets and the `Dataset` container.
//!
//! The three classic classification sets (Iris, Breast Cancer Wisconsin and
//! Wine recognition) are embedded in the library as CSV text and parsed on
//! every `load`, so callers always get a fresh, independent copy.
use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

mod reader;

const IRIS_CSV: &str = include_str!("../../data/iris.csv");
const BREAST_CANCER_CSV: &str = include_str!("../../data/breast_cancer.csv");
const WINE_CSV: &str = include_str!("../../data/wine.csv");

/// Identifier of a built-in dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetId {
    Iris,
    BreastCancer,
    Wine,
}

impl DatasetId {
    pub const ALL: [DatasetId; 3] = [DatasetId::Iris, DatasetId::BreastCancer, DatasetId::Wine];

    /// Upper-case label used in headings and selection lists.
    pub fn display_name(&self) -> &'static str {
        match self {
            DatasetId::Iris => "IRIS",
            DatasetId::BreastCancer => "BREAST CANCER",
            DatasetId::Wine => "WINE",
        }
    }

    /// Short machine-friendly name, used for file names.
    pub fn slug(&self) -> &'static str {
        match self {
            DatasetId::Iris => "iris",
            DatasetId::BreastCancer => "breast_cancer",
            DatasetId::Wine => "wine",
        }
    }

    fn target_names(&self) -> &'static [&'static str] {
        match self {
            DatasetId::Iris => &["setosa", "versicolor", "virginica"],
            DatasetId::BreastCancer => &["malignant", "benign"],
            DatasetId::Wine => &["class_0", "class_1", "class_2"],
        }
    }

    fn csv(&self) -> &'static str {
        match self {
            DatasetId::Iris => IRIS_CSV,
            DatasetId::BreastCancer => BREAST_CANCER_CSV,
            DatasetId::Wine => WINE_CSV,
        }
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for DatasetId {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "iris" => Ok(DatasetId::Iris),
            "breast cancer" | "breast_cancer" | "breast-cancer" => Ok(DatasetId::BreastCancer),
            "wine" => Ok(DatasetId::Wine),
            _ => Err(ClassifierError::UnknownDataset(s.to_string())),
        }
    }
}

/// A feature matrix with one integer class label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Samples as rows, features as columns.
    pub records: Array2<f64>,
    /// Class index (0-based) of every row.
    pub targets: Array1<usize>,
    pub feature_names: Vec<String>,
    pub target_names: Vec<String>,
}

impl Dataset {
    /// Build a dataset, checking that rows, labels and names line up.
    ///
    /// Class names default to `class_<i>` when `target_names` is empty.
    pub fn new(
        records: Array2<f64>,
        targets: Array1<usize>,
        feature_names: Vec<String>,
        target_names: Vec<String>,
    ) -> Result<Self> {
        if records.nrows() != targets.len() {
            return Err(ClassifierError::ShapeMismatch {
                rows: records.nrows(),
                labels: targets.len(),
            });
        }

        let feature_names = if feature_names.is_empty() {
            (0..records.ncols()).map(|i| format!("feature_{}", i)).collect()
        } else {
            feature_names
        };
        if feature_names.len() != records.ncols() {
            return Err(ClassifierError::MalformedData(format!(
                "{} feature names for {} columns",
                feature_names.len(),
                records.ncols()
            )));
        }

        let n_classes = targets.iter().max().map_or(0, |&m| m + 1);
        let target_names = if target_names.is_empty() {
            (0..n_classes).map(|i| format!("class_{}", i)).collect()
        } else {
            target_names
        };
        if n_classes > target_names.len() {
            return Err(ClassifierError::MalformedData(format!(
                "label {} has no class name ({} names given)",
                n_classes - 1,
                target_names.len()
            )));
        }

        Ok(Dataset {
            records,
            targets,
            feature_names,
            target_names,
        })
    }

    pub fn nrows(&self) -> usize {
        self.records.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.records.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.records.dim()
    }

    /// Number of distinct labels that actually occur in `targets`.
    pub fn n_classes(&self) -> usize {
        self.class_counts().iter().filter(|&&c| c > 0).count()
    }

    /// Row count per class index, indexed like `target_names`.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.target_names.len()];
        for &label in self.targets.iter() {
            counts[label] += 1;
        }
        counts
    }

    pub fn targets_view(&self) -> ArrayView1<'_, usize> {
        self.targets.view()
    }

    /// Copy the given rows (in the given order) into a new dataset.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            records: self.records.select(ndarray::Axis(0), indices),
            targets: self.targets.select(ndarray::Axis(0), indices),
            feature_names: self.feature_names.clone(),
            target_names: self.target_names.clone(),
        }
    }
}

/// Load one of the built-in datasets.
pub fn load(id: DatasetId) -> Result<Dataset> {
    let (records, targets, feature_names) = reader::parse_labelled_csv(id.csv())?;
    let target_names = id.target_names().iter().map(|s| s.to_string()).collect();
    let dataset = Dataset::new(records, targets, feature_names, target_names)?;
    log::debug!(
        "Loaded {} dataset: {} rows, {} features, {} classes",
        id,
        dataset.nrows(),
        dataset.ncols(),
        dataset.n_classes()
    );
    Ok(dataset)
}

/// Load a built-in dataset by name, e.g. `"IRIS"` or `"breast_cancer"`.
pub fn load_by_name(name: &str) -> Result<Dataset> {
    load(name.parse()?)
}
