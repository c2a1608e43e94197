use thiserror::Error;

/// Errors raised by the dataset catalog, the classifier factory, the
/// evaluation pipeline and the projection.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("unknown dataset: {0}. Valid options are: IRIS, BREAST CANCER, WINE")]
    UnknownDataset(String),

    #[error("unknown classifier: {0}. Valid options are: KNN, SVM, RANDOM FOREST")]
    UnknownClassifier(String),

    #[error("invalid hyperparameter `{name}`: {reason}")]
    InvalidHyperparameter { name: String, reason: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("projection needs at least 2 feature columns, found {found}")]
    InsufficientFeatures { found: usize },

    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error("model must be fitted before calling predict")]
    NotFitted,

    #[error("model fitting failed: {0}")]
    Fit(String),

    #[error("failed to parse embedded dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed dataset: {0}")]
    MalformedData(String),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

impl ClassifierError {
    pub(crate) fn hyperparameter(name: &str, reason: impl Into<String>) -> Self {
        ClassifierError::InvalidHyperparameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
