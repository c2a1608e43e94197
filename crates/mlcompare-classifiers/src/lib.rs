//! mlcompare-classifiers: compare simple classifiers on classic toy datasets.
//!
//! The crate bundles the Iris, Breast Cancer and Wine datasets, three
//! classifier families (KNN, RBF-kernel SVM and random forest) behind a common
//! `Classifier` trait, a seeded train/test evaluation, a two-component PCA
//! projection and an HTML report with plotly figures.
//!
//! A typical run is `datasets::load` -> `models::factory::create` ->
//! `evaluation::evaluate` -> `projection::project`.
pub mod config;
pub mod datasets;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod projection;
pub mod report;
pub mod summary;

pub use error::{ClassifierError, Result};
