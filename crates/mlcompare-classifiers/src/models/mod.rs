pub mod classifier_trait;
pub mod factory;
pub mod knn;
pub mod random_forest;
pub mod svm;
pub mod utils;

pub use classifier_trait::Classifier;
pub use knn::KnnClassifier;
pub use random_forest::RandomForestClassifier;
pub use svm::SvmClassifier;
