use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// Supported classifier families.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    Knn,
    Svm,
    RandomForest,
}

impl ClassifierKind {
    pub const ALL: [ClassifierKind; 3] = [
        ClassifierKind::Knn,
        ClassifierKind::Svm,
        ClassifierKind::RandomForest,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ClassifierKind::Knn => "KNN",
            ClassifierKind::Svm => "SVM",
            ClassifierKind::RandomForest => "RANDOM FOREST",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ClassifierKind::Knn => "knn",
            ClassifierKind::Svm => "svm",
            ClassifierKind::RandomForest => "random_forest",
        }
    }

    /// Hyperparameters exposed for this kind, with the slider ranges of the
    /// interactive front end.
    pub fn hyperparameter_specs(&self) -> &'static [HyperparameterSpec] {
        match self {
            ClassifierKind::Knn => &[HyperparameterSpec {
                name: "K",
                min: 1.0,
                max: 15.0,
                default: 1.0,
                integer: true,
            }],
            ClassifierKind::Svm => &[HyperparameterSpec {
                name: "C",
                min: 0.01,
                max: 10.0,
                default: 0.01,
                integer: false,
            }],
            ClassifierKind::RandomForest => &[
                HyperparameterSpec {
                    name: "max_depth",
                    min: 2.0,
                    max: 15.0,
                    default: 2.0,
                    integer: true,
                },
                HyperparameterSpec {
                    name: "n_estimators",
                    min: 1.0,
                    max: 100.0,
                    default: 1.0,
                    integer: true,
                },
            ],
        }
    }

    /// Hyperparameter set populated with every default for this kind.
    pub fn default_hyperparameters(&self) -> Hyperparameters {
        let mut params = Hyperparameters::new();
        for spec in self.hyperparameter_specs() {
            params.set(spec.name, spec.default);
        }
        params
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ClassifierKind {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "knn" => Ok(ClassifierKind::Knn),
            "svm" => Ok(ClassifierKind::Svm),
            "random forest" | "random_forest" | "random-forest" | "rf" => {
                Ok(ClassifierKind::RandomForest)
            }
            _ => Err(ClassifierError::UnknownClassifier(s.to_string())),
        }
    }
}

/// Range and default of one tunable hyperparameter.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct HyperparameterSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub integer: bool,
}

/// Named numeric hyperparameters, e.g. `{"K": 5}` or `{"C": 1.0}`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Hyperparameters(BTreeMap<String, f64>);

impl Hyperparameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a `NAME=VALUE` pair as given on the command line.
    pub fn parse_assignment(s: &str) -> Result<(String, f64)> {
        let (name, value) = s.split_once('=').ok_or_else(|| {
            ClassifierError::InvalidParameter(format!("expected NAME=VALUE, got '{}'", s))
        })?;
        let name = name.trim();
        let value = value.trim().parse::<f64>().map_err(|_| {
            ClassifierError::hyperparameter(name, format!("'{}' is not a number", value.trim()))
        })?;
        Ok((name.to_string(), value))
    }

    pub(crate) fn require(&self, name: &str) -> Result<f64> {
        let value = self
            .get(name)
            .ok_or_else(|| ClassifierError::hyperparameter(name, "missing"))?;
        if !value.is_finite() {
            return Err(ClassifierError::hyperparameter(name, "must be finite"));
        }
        Ok(value)
    }

    /// Fetch an integer parameter and check it is at least `min`.
    pub(crate) fn require_int(&self, name: &str, min: i64) -> Result<usize> {
        let value = self.require(name)?;
        if value.fract() != 0.0 {
            return Err(ClassifierError::hyperparameter(
                name,
                format!("must be an integer, got {}", value),
            ));
        }
        if value < min as f64 {
            return Err(ClassifierError::hyperparameter(
                name,
                format!("must be >= {}, got {}", min, value),
            ));
        }
        Ok(value as usize)
    }

    pub(crate) fn optional_int(&self, name: &str, min: i64) -> Result<Option<usize>> {
        match self.get(name) {
            Some(_) => self.require_int(name, min).map(Some),
            None => Ok(None),
        }
    }
}

impl fmt::Display for Hyperparameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// A classifier choice together with its hyperparameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub kind: ClassifierKind,
    #[serde(default)]
    pub hyperparameters: Hyperparameters,
}

impl ModelConfig {
    pub fn new(kind: ClassifierKind, hyperparameters: Hyperparameters) -> Self {
        Self {
            kind,
            hyperparameters,
        }
    }

    /// Config for `kind` with every hyperparameter at its default.
    pub fn with_defaults(kind: ClassifierKind) -> Self {
        Self::new(kind, kind.default_hyperparameters())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::with_defaults(ClassifierKind::Knn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("KNN".parse::<ClassifierKind>().unwrap(), ClassifierKind::Knn);
        assert_eq!("svm".parse::<ClassifierKind>().unwrap(), ClassifierKind::Svm);
        assert_eq!(
            "RANDOM FOREST".parse::<ClassifierKind>().unwrap(),
            ClassifierKind::RandomForest
        );
        assert_eq!("rf".parse::<ClassifierKind>().unwrap(), ClassifierKind::RandomForest);
        assert!(matches!(
            "gbdt".parse::<ClassifierKind>(),
            Err(ClassifierError::UnknownClassifier(_))
        ));
    }

    #[test]
    fn test_default_hyperparameters_match_specs() {
        let params = ClassifierKind::RandomForest.default_hyperparameters();
        assert_eq!(params.get("max_depth"), Some(2.0));
        assert_eq!(params.get("n_estimators"), Some(1.0));
        assert_eq!(params.get("C"), None);
    }

    #[test]
    fn test_require_int_rejects_fractions() {
        let params = Hyperparameters::new().with("K", 2.5);
        assert!(params.require_int("K", 1).is_err());
    }

    #[test]
    fn test_parse_assignment() {
        let (name, value) = Hyperparameters::parse_assignment("C=0.5").unwrap();
        assert_eq!(name, "C");
        assert_eq!(value, 0.5);
        assert!(Hyperparameters::parse_assignment("C").is_err());
        assert!(Hyperparameters::parse_assignment("C=abc").is_err());
    }

    #[test]
    fn test_display() {
        let params = Hyperparameters::new().with("n_estimators", 10.0).with("max_depth", 3.0);
        assert_eq!(params.to_string(), "{max_depth=3, n_estimators=10}");
    }
}
