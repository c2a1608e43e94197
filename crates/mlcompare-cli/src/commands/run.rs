use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use mlcompare_classifiers::config::{ClassifierKind, Hyperparameters, ModelConfig};
use mlcompare_classifiers::datasets::{self, DatasetId};
use mlcompare_classifiers::evaluation::{evaluate, EvaluationResult, DEFAULT_TEST_FRACTION};
use mlcompare_classifiers::models::factory;
use mlcompare_classifiers::projection::project;
use mlcompare_classifiers::report::{render_report, ReportContext};
use mlcompare_classifiers::summary::feature_groups;

pub const DEFAULT_SEED: u64 = 1234;

/// Settings of a single `run`, as read from JSON.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub dataset: String,
    pub model: ModelConfig,
    pub test_fraction: f64,
    pub seed: u64,
    pub report: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            dataset: DatasetId::Iris.display_name().to_string(),
            model: ModelConfig::default(),
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            report: true,
        }
    }
}

/// Load a run configuration from a JSON file.
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: RunConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

impl RunConfig {
    /// Start from the config file (or the defaults) and apply command-line
    /// overrides.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_run_config(path)?,
            None => RunConfig::default(),
        };

        if let Some(dataset) = matches.get_one::<String>("dataset") {
            config.dataset = dataset.clone();
        }

        if let Some(classifier) = matches.get_one::<String>("classifier") {
            let kind: ClassifierKind = classifier.parse()?;
            if kind != config.model.kind {
                config.model = ModelConfig::new(kind, Hyperparameters::new());
            }
        }

        if let Some(assignments) = matches.get_many::<String>("param") {
            for assignment in assignments {
                let (name, value) = Hyperparameters::parse_assignment(assignment)?;
                config.model.hyperparameters.set(&name, value);
            }
        }

        if let Some(test_fraction) = matches.get_one::<f64>("test_fraction") {
            config.test_fraction = *test_fraction;
        }

        if let Some(seed) = matches.get_one::<u64>("seed") {
            config.seed = *seed;
        }

        if matches.get_flag("no_report") {
            config.report = false;
        }

        Ok(config)
    }

    /// Model config with every hyperparameter the kind needs, defaults
    /// filling the gaps.
    pub fn resolved_model(&self) -> ModelConfig {
        let mut params = self.model.kind.default_hyperparameters();
        for (name, value) in self.model.hyperparameters.iter() {
            params.set(name, value);
        }
        ModelConfig::new(self.model.kind, params)
    }
}

/// Default report file name, e.g. `mlcompare_iris_knn.html`.
pub fn report_file_name(dataset: DatasetId, kind: ClassifierKind) -> String {
    format!("mlcompare_{}_{}.html", dataset.slug(), kind.slug())
}

/// What a run printed and wrote.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub dataset: DatasetId,
    pub shape: (usize, usize),
    pub n_classes: usize,
    pub model: ModelConfig,
    pub evaluation: EvaluationResult,
    pub report_path: Option<PathBuf>,
}

impl RunOutcome {
    pub fn write_summary<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "SHAPE OF DATASET: ({}, {})", self.shape.0, self.shape.1)?;
        writeln!(out, "NUMBER OF CLASSES: {}", self.n_classes)?;
        writeln!(out, "CLASSIFIER: {}", self.model.kind)?;
        writeln!(out, "ACCURACY: {}", self.evaluation.accuracy)?;
        Ok(())
    }
}

/// Load the dataset, train and score the classifier and, unless disabled,
/// write the HTML report to `output` (or the default file name).
pub fn run(config: &RunConfig, output: Option<&Path>) -> Result<RunOutcome> {
    let start_time = Instant::now();
    let dataset_id: DatasetId = config.dataset.parse()?;
    let dataset = datasets::load(dataset_id)?;
    let model = config.resolved_model();

    log::info!(
        "[mlcompare::run] {} dataset {:?} with {} {}",
        dataset_id,
        dataset.shape(),
        model.kind,
        model.hyperparameters
    );

    let mut classifier = factory::build_model(&model)
        .with_context(|| format!("Invalid hyperparameters for {}", model.kind))?;
    let evaluation = evaluate(&dataset, classifier.as_mut(), config.test_fraction, config.seed)
        .with_context(|| format!("Evaluation of {} on {} failed", model.kind, dataset_id))?;
    log::info!(
        "[mlcompare::run] Accuracy {:.4} ({}/{}) in {:?}",
        evaluation.accuracy,
        evaluation.n_correct,
        evaluation.n_test,
        start_time.elapsed()
    );

    let report_path = if config.report {
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(report_file_name(dataset_id, model.kind)));

        let projection = project(&dataset)?;
        let groups = feature_groups(&dataset);
        let ctx = ReportContext {
            dataset_id,
            dataset: &dataset,
            model: &model,
            evaluation: &evaluation,
            projection: &projection,
            feature_groups: &groups,
            test_fraction: config.test_fraction,
            seed: config.seed,
        };
        write_report(&ctx, &path)?;
        Some(path)
    } else {
        None
    };

    Ok(RunOutcome {
        dataset: dataset_id,
        shape: dataset.shape(),
        n_classes: dataset.n_classes(),
        model,
        evaluation,
        report_path,
    })
}

/// Render the report for `ctx` and write it to `path`.
pub fn write_report(ctx: &ReportContext<'_>, path: &Path) -> Result<()> {
    let html = render_report(ctx);
    fs::write(path, html).with_context(|| format!("Failed to write report: {}", path.display()))?;
    log::info!("[mlcompare::run] Report written to: {}", path.display());
    Ok(())
}
