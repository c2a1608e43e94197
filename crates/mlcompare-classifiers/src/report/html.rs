use maud::html;

use crate::config::ModelConfig;
use crate::datasets::{Dataset, DatasetId};
use crate::evaluation::EvaluationResult;
use crate::projection::Projection;
use crate::report::builder::{Report, ReportSection};
use crate::report::plots::{
    plot_feature_boxplots, plot_feature_histograms, plot_pairplot, plot_projection,
};
use crate::summary::FeatureGroup;

/// Everything one run produced, borrowed for rendering.
pub struct ReportContext<'a> {
    pub dataset_id: DatasetId,
    pub dataset: &'a Dataset,
    pub model: &'a ModelConfig,
    pub evaluation: &'a EvaluationResult,
    pub projection: &'a Projection,
    pub feature_groups: &'a [FeatureGroup],
    pub test_fraction: f64,
    pub seed: u64,
}

/// Assemble the report sections for one run.
pub fn build_report(ctx: &ReportContext<'_>) -> Report {
    let mut report = Report::new(
        "mlcompare",
        env!("CARGO_PKG_VERSION"),
        None,
        &format!("{} DATASET | {}", ctx.dataset_id, ctx.model.kind),
    );

    /* Section 1: Overview */
    {
        let mut overview = ReportSection::new("Overview");
        let (rows, cols) = ctx.dataset.shape();
        overview.add_content(html! {
            table {
                tr { th class="label" { "SHAPE OF DATASET" } td { "(" (rows) ", " (cols) ")" } }
                tr { th class="label" { "NUMBER OF CLASSES" } td { (ctx.dataset.n_classes()) } }
                tr { th class="label" { "CLASSIFIER" } td { (ctx.model.kind.to_string()) } }
                tr { th class="label" { "HYPERPARAMETERS" } td { (ctx.model.hyperparameters.to_string()) } }
                tr { th class="label" { "ACCURACY" } td { (ctx.evaluation.accuracy.to_string()) } }
                tr {
                    th class="label" { "TEST ROWS" }
                    td { (ctx.evaluation.n_correct) " / " (ctx.evaluation.n_test) " correct" }
                }
                tr { th class="label" { "TRAIN ROWS" } td { (ctx.evaluation.n_train) } }
                tr { th class="label" { "TEST FRACTION" } td { (ctx.test_fraction.to_string()) } }
                tr { th class="label" { "SEED" } td { (ctx.seed) } }
            }
        });
        report.add_section(overview);
    }

    /* Section 2: PCA */
    {
        let mut pca = ReportSection::new("PCA Projection");
        pca.add_content(html! {
            p { "All rows projected onto the first two principal components, coloured by class." }
        });
        pca.add_plot(plot_projection(ctx.projection, ctx.dataset));
        report.add_section(pca);
    }

    /* Section 3: Per-class statistics */
    {
        let mut stats = ReportSection::new("Class Summaries");
        stats.add_content(html! {
            table {
                tr {
                    th class="label" { "Feature" }
                    th class="label" { "Class" }
                    th { "n" } th { "mean" } th { "std" } th { "min" }
                    th { "q1" } th { "median" } th { "q3" } th { "max" }
                }
                @for group in ctx.feature_groups {
                    @for s in &group.summaries {
                        tr {
                            td class="label" { (group.name) }
                            td class="label" { (s.class_name) }
                            td { (s.count) }
                            td { (format!("{:.3}", s.mean)) }
                            td { (format!("{:.3}", s.std)) }
                            td { (format!("{:.3}", s.min)) }
                            td { (format!("{:.3}", s.q1)) }
                            td { (format!("{:.3}", s.median)) }
                            td { (format!("{:.3}", s.q3)) }
                            td { (format!("{:.3}", s.max)) }
                        }
                    }
                }
            }
        });
        report.add_section(stats);
    }

    /* Section 4: Distributions */
    {
        let mut histograms = ReportSection::new("Feature Distributions");
        for plot in plot_feature_histograms(ctx.dataset, ctx.feature_groups) {
            histograms.add_plot(plot);
        }
        report.add_section(histograms);

        let mut boxplots = ReportSection::new("Feature Boxplots");
        for plot in plot_feature_boxplots(ctx.dataset, ctx.feature_groups) {
            boxplots.add_plot(plot);
        }
        report.add_section(boxplots);
    }

    /* Section 5: Pair plot */
    {
        let mut pairs = ReportSection::new("Pair Plot");
        pairs.add_plot(plot_pairplot(ctx.dataset));
        report.add_section(pairs);
    }

    report
}

/// Render the full HTML page for one run.
pub fn render_report(ctx: &ReportContext<'_>) -> String {
    build_report(ctx).render().into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierKind;
    use crate::datasets::load;
    use crate::evaluation::{evaluate, DEFAULT_TEST_FRACTION};
    use crate::models::factory::build_model;
    use crate::projection::project;
    use crate::summary::feature_groups;

    #[test]
    fn test_render_report() {
        let dataset = load(DatasetId::Iris).unwrap();
        let model = ModelConfig::with_defaults(ClassifierKind::Knn);
        let mut classifier = build_model(&model).unwrap();
        let evaluation = evaluate(&dataset, classifier.as_mut(), DEFAULT_TEST_FRACTION, 1234).unwrap();
        let projection = project(&dataset).unwrap();
        let groups = feature_groups(&dataset);

        let ctx = ReportContext {
            dataset_id: DatasetId::Iris,
            dataset: &dataset,
            model: &model,
            evaluation: &evaluation,
            projection: &projection,
            feature_groups: &groups,
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: 1234,
        };

        let report = build_report(&ctx);
        let titles: Vec<&str> = report.sections().iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Overview",
                "PCA Projection",
                "Class Summaries",
                "Feature Distributions",
                "Feature Boxplots",
                "Pair Plot"
            ]
        );

        let page = render_report(&ctx);
        assert!(page.contains("IRIS DATASET | KNN"));
        assert!(page.contains("(150, 4)"));
        assert!(page.contains("{K=1}"));
        assert!(page.contains("Feature 3 Distribution"));
    }
}
