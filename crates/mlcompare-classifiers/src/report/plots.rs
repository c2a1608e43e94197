use plotly::common::{Marker, Mode};
use plotly::layout::{Axis, BarMode, GridPattern, Layout, LayoutGrid};
use plotly::{BoxPlot, Histogram, Plot, Scatter};

use crate::datasets::Dataset;
use crate::projection::Projection;
use crate::summary::FeatureGroup;

/// Pair plots grow quadratically, so only the leading features are drawn.
pub const PAIRPLOT_MAX_FEATURES: usize = 8;

/// Viridis samples, one per class.
const CLASS_COLORS: [&str; 6] = [
    "#440154", "#21918c", "#fde725", "#3b528b", "#5ec962", "#90d743",
];

fn class_color(class: usize) -> &'static str {
    CLASS_COLORS[class % CLASS_COLORS.len()]
}

/// Scatter of the PCA projection, one trace per class.
pub fn plot_projection(projection: &Projection, dataset: &Dataset) -> Plot {
    let mut plot = Plot::new();

    for (class, name) in dataset.target_names.iter().enumerate() {
        let (xs, ys): (Vec<f64>, Vec<f64>) = projection
            .points()
            .zip(projection.labels.iter())
            .filter(|&(_, &label)| label == class)
            .map(|(point, _)| point)
            .unzip();
        if xs.is_empty() {
            continue;
        }

        plot.add_trace(
            Scatter::new(xs, ys)
                .mode(Mode::Markers)
                .name(name)
                .opacity(0.8)
                .marker(Marker::new().color(class_color(class)).size(7)),
        );
    }

    let [pc1, pc2] = projection.explained_variance_ratio;
    plot.set_layout(
        Layout::new()
            .title("PCA Projection")
            .x_axis(Axis::new().title(format!("Principal Component 1 ({:.1}%)", pc1 * 100.0).as_str()))
            .y_axis(Axis::new().title(format!("Principal Component 2 ({:.1}%)", pc2 * 100.0).as_str())),
    );

    plot
}

/// One stacked histogram per feature, coloured by class.
pub fn plot_feature_histograms(dataset: &Dataset, groups: &[FeatureGroup]) -> Vec<Plot> {
    groups
        .iter()
        .map(|group| {
            let mut plot = Plot::new();
            for (class, values) in group.values_by_class.iter().enumerate() {
                if values.is_empty() {
                    continue;
                }
                plot.add_trace(
                    Histogram::new(values.clone())
                        .name(&dataset.target_names[class])
                        .marker(Marker::new().color(class_color(class))),
                );
            }
            plot.set_layout(
                Layout::new()
                    .title(format!("Feature {} Distribution", group.index).as_str())
                    .bar_mode(BarMode::Stack)
                    .x_axis(Axis::new().title(group.name.as_str()))
                    .y_axis(Axis::new().title("Count")),
            );
            plot
        })
        .collect()
}

/// One boxplot per feature with a box for every class.
pub fn plot_feature_boxplots(dataset: &Dataset, groups: &[FeatureGroup]) -> Vec<Plot> {
    groups
        .iter()
        .map(|group| {
            let mut plot = Plot::new();
            for (class, values) in group.values_by_class.iter().enumerate() {
                if values.is_empty() {
                    continue;
                }
                plot.add_trace(
                    BoxPlot::<f64, f64>::new(values.clone())
                        .name(&dataset.target_names[class])
                        .marker(Marker::new().color(class_color(class))),
                );
            }
            plot.set_layout(
                Layout::new()
                    .title(format!("Feature {} Boxplot", group.index).as_str())
                    .x_axis(Axis::new().title("Class"))
                    .y_axis(Axis::new().title(group.name.as_str())),
            );
            plot
        })
        .collect()
}

fn axis_ids(cell: usize) -> (String, String) {
    if cell == 1 {
        ("x".to_string(), "y".to_string())
    } else {
        (format!("x{}", cell), format!("y{}", cell))
    }
}

/// Grid of pairwise scatters with per-class histograms on the diagonal.
pub fn plot_pairplot(dataset: &Dataset) -> Plot {
    let n = dataset.ncols().min(PAIRPLOT_MAX_FEATURES);
    let mut plot = Plot::new();

    for row in 0..n {
        for col in 0..n {
            let cell = row * n + col + 1;
            let (x_axis, y_axis) = axis_ids(cell);

            for (class, name) in dataset.target_names.iter().enumerate() {
                let rows: Vec<usize> = dataset
                    .targets
                    .iter()
                    .enumerate()
                    .filter(|&(_, &label)| label == class)
                    .map(|(i, _)| i)
                    .collect();
                if rows.is_empty() {
                    continue;
                }

                let color = class_color(class);
                let x_values: Vec<f64> = rows.iter().map(|&i| dataset.records[(i, col)]).collect();
                // Legend entries come from the first cell only.
                let show_legend = cell == 1;

                if row == col {
                    plot.add_trace(
                        Histogram::new(x_values)
                            .name(name)
                            .x_axis(&x_axis)
                            .y_axis(&y_axis)
                            .show_legend(show_legend)
                            .opacity(0.6)
                            .marker(Marker::new().color(color)),
                    );
                } else {
                    let y_values: Vec<f64> = rows.iter().map(|&i| dataset.records[(i, row)]).collect();
                    plot.add_trace(
                        Scatter::new(x_values, y_values)
                            .mode(Mode::Markers)
                            .name(name)
                            .x_axis(&x_axis)
                            .y_axis(&y_axis)
                            .show_legend(show_legend)
                            .marker(Marker::new().color(color).size(3)),
                    );
                }
            }
        }
    }

    let title = if dataset.ncols() > n {
        format!("Pair Plot (first {} of {} features)", n, dataset.ncols())
    } else {
        "Pair Plot".to_string()
    };

    plot.set_layout(
        Layout::new()
            .title(title.as_str())
            .bar_mode(BarMode::Overlay)
            .height(220 * n.max(2))
            .grid(
                LayoutGrid::new()
                    .rows(n)
                    .columns(n)
                    .pattern(GridPattern::Independent),
            ),
    );

    plot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::{load, DatasetId};
    use crate::projection::project;
    use crate::summary::feature_groups;

    #[test]
    fn test_projection_plot_has_one_trace_per_class() {
        let ds = load(DatasetId::Iris).unwrap();
        let projection = project(&ds).unwrap();
        let html = plot_projection(&projection, &ds).to_inline_html(Some("pca"));
        assert!(html.contains("setosa"));
        assert!(html.contains("virginica"));
        assert!(html.contains("Principal Component 1"));
    }

    #[test]
    fn test_one_plot_per_feature() {
        let ds = load(DatasetId::Wine).unwrap();
        let groups = feature_groups(&ds);
        assert_eq!(plot_feature_histograms(&ds, &groups).len(), 13);
        assert_eq!(plot_feature_boxplots(&ds, &groups).len(), 13);
    }

    #[test]
    fn test_pairplot_is_capped() {
        let ds = load(DatasetId::BreastCancer).unwrap();
        let html = plot_pairplot(&ds).to_inline_html(Some("pairs"));
        assert!(html.contains("first 8 of 30 features"));
    }

    #[test]
    fn test_axis_ids() {
        assert_eq!(axis_ids(1), ("x".to_string(), "y".to_string()));
        assert_eq!(axis_ids(6), ("x6".to_string(), "y6".to_string()));
    }
}
