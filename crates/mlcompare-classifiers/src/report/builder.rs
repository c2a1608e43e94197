//! Self-contained HTML report made of titled sections of markup and plots.
use std::path::Path;

use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

const STYLE: &str = "
body { font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 0; color: #222; }
header { background: #1f2d3d; color: #fff; padding: 16px 32px; display: flex; align-items: center; gap: 16px; }
header img { height: 48px; }
header .meta { font-size: 0.85em; opacity: 0.8; }
nav { padding: 8px 32px; background: #f0f3f6; }
nav a { margin-right: 16px; color: #1f2d3d; text-decoration: none; }
main { padding: 0 32px 32px 32px; }
section { margin-top: 24px; }
table { border-collapse: collapse; margin: 8px 0; }
th, td { border: 1px solid #ccd; padding: 4px 10px; text-align: right; }
th { background: #f0f3f6; }
td.label, th.label { text-align: left; }
";

enum SectionItem {
    Content(Markup),
    Plot(Plot),
}

/// A titled block of the report.
pub struct ReportSection {
    title: String,
    items: Vec<SectionItem>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            items: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.items.push(SectionItem::Content(content));
    }

    pub fn add_plot(&mut self, plot: Plot) {
        self.items.push(SectionItem::Plot(plot));
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn anchor(index: usize) -> String {
        format!("section-{}", index)
    }

    fn render(&self, index: usize) -> Markup {
        html! {
            section id=(Self::anchor(index)) {
                h2 { (self.title) }
                @for (i, item) in self.items.iter().enumerate() {
                    @match item {
                        SectionItem::Content(markup) => {
                            div class="content" { (markup) }
                        }
                        SectionItem::Plot(plot) => {
                            div class="plot" {
                                (PreEscaped(plot.to_inline_html(Some(format!("plot-{}-{}", index, i).as_str()))))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// An HTML report with a header and a list of sections.
pub struct Report {
    software_name: String,
    version: String,
    logo_url: Option<String>,
    title: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(software_name: &str, version: &str, logo_url: Option<&str>, title: &str) -> Self {
        Report {
            software_name: software_name.to_string(),
            version: version.to_string(),
            logo_url: logo_url.map(|s| s.to_string()),
            title: title.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn render(&self) -> Markup {
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    header {
                        @if let Some(logo) = &self.logo_url {
                            img src=(logo) alt=(self.software_name);
                        }
                        div {
                            h1 { (self.title) }
                            div class="meta" {
                                (self.software_name) " v" (self.version) " | generated " (generated)
                            }
                        }
                    }
                    nav {
                        @for (i, section) in self.sections.iter().enumerate() {
                            a href=(format!("#{}", ReportSection::anchor(i))) { (section.title) }
                        }
                    }
                    main {
                        @for (i, section) in self.sections.iter().enumerate() {
                            (section.render(i))
                        }
                    }
                }
            }
        }
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.render().into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_sections_and_plots() {
        let mut report = Report::new("mlcompare", "0.1.0", None, "Test Report");
        let mut section = ReportSection::new("Overview");
        section.add_content(html! { p { "hello <world>" } });
        section.add_plot(Plot::new());
        report.add_section(section);

        let page = report.render().into_string();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<h2>Overview</h2>"));
        assert!(page.contains("hello &lt;world&gt;"));
        assert!(page.contains("plot-0-1"));
        assert!(page.contains(PLOTLY_CDN));
    }
}
