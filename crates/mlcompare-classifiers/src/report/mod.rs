pub mod builder;
pub mod html;
pub mod plots;

pub use builder::{Report, ReportSection};
pub use html::{build_report, render_report, ReportContext};
