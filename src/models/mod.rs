pub mod dashboard;
pub mod format;
pub mod request;

pub use dashboard::{DashboardInfo, ElementRect, QuestionRef};
pub use format::{DataFormat, ExportKind, PageKind, VisualizationFormat};
pub use request::ExportRequest;
