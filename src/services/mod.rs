pub mod capturer;
pub mod compositor;
pub mod data_exporter;
pub mod resolver;

pub use capturer::VisualizationCapturer;
pub use compositor::DashboardCompositor;
pub use data_exporter::DataExporter;
pub use resolver::DashboardResolver;
