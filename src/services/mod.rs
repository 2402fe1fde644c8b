pub mod cached_provider;
pub mod chart_provider;
pub mod chart_viewer;
pub mod image_writer;
pub mod submission_log;

#[cfg(test)]
pub(crate) mod testing;

pub use cached_provider::CachedProvider;
pub use chart_provider::{ChartImageProvider, DriveChartProvider};
pub use chart_viewer::{ChartAdvisory, ChartDisplay, ChartPanel, ChartViewer};
pub use image_writer::{ImageWriter, WrittenImage};
pub use submission_log::SubmissionLog;
