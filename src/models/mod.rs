pub mod category;
pub mod chart;
pub mod qa_pair;

pub use category::Category;
pub use chart::{ChartImage, ChartSide, FolderId, ImageEntry};
pub use qa_pair::{QaPair, MAX_QA_PAIRS_PER_CATEGORY};
