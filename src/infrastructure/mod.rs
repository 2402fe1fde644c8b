pub mod cache;
pub mod drive_client;

pub use cache::{Cache, MemoryCache, NoCache};
pub use drive_client::DriveClient;
