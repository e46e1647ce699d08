pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;
pub mod stats;

pub use connection::{connect, connect_with_config, connect_with_settings, DbPool};
pub use fixtures::{KnowledgeSeedDataset, SeedResult, VerificationResult};
pub use stats::StoreStats;
