//! Launchpad の各クレートで共有するデータモデル

mod environment;
mod repository;
mod stage;
mod tenant;

// Re-exports
pub use environment::*;
pub use repository::*;
pub use stage::*;
pub use tenant::*;
