//! Launchpad Core
//!
//! オンボーディングで共有するデータモデルと、
//! それらが定義されたプラットフォーム設定リポジトリの読み込み。

pub mod error;
pub mod loader;
pub mod model;

// Re-exports
pub use error::{CoreError, Result};
pub use loader::{DEFAULT_ENVIRONMENTS_DIR, DEFAULT_TENANTS_DIR, PlatformRepository};
pub use model::*;
