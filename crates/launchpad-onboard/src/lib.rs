//! Launchpad オンボーディングパイプライン
//!
//! 新しいアプリケーションリポジトリを準備します:
//! ローカルワークスペース、テンプレートと初回コミット（任意）、
//! プライベートなリモートリポジトリ、CIがデプロイ先を決めるステージ変数。
//!
//! 外部とのやり取りは以下のトレイトのみを通します:
//! [`VersionControl`](launchpad_git::VersionControl)、
//! [`HostingPlatform`](launchpad_hosting::HostingPlatform)、
//! [`TemplateMaterializer`](launchpad_template::TemplateMaterializer)

pub mod create;
pub mod error;
pub mod provision;
pub mod publish;
pub mod step;
pub mod validate;
pub mod workspace;

pub use create::{ApplicationService, CreateOp, CreateResult};
pub use error::{OnboardError, PublishFailure, Result};
pub use provision::provision_remote;
pub use publish::{StageEnvironments, publish_stage_config};
pub use step::OnboardStep;
pub use validate::{validate_local_path, validate_request};
pub use workspace::{INITIAL_COMMIT_MESSAGE, commit_workspace, init_workspace};
