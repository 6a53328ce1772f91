//! Launchpad スターターテンプレート
//!
//! 各テンプレートは `template.yaml` と、Teraで展開するスケルトンディレクトリを持ちます。

pub mod catalog;
pub mod error;
pub mod render;
pub mod spec;

pub use error::{Result, TemplateError};
pub use render::{TemplateMaterializer, TeraRenderer};
pub use spec::{
    Argument, DEFAULT_SKELETON_PATH, FulfilledTemplate, Parameter, ParameterType, TEMPLATE_FILE,
    TemplateSpec, implicit_parameters,
};
