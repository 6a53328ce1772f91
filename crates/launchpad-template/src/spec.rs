//! テンプレート定義とパラメータ処理

use crate::error::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

pub const TEMPLATE_FILE: &str = "template.yaml";
pub const DEFAULT_SKELETON_PATH: &str = "skeleton";

/// `template.yaml` から読み込むテンプレート定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// スケルトンディレクトリ（テンプレートディレクトリからの相対パス）
    #[serde(default = "default_skeleton_path")]
    pub skeleton_path: PathBuf,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// テンプレートディレクトリ（カタログルートからの相対パス）
    #[serde(skip)]
    pub dir: PathBuf,
}

fn default_skeleton_path() -> PathBuf {
    PathBuf::from(DEFAULT_SKELETON_PATH)
}

impl TemplateSpec {
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// 全テンプレート共通のパラメータを先頭に追加
    ///
    /// 同名のパラメータが宣言されている場合はそちらを優先します。
    pub fn with_implicit_parameters(mut self) -> Self {
        let declared = std::mem::take(&mut self.parameters);
        let mut parameters: Vec<Parameter> = implicit_parameters()
            .into_iter()
            .filter(|implicit| !declared.iter().any(|p| p.name == implicit.name))
            .collect();
        parameters.extend(declared);
        self.parameters = parameters;
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Int,
}

impl ParameterType {
    pub fn validate_and_map(&self, value: &str) -> std::result::Result<Value, String> {
        match self {
            ParameterType::String => Ok(Value::String(value.to_string())),
            ParameterType::Int => value
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| "integer is expected".to_string()),
        }
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterType::String => write!(f, "string"),
            ParameterType::Int => write!(f, "int"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub param_type: ParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl Parameter {
    fn implicit(name: &str, description: &str, default: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            param_type: ParameterType::String,
            default: default.map(str::to_string),
            optional: false,
        }
    }

    /// 値を検証（空ならデフォルト値を使用）
    ///
    /// デフォルトのない optional パラメータが空の場合は `Ok(None)` を返します。
    pub fn validate_and_map(&self, value: &str) -> Result<Option<Value>> {
        let value = value.trim();
        let raw = if !value.is_empty() {
            value
        } else if let Some(default) = self.default.as_deref().filter(|d| !d.is_empty()) {
            default
        } else if self.optional {
            return Ok(None);
        } else {
            return Err(self.invalid("required"));
        };

        self.param_type
            .validate_and_map(raw)
            .map(Some)
            .map_err(|reason| self.invalid(&reason))
    }

    fn invalid(&self, reason: &str) -> TemplateError {
        TemplateError::InvalidArgument {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// 定義に関係なく全テンプレートに渡されるパラメータ
pub fn implicit_parameters() -> Vec<Parameter> {
    vec![
        Parameter::implicit("name", "application name", None),
        Parameter::implicit("tenant", "tenant used to deploy the application", None),
        Parameter::implicit(
            "working_directory",
            "working directory where application is located",
            Some("./"),
        ),
        Parameter::implicit("version_prefix", "version prefix for application", Some("v")),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

/// 検証済みの引数を持つ、展開可能なテンプレート
#[derive(Debug, Clone, PartialEq)]
pub struct FulfilledTemplate {
    pub spec: TemplateSpec,
    pub arguments: Vec<Argument>,
}

impl FulfilledTemplate {
    /// `values` を `spec` の全パラメータに対して検証
    ///
    /// 未定義のキーはエラーになります。
    pub fn fulfill(spec: TemplateSpec, values: &HashMap<String, String>) -> Result<Self> {
        let mut unknown: Vec<&String> = values
            .keys()
            .filter(|key| spec.parameter(key).is_none())
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(TemplateError::InvalidArgument {
                name: unknown[0].clone(),
                reason: format!("template '{}' has no such parameter", spec.name),
            });
        }

        let mut arguments = Vec::with_capacity(spec.parameters.len());
        for parameter in &spec.parameters {
            let raw = values.get(&parameter.name).map(String::as_str).unwrap_or("");
            if let Some(value) = parameter.validate_and_map(raw)? {
                arguments.push(Argument {
                    name: parameter.name.clone(),
                    value,
                });
            }
        }

        Ok(Self { spec, arguments })
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// 引数を設定（同名の値は置き換え）
    pub fn set_argument(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.arguments.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.arguments.push(Argument {
                name: name.to_string(),
                value,
            }),
        }
    }
}
