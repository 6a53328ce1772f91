//! スケルトンの展開
//!
//! 出力先の隣のステージングディレクトリに全ファイルを展開してから移動します。
//! 展開や移動に失敗した場合、出力先は元の状態のままです。

use crate::error::{Result, TemplateError};
use crate::spec::FulfilledTemplate;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tera::{Context, Tera};
use tracing::{debug, info, warn};

/// テンプレートのスケルトンをディレクトリに展開する
pub trait TemplateMaterializer: Send + Sync {
    fn render(
        &self,
        template: &FulfilledTemplate,
        templates_root: &Path,
        destination: &Path,
    ) -> Result<()>;
}

/// UTF-8のファイル（とファイル名）をTeraで展開する。
/// それ以外のファイルはそのままコピー。
#[derive(Debug, Default, Clone)]
pub struct TeraRenderer;

impl TeraRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateMaterializer for TeraRenderer {
    fn render(
        &self,
        template: &FulfilledTemplate,
        templates_root: &Path,
        destination: &Path,
    ) -> Result<()> {
        let skeleton = templates_root
            .join(&template.spec.dir)
            .join(&template.spec.skeleton_path);
        if !skeleton.is_dir() {
            return Err(TemplateError::SkeletonNotFound(skeleton));
        }

        let context = build_context(template);
        let mut files = Vec::new();
        collect_files(&skeleton, &mut files)?;
        files.sort();

        fs::create_dir_all(destination)?;
        let staging = tempfile::Builder::new()
            .prefix(".launchpad-render-")
            .tempdir_in(staging_parent(destination))?;

        let mut tera = Tera::default();
        for file in &files {
            let relative = file
                .strip_prefix(&skeleton)
                .map_err(|_| TemplateError::InvalidPath(file.clone()))?;
            let target_relative = render_path(&mut tera, &context, relative)?;
            let target = staging.path().join(&target_relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            match String::from_utf8(fs::read(file)?) {
                Ok(text) => {
                    let rendered = tera.render_str(&text, &context).map_err(|e| {
                        TemplateError::RenderError {
                            file: relative.to_path_buf(),
                            message: extract_tera_error_detail(&e),
                        }
                    })?;
                    fs::write(&target, rendered)?;
                }
                Err(binary) => fs::write(&target, binary.into_bytes())?,
            }
            fs::set_permissions(&target, fs::metadata(file)?.permissions())?;
            debug!(file = %target_relative.display(), "Rendered");
        }

        let mut moves = Vec::new();
        for entry in fs::read_dir(staging.path())? {
            let entry = entry?;
            let target = destination.join(entry.file_name());
            if target.exists() {
                return Err(TemplateError::Conflict(target));
            }
            moves.push((entry.path(), target));
        }
        move_all(&moves)?;

        info!(
            template = %template.spec.name,
            destination = %destination.display(),
            files = files.len(),
            "Template rendered"
        );
        Ok(())
    }
}

/// 全ての `(from, to)` を移動する（全部か、何もしないか）
///
/// 失敗した場合、移動済みのエントリは元に戻します。
fn move_all(moves: &[(PathBuf, PathBuf)]) -> std::io::Result<()> {
    for (done, (from, to)) in moves.iter().enumerate() {
        if let Err(e) = fs::rename(from, to) {
            for (from, to) in moves[..done].iter().rev() {
                if let Err(undo) = fs::rename(to, from) {
                    warn!(
                        path = %to.display(),
                        error = %undo,
                        "Failed to roll back rendered entry"
                    );
                }
            }
            return Err(e);
        }
    }
    Ok(())
}

fn build_context(template: &FulfilledTemplate) -> Context {
    let mut context = Context::new();
    for argument in &template.arguments {
        context.insert(argument.name.as_str(), &argument.value);
    }
    context
}

/// 最後の移動がrenameで済むよう、ステージングは出力先の隣に置く
fn staging_parent(destination: &Path) -> &Path {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && parent.is_dir() => parent,
        _ => destination,
    }
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

fn render_path(tera: &mut Tera, context: &Context, relative: &Path) -> Result<PathBuf> {
    let raw = relative.to_string_lossy();
    if !raw.contains("{{") {
        return Ok(relative.to_path_buf());
    }

    let rendered = tera
        .render_str(&raw, context)
        .map_err(|e| TemplateError::RenderError {
            file: relative.to_path_buf(),
            message: extract_tera_error_detail(&e),
        })?;
    let rendered = PathBuf::from(rendered);
    if rendered.as_os_str().is_empty()
        || !rendered
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(TemplateError::InvalidPath(rendered));
    }
    Ok(rendered)
}

/// Teraのエラーチェーンを展開し、未定義変数があればその名前を返す
fn extract_tera_error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }
    let full_error = details.join(" | ");

    if let Some(start) = full_error.find("Variable `")
        && let Some(end) = full_error[start..].find("` not found")
    {
        let var_name = &full_error[start + 10..start + end];
        return format!(
            "undefined variable: `{}`\nhint: declare it as a template parameter or pass it with --arg",
            var_name
        );
    }

    full_error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Argument;
    use crate::spec::TemplateSpec;
    use serde_json::Value;
    use tempfile::TempDir;

    fn fulfilled(args: &[(&str, Value)]) -> FulfilledTemplate {
        let mut spec: TemplateSpec = serde_yaml::from_str("name: go-service").unwrap();
        spec.dir = PathBuf::from("go-service");
        FulfilledTemplate {
            spec,
            arguments: args
                .iter()
                .map(|(name, value)| Argument {
                    name: name.to_string(),
                    value: value.clone(),
                })
                .collect(),
        }
    }

    fn skeleton(root: &Path) -> PathBuf {
        let dir = root.join("go-service").join("skeleton");
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_render_contents_and_paths() {
        let templates = TempDir::new().unwrap();
        let skeleton = skeleton(templates.path());
        fs::write(skeleton.join("README.md"), "# {{ name }} ({{ tenant }})\n").unwrap();
        fs::create_dir_all(skeleton.join("cmd/{{ name }}")).unwrap();
        fs::write(skeleton.join("cmd/{{ name }}/main.go"), "package main\n").unwrap();

        let workspace = TempDir::new().unwrap();
        let destination = workspace.path().join("billing-svc");
        TeraRenderer::new()
            .render(
                &fulfilled(&[
                    ("name", Value::from("billing-svc")),
                    ("tenant", Value::from("payments")),
                ]),
                templates.path(),
                &destination,
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(destination.join("README.md")).unwrap(),
            "# billing-svc (payments)\n"
        );
        assert!(destination.join("cmd/billing-svc/main.go").is_file());
        let leftovers: Vec<_> = fs::read_dir(workspace.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1, "staging directory should be removed");
    }

    #[test]
    fn test_binary_files_copied_verbatim() {
        let templates = TempDir::new().unwrap();
        let skeleton = skeleton(templates.path());
        let bytes = vec![0xff, 0xfe, b'{', b'{', 0x00];
        fs::write(skeleton.join("logo.bin"), &bytes).unwrap();

        let destination = TempDir::new().unwrap();
        TeraRenderer::new()
            .render(&fulfilled(&[]), templates.path(), destination.path())
            .unwrap();
        assert_eq!(fs::read(destination.path().join("logo.bin")).unwrap(), bytes);
    }

    #[test]
    fn test_failed_render_leaves_destination_untouched() {
        let templates = TempDir::new().unwrap();
        let skeleton = skeleton(templates.path());
        fs::write(skeleton.join("a.txt"), "{{ name }}").unwrap();
        fs::write(skeleton.join("b.txt"), "{{ undefined_thing }}").unwrap();

        let destination = TempDir::new().unwrap();
        let err = TeraRenderer::new()
            .render(
                &fulfilled(&[("name", Value::from("billing-svc"))]),
                templates.path(),
                destination.path(),
            )
            .unwrap_err();

        match err {
            TemplateError::RenderError { file, message } => {
                assert_eq!(file, PathBuf::from("b.txt"));
                assert!(message.contains("undefined_thing"));
            }
            other => panic!("expected render error, got {:?}", other),
        }
        assert_eq!(fs::read_dir(destination.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_conflict_with_existing_file() {
        let templates = TempDir::new().unwrap();
        let skeleton = skeleton(templates.path());
        fs::write(skeleton.join("README.md"), "new").unwrap();

        let destination = TempDir::new().unwrap();
        fs::write(destination.path().join("README.md"), "existing").unwrap();

        let err = TeraRenderer::new()
            .render(&fulfilled(&[]), templates.path(), destination.path())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Conflict(_)));
        assert_eq!(
            fs::read_to_string(destination.path().join("README.md")).unwrap(),
            "existing"
        );
    }

    #[test]
    fn test_rendered_path_cannot_escape() {
        let templates = TempDir::new().unwrap();
        let skeleton = skeleton(templates.path());
        fs::write(skeleton.join("{{ name }}.txt"), "x").unwrap();

        let destination = TempDir::new().unwrap();
        let err = TeraRenderer::new()
            .render(
                &fulfilled(&[("name", Value::from("../escape"))]),
                templates.path(),
                destination.path(),
            )
            .unwrap_err();
        assert!(matches!(err, TemplateError::InvalidPath(_)));
    }

    #[test]
    fn test_failed_move_restores_moved_entries() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let destination = temp.path().join("app");
        fs::create_dir_all(&staging).unwrap();
        fs::create_dir_all(&destination).unwrap();
        fs::write(staging.join("README.md"), "readme").unwrap();

        let moves = vec![
            (staging.join("README.md"), destination.join("README.md")),
            (staging.join("missing.txt"), destination.join("missing.txt")),
        ];
        assert!(move_all(&moves).is_err());

        assert!(!destination.join("README.md").exists());
        assert_eq!(fs::read_to_string(staging.join("README.md")).unwrap(), "readme");
        assert_eq!(fs::read_dir(&destination).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_skeleton() {
        let templates = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        let err = TeraRenderer::new()
            .render(&fulfilled(&[]), templates.path(), destination.path())
            .unwrap_err();
        assert!(matches!(err, TemplateError::SkeletonNotFound(_)));
    }
}
