//! テンプレートカタログの探索
//!
//! カタログルート配下で `template.yaml` を持つディレクトリをテンプレートとみなします。
//! テンプレートディレクトリの中には降りません。

use crate::error::{Result, TemplateError};
use crate::spec::{TEMPLATE_FILE, TemplateSpec};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// `root` 配下の有効なテンプレートをディレクトリ順に取得
pub fn list(root: &Path) -> Result<Vec<TemplateSpec>> {
    let mut specs = Vec::new();
    let mut visited = HashSet::new();
    visit_dir(root, root, &mut specs, &mut visited)?;
    specs.sort_by(|a, b| a.dir.cmp(&b.dir));
    debug!(root = %root.display(), count = specs.len(), "Discovered templates");
    Ok(specs)
}

/// 宣言された名前でテンプレートを検索
pub fn find_by_name(root: &Path, name: &str) -> Result<Option<TemplateSpec>> {
    Ok(list(root)?.into_iter().find(|spec| spec.name == name))
}

/// [`find_by_name`] と同様だが、見つからない場合はエラー
pub fn get(root: &Path, name: &str) -> Result<TemplateSpec> {
    find_by_name(root, name)?.ok_or_else(|| TemplateError::NotFound(name.to_string()))
}

fn visit_dir(
    root: &Path,
    dir: &Path,
    specs: &mut Vec<TemplateSpec>,
    visited: &mut HashSet<PathBuf>,
) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    let canonical_dir = dir.canonicalize().map_err(|e| io_error(dir, e))?;
    if !visited.insert(canonical_dir.clone()) {
        warn!(dir = %canonical_dir.display(), "Symlink loop detected, skipping");
        return Ok(());
    }

    let template_file = dir.join(TEMPLATE_FILE);
    if template_file.is_file() {
        if let Some(spec) = read_spec(root, dir, &template_file)? {
            specs.push(spec);
        }
        return Ok(());
    }

    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
        let path = entry.map_err(|e| io_error(dir, e))?.path();
        if path.is_dir() {
            children.push(path);
        }
    }
    children.sort();
    for child in children {
        visit_dir(root, &child, specs, visited)?;
    }
    Ok(())
}

fn read_spec(root: &Path, dir: &Path, template_file: &Path) -> Result<Option<TemplateSpec>> {
    let content = fs::read_to_string(template_file).map_err(|e| io_error(template_file, e))?;
    let mut spec: TemplateSpec =
        serde_yaml::from_str(&content).map_err(|source| TemplateError::Definition {
            path: template_file.to_path_buf(),
            source,
        })?;

    if !spec.is_valid() {
        warn!(path = %template_file.display(), "Template without a name, skipping");
        return Ok(None);
    }

    spec.dir = dir.strip_prefix(root).unwrap_or(dir).to_path_buf();
    Ok(Some(spec.with_implicit_parameters()))
}

fn io_error(path: &Path, e: std::io::Error) -> TemplateError {
    TemplateError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}
