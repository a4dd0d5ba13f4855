use crate::config::Config;
use crate::error::Result;
use crate::paths;
use crate::types::CommandKind;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// A command document on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandFile {
    pub name: String,
    pub kind: CommandKind,
    pub path: PathBuf,
}

impl CommandFile {
    /// Build from a path, classifying by the directory it lives in.
    pub fn from_path(root: &Path, path: &Path, config: &Config) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        CommandFile {
            name,
            kind: kind_for(root, path, config),
            path: path.to_path_buf(),
        }
    }

    pub fn read(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

fn kind_for(root: &Path, path: &Path, config: &Config) -> CommandKind {
    let workflows = resolve(&root.join(&config.workflows_dir));
    let in_workflows = path
        .parent()
        .map(|p| resolve(p) == workflows)
        .unwrap_or(false);
    if in_workflows {
        CommandKind::Workflow
    } else {
        CommandKind::Tool
    }
}

/// Canonical form when the path exists, otherwise the path with `.` segments
/// and trailing separators dropped.
fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    })
}

/// List the `*.md` files directly inside one command directory.
fn list_dir(root: &Path, dir: &str, kind: CommandKind) -> Result<Vec<CommandFile>> {
    let dir_path = root.join(dir);
    if !dir_path.is_dir() {
        tracing::debug!(dir = %dir_path.display(), "command directory missing, skipping");
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(&dir_path)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(paths::COMMAND_EXT) {
            continue;
        }
        let name = match path.file_stem() {
            Some(s) => s.to_string_lossy().into_owned(),
            None => continue,
        };
        out.push(CommandFile { name, kind, path });
    }
    Ok(out)
}

/// Every command in the repository, workflows and tools, sorted by path.
pub fn discover(root: &Path, config: &Config) -> Result<Vec<CommandFile>> {
    let mut all = list_dir(root, &config.workflows_dir, CommandKind::Workflow)?;
    all.extend(list_dir(root, &config.tools_dir, CommandKind::Tool)?);
    all.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(all)
}

/// Locate a command by name, preferring workflows over tools.
pub fn find(root: &Path, config: &Config, name: &str) -> Option<CommandFile> {
    [
        (config.workflows_dir.as_str(), CommandKind::Workflow),
        (config.tools_dir.as_str(), CommandKind::Tool),
    ]
    .into_iter()
    .map(|(dir, kind)| (paths::command_path(root, dir, name), kind))
    .find(|(p, _)| p.is_file())
    .map(|(path, kind)| CommandFile {
        name: name.to_string(),
        kind,
        path,
    })
}

/// True when `name` exists as a workflow or a tool.
pub fn exists(root: &Path, config: &Config, name: &str) -> bool {
    find(root, config, name).is_some()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
