use slashctl_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the command repository root.
///
/// Priority:
/// 1. `--root` flag / `SLASHCTL_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.slashctl.yaml` or `.command-metadata.json`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_root_from(&cwd)
}

fn find_root_from(start: &Path) -> PathBuf {
    let has_marker = |dir: &Path| {
        dir.join(paths::CONFIG_FILE).is_file() || dir.join(paths::METADATA_FILE).is_file()
    };
    if let Some(dir) = start.ancestors().find(|d| has_marker(*d)) {
        return dir.to_path_buf();
    }
    if let Some(dir) = start.ancestors().find(|d| d.join(".git").is_dir()) {
        return dir.to_path_buf();
    }
    start.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_metadata_marker_above() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".command-metadata.json"), "{}").unwrap();
        let deep = dir.path().join("workflows/sub");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(find_root_from(&deep), dir.path());
    }

    #[test]
    fn marker_beats_git() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let inner = dir.path().join("commands");
        std::fs::create_dir_all(&inner).unwrap();
        std::fs::write(inner.join(".slashctl.yaml"), "").unwrap();
        let deep = inner.join("tools");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(find_root_from(&deep), inner);
    }

    #[test]
    fn falls_back_to_git_then_start() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a/b");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(find_root_from(&deep), deep);
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        assert_eq!(find_root_from(&deep), dir.path());
    }
}
