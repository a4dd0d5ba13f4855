use crate::command::{self, CommandFile};
use crate::config::Config;
use crate::error::Result;
use crate::types::Level;
use crate::validator::{CheckContext, Finding, Validator};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub commands: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

// ---------------------------------------------------------------------------
// ValidationRun
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub command: CommandFile,
    pub findings: Vec<Finding>,
}

impl CommandResult {
    fn count(&self, level: Level) -> usize {
        self.findings.iter().filter(|f| f.level == level).count()
    }
}

/// Findings for every command in a repository, ordered by file path.
#[derive(Debug, Clone, Default)]
pub struct ValidationRun {
    pub results: Vec<CommandResult>,
}

impl ValidationRun {
    pub fn execute(root: &Path, config: &Config) -> Result<Self> {
        let validator = Validator::default();
        let mut results = Vec::new();
        for cmd in command::discover(root, config)? {
            let content = cmd.read()?;
            let ctx = CheckContext {
                root,
                config,
                command: &cmd,
                content: &content,
            };
            let findings = validator.validate(&ctx);
            results.push(CommandResult {
                command: cmd,
                findings,
            });
        }
        let run = Self { results };
        let totals = run.totals();
        tracing::info!(
            commands = totals.commands,
            errors = totals.errors,
            warnings = totals.warnings,
            "validation finished"
        );
        Ok(run)
    }

    pub fn totals(&self) -> Totals {
        self.results.iter().fold(
            Totals {
                commands: self.results.len(),
                ..Totals::default()
            },
            |mut t, r| {
                t.errors += r.count(Level::Error);
                t.warnings += r.count(Level::Warning);
                t.info += r.count(Level::Info);
                t
            },
        )
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.count(Level::Error) > 0)
    }

    /// Process exit status: 1 when any command has an error.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }

    /// Human-readable markdown report. Files with only info findings are
    /// counted in the summary but get no section of their own.
    pub fn render_markdown(&self) -> String {
        let totals = self.totals();
        let mut lines = vec![
            "# Command Validation Report".to_string(),
            String::new(),
            "## Summary".to_string(),
            format!("- Total Commands: {}", totals.commands),
            format!("- {} Errors: {}", Level::Error.icon(), totals.errors),
            format!("- {}  Warnings: {}", Level::Warning.icon(), totals.warnings),
            format!("- {}  Info: {}", Level::Info.icon(), totals.info),
        ];

        for result in &self.results {
            if result.count(Level::Error) == 0 && result.count(Level::Warning) == 0 {
                continue;
            }
            lines.push(String::new());
            lines.push(format!("## {}", result.command.file_name()));
            for f in &result.findings {
                let at = f.line.map(|n| format!(" (line {n})")).unwrap_or_default();
                lines.push(format!("- {} {}{at}", f.level.icon(), f.message));
            }
        }

        lines.push(String::new());
        lines.join("\n")
    }

    /// File path → findings, for machine consumers.
    pub fn to_json(&self) -> serde_json::Value {
        let map: BTreeMap<String, &Vec<Finding>> = self
            .results
            .iter()
            .map(|r| (r.command.path.display().to_string(), &r.findings))
            .collect();
        serde_json::json!(map)
    }

    pub fn save_markdown(&self, path: &Path) -> Result<()> {
        crate::io::atomic_write(path, self.render_markdown().as_bytes())
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.to_json())?;
        crate::io::atomic_write(path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &str) {
        let p = root.join(rel);
        std::fs::create_dir_all(p.parent().unwrap()).unwrap();
        std::fs::write(p, body).unwrap();
    }

    fn repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "tools/doc-lint.md",
            "---\nversion: 1.0.0\n---\n# Doc Lint\n$ARGUMENTS\n",
        );
        write(dir.path(), "tools/Bad_Name.md", "---\nversion: 1.0.0\n---\n# Bad\n");
        write(
            dir.path(),
            "workflows/ship-it.md",
            "---\nversion: 1.0.0\n---\n# Ship\nCoordinate subagents.\n",
        );
        dir
    }

    #[test]
    fn execute_collects_every_command() {
        let dir = repo();
        let run = ValidationRun::execute(dir.path(), &Config::default()).unwrap();
        assert_eq!(run.results.len(), 3);
        let totals = run.totals();
        assert_eq!(totals.commands, 3);
        assert_eq!(totals.errors, 1);
        assert!(run.has_errors());
        assert_eq!(run.exit_code(), 1);
    }

    #[test]
    fn clean_repo_exits_zero() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "tools/doc-lint.md",
            "---\nversion: 1.0.0\n---\n# Doc Lint\n$ARGUMENTS\n",
        );
        let run = ValidationRun::execute(dir.path(), &Config::default()).unwrap();
        assert!(!run.has_errors());
        assert_eq!(run.exit_code(), 0);
        let md = run.render_markdown();
        assert!(md.contains("- Total Commands: 1"));
        assert!(!md.contains("## doc-lint.md"));
    }

    #[test]
    fn markdown_lists_files_with_problems() {
        let dir = repo();
        let run = ValidationRun::execute(dir.path(), &Config::default()).unwrap();
        let md = run.render_markdown();
        assert!(md.starts_with("# Command Validation Report\n\n## Summary\n"));
        assert!(md.contains("- ❌ Errors: 1"));
        assert!(md.contains("## Bad_Name.md"));
        assert!(md.contains("- ❌ Command name 'Bad_Name' must use lowercase-hyphen format"));
        assert!(!md.contains("## doc-lint.md"));
        assert!(!md.contains("## ship-it.md"));
    }

    #[test]
    fn json_is_keyed_by_path() {
        let dir = repo();
        let run = ValidationRun::execute(dir.path(), &Config::default()).unwrap();
        let json = run.to_json();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        let (_, bad) = obj.iter().find(|(k, _)| k.ends_with("Bad_Name.md")).unwrap();
        let first = &bad.as_array().unwrap()[0];
        assert_eq!(first["level"], "error");
        assert!(first["line_number"].is_null());
        assert_eq!(first["rule"], "naming");
    }

    #[test]
    fn save_markdown_writes_nested_report() {
        let dir = repo();
        let run = ValidationRun::execute(dir.path(), &Config::default()).unwrap();
        let out = dir.path().join("tests/validation_report.md");
        run.save_markdown(&out).unwrap();
        assert!(std::fs::read_to_string(out)
            .unwrap()
            .contains("# Command Validation Report"));
    }
}
