use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ValidationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Name fragments that suggest a command takes `$ARGUMENTS`.
    #[serde(default = "default_argument_keywords")]
    pub argument_keywords: Vec<String>,
    /// Subagent types a workflow may hand work to.
    #[serde(default = "default_known_subagents")]
    pub known_subagents: Vec<String>,
    /// `/name` tokens that look like command references but are paths or HTML tags.
    #[serde(default = "default_ignored_references")]
    pub ignored_references: Vec<String>,
}

fn default_max_name_length() -> usize {
    30
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_argument_keywords() -> Vec<String> {
    strings(&[
        "create", "generate", "build", "implement", "add", "modify", "analyze", "review",
        "optimize", "migrate", "convert",
    ])
}

fn default_known_subagents() -> Vec<String> {
    strings(&[
        "backend-architect",
        "frontend-developer",
        "test-automator",
        "deployment-engineer",
        "debugger",
        "performance-engineer",
        "security-auditor",
        "code-reviewer",
        "database-optimizer",
        "devops-troubleshooter",
        "network-engineer",
        "cloud-architect",
    ])
}

fn default_ignored_references() -> Vec<String> {
    strings(&[
        // filesystem and tooling paths
        "localhost", "bin", "bash", "usr", "etc", "var", "tmp", "pre-commit", "checkout",
        "upload", "download", "cli", "setup-node", "workflows", "tools", "actions",
        // closing HTML tags
        "div", "span", "button", "form", "label", "input", "h1", "h2", "h3", "h4", "h5", "h6",
        "p", "a", "title", "head", "body", "style", "script", "fieldset", "legend", "stopped",
        // URL paths
        "api", "auth", "user", "admin", "config",
    ])
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            argument_keywords: default_argument_keywords(),
            known_subagents: default_known_subagents(),
            ignored_references: default_ignored_references(),
        }
    }
}

impl ValidationConfig {
    pub fn is_known_subagent(&self, name: &str) -> bool {
        self.known_subagents.iter().any(|s| s == name)
    }

    pub fn is_ignored_reference(&self, name: &str) -> bool {
        self.ignored_references.iter().any(|ig| ig == name)
    }
}

// ---------------------------------------------------------------------------
// ChangelogConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_title")]
    pub title: String,
}

fn default_changelog_title() -> String {
    "# Claude Code Commands Changelog".to_string()
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            title: default_changelog_title(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_workflows_dir")]
    pub workflows_dir: String,
    #[serde(default = "default_tools_dir")]
    pub tools_dir: String,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub changelog: ChangelogConfig,
}

fn default_workflows_dir() -> String {
    paths::WORKFLOWS_DIR.to_string()
}

fn default_tools_dir() -> String {
    paths::TOOLS_DIR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workflows_dir: default_workflows_dir(),
            tools_dir: default_tools_dir(),
            validation: ValidationConfig::default(),
            changelog: ChangelogConfig::default(),
        }
    }
}

impl Config {
    /// Load `.slashctl.yaml` from `root`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        match crate::io::read_optional(&path)? {
            Some(data) if !data.trim().is_empty() => {
                let cfg: Config = serde_yaml::from_str(&data)?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(cfg)
            }
            _ => Ok(Config::default()),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Directories scanned for commands, workflows first.
    pub fn command_dirs(&self) -> [&str; 2] {
        [self.workflows_dir.as_str(), self.tools_dir.as_str()]
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (key, dir) in [
            ("workflows_dir", &self.workflows_dir),
            ("tools_dir", &self.tools_dir),
        ] {
            if dir.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{key} is empty"),
                });
            } else if dir.ends_with('/') || dir.ends_with('\\') {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("{key} '{dir}' has a trailing path separator"),
                });
            }
        }

        if !self.workflows_dir.trim().is_empty() && self.workflows_dir == self.tools_dir {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "workflows_dir and tools_dir both point at '{}'",
                    self.workflows_dir
                ),
            });
        }

        if self.validation.max_name_length == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "validation.max_name_length is 0: every command name will be flagged"
                    .to_string(),
            });
        }

        for agent in &self.validation.known_subagents {
            if !paths::is_command_name(agent) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "subagent '{agent}' in validation.known_subagents can never match: \
                         subagent types are lowercase-hyphen"
                    ),
                });
            }
        }

        if self.changelog.title.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "changelog.title is empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.workflows_dir, "workflows");
        assert_eq!(cfg.tools_dir, "tools");
        assert_eq!(cfg.validation.max_name_length, 30);
        assert!(cfg.validation.is_known_subagent("backend-architect"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".slashctl.yaml"),
            "tools_dir: claude-tools\nvalidation:\n  max_name_length: 40\n",
        )
        .unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.tools_dir, "claude-tools");
        assert_eq!(cfg.workflows_dir, "workflows");
        assert_eq!(cfg.validation.max_name_length, 40);
        assert!(!cfg.validation.argument_keywords.is_empty());
        assert_eq!(cfg.changelog.title, "# Claude Code Commands Changelog");
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.validation.known_subagents.push("data-scientist".to_string());
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert!(loaded.validation.is_known_subagent("data-scientist"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".slashctl.yaml"), "validation: [unclosed").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn ignored_reference_matching() {
        let v = ValidationConfig::default();
        assert!(v.is_ignored_reference("bin"));
        assert!(v.is_ignored_reference("p"));
        // real commands that share a prefix with an ignored entry are still checked
        assert!(!v.is_ignored_reference("api-scaffold"));
        assert!(!v.is_ignored_reference("python-setup"));
    }

    #[test]
    fn default_config_has_no_warnings() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn same_dirs_is_an_error() {
        let mut cfg = Config::default();
        cfg.tools_dir = "workflows".to_string();
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("both point at")));
    }

    #[test]
    fn bad_subagent_name_warns() {
        let mut cfg = Config::default();
        cfg.validation.known_subagents.push("Data_Scientist".to_string());
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("'Data_Scientist'")));
    }

    #[test]
    fn zero_name_length_warns() {
        let mut cfg = Config::default();
        cfg.validation.max_name_length = 0;
        assert!(cfg
            .validate()
            .iter()
            .any(|w| w.message.contains("max_name_length")));
    }

    #[test]
    fn trailing_separator_warns() {
        let cfg = Config {
            workflows_dir: "workflows/".to_string(),
            ..Config::default()
        };
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Warning
            && w.message == "workflows_dir 'workflows/' has a trailing path separator"));
        assert!(Config::default().validate().is_empty());
    }
}
