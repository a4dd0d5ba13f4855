//! Per-command semantic versioning backed by `.command-metadata.json`.

use crate::changelog;
use crate::command::{self, CommandFile};
use crate::config::Config;
use crate::error::{Result, SlashError};
use crate::frontmatter;
use crate::paths;
use crate::types::{ChangeType, CommandKind};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

pub const INITIAL_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// Version strings
// ---------------------------------------------------------------------------

static STRICT_RE: OnceLock<Regex> = OnceLock::new();

/// `MAJOR.MINOR.PATCH` with no pre-release or build suffix.
pub fn is_strict_version(s: &str) -> bool {
    STRICT_RE
        .get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap())
        .is_match(s)
}

pub fn parse_version(s: &str) -> Result<semver::Version> {
    if !is_strict_version(s) {
        return Err(SlashError::InvalidVersion(s.to_string()));
    }
    semver::Version::parse(s).map_err(|_| SlashError::InvalidVersion(s.to_string()))
}

pub fn bump(v: &semver::Version, change: ChangeType) -> Result<semver::Version> {
    let next = match change {
        ChangeType::Major => v.major.checked_add(1).map(|m| semver::Version::new(m, 0, 0)),
        ChangeType::Minor => v
            .minor
            .checked_add(1)
            .map(|m| semver::Version::new(v.major, m, 0)),
        ChangeType::Patch => v
            .patch
            .checked_add(1)
            .map(|p| semver::Version::new(v.major, v.minor, p)),
    };
    next.ok_or_else(|| SlashError::VersionOverflow(v.to_string()))
}

// ---------------------------------------------------------------------------
// Metadata records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandVersion {
    pub version: String,
    pub released: String,
    pub changes: Vec<String>,
    #[serde(default)]
    pub breaking_changes: Vec<String>,
    #[serde(default)]
    pub deprecated_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CommandKind,
    #[serde(default)]
    pub description: String,
    pub current_version: String,
    pub created: String,
    pub last_updated: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub version_history: Vec<CommandVersion>,
}

impl CommandMetadata {
    /// Date portion of `last_updated`.
    pub fn last_updated_date(&self) -> &str {
        self.last_updated.get(..10).unwrap_or(&self.last_updated)
    }
}

// ---------------------------------------------------------------------------
// Operation inputs / outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub description: String,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    Initialized { name: String },
    AlreadyInitialized { name: String },
}

#[derive(Debug, Clone, Default)]
pub struct ReleaseNotes {
    pub changes: Vec<String>,
    pub breaking: Vec<String>,
    pub deprecated: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionBump {
    pub name: String,
    pub from: String,
    pub to: String,
    /// Whether the command file's frontmatter was rewritten.
    pub stamped: bool,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: BTreeMap<String, CommandMetadata>,
}

impl Registry {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::metadata_path(root);
        let commands = match crate::io::read_optional(&path)? {
            Some(data) => serde_json::from_str(&data)?,
            None => BTreeMap::new(),
        };
        Ok(Self { commands })
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.commands)?;
        crate::io::atomic_write(&paths::metadata_path(root), data.as_bytes())
    }

    pub fn get(&self, name: &str) -> Option<&CommandMetadata> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandMetadata> {
        self.commands.values()
    }

    fn register(&mut self, file: &CommandFile, opts: InitOptions, now: DateTime<Utc>) {
        let ts = now.to_rfc3339();
        self.commands.insert(
            file.name.clone(),
            CommandMetadata {
                name: file.name.clone(),
                kind: file.kind,
                description: opts.description,
                current_version: INITIAL_VERSION.to_string(),
                created: ts.clone(),
                last_updated: ts.clone(),
                tags: opts.tags,
                dependencies: opts.dependencies,
                version_history: vec![CommandVersion {
                    version: INITIAL_VERSION.to_string(),
                    released: ts,
                    changes: vec!["Initial release".to_string()],
                    breaking_changes: vec![],
                    deprecated_features: vec![],
                }],
            },
        );
    }

    /// Start tracking the command at `path` at version 1.0.0 and stamp its
    /// frontmatter. Already-tracked commands are left untouched.
    pub fn initialize(
        &mut self,
        root: &Path,
        config: &Config,
        path: &Path,
        opts: InitOptions,
        now: DateTime<Utc>,
    ) -> Result<InitOutcome> {
        if !path.is_file() {
            return Err(SlashError::CommandFileNotFound(path.display().to_string()));
        }
        let file = CommandFile::from_path(root, path, config);
        if self.contains(&file.name) {
            return Ok(InitOutcome::AlreadyInitialized { name: file.name });
        }
        self.register(&file, opts, now);
        self.save(root)?;
        stamp_file(&file, INITIAL_VERSION)?;
        tracing::info!(command = %file.name, version = INITIAL_VERSION, "initialized");
        Ok(InitOutcome::Initialized { name: file.name })
    }

    /// Initialize every discovered command that is not tracked yet.
    /// Returns the names that were added.
    pub fn initialize_all(
        &mut self,
        root: &Path,
        config: &Config,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        let mut added = Vec::new();
        for file in command::discover(root, config)? {
            if self.contains(&file.name) {
                continue;
            }
            let opts = InitOptions {
                description: format!("{}: {}", file.kind.label(), title_case(&file.name)),
                ..InitOptions::default()
            };
            self.register(&file, opts, now);
            self.save(root)?;
            stamp_file(&file, INITIAL_VERSION)?;
            added.push(file.name);
        }
        tracing::info!(count = added.len(), "initialized untracked commands");
        Ok(added)
    }

    /// Bump a tracked command's version, record the release, stamp the
    /// command file when it exists, and prepend a changelog entry.
    pub fn update(
        &mut self,
        root: &Path,
        config: &Config,
        name: &str,
        change: ChangeType,
        notes: ReleaseNotes,
        now: DateTime<Utc>,
    ) -> Result<VersionBump> {
        if notes.changes.is_empty() {
            return Err(SlashError::NoChanges);
        }
        let meta = self
            .commands
            .get_mut(name)
            .ok_or_else(|| SlashError::CommandNotFound(name.to_string()))?;

        let from = meta.current_version.clone();
        let to = bump(&parse_version(&from)?, change)?.to_string();
        let ts = now.to_rfc3339();

        let release = CommandVersion {
            version: to.clone(),
            released: ts.clone(),
            changes: notes.changes,
            breaking_changes: notes.breaking,
            deprecated_features: notes.deprecated,
        };
        meta.current_version = to.clone();
        meta.last_updated = ts;
        meta.version_history.push(release.clone());
        self.save(root)?;

        let stamped = match command::find(root, config, name) {
            Some(file) => {
                stamp_file(&file, &to)?;
                true
            }
            None => {
                tracing::warn!(command = %name, "command file not found, frontmatter not stamped");
                false
            }
        };

        let entry = changelog::render_entry(name, &release, now.date_naive());
        changelog::insert_entry(&paths::changelog_path(root), &config.changelog.title, &entry)?;

        tracing::info!(command = %name, %from, %to, %change, "version updated");
        Ok(VersionBump {
            name: name.to_string(),
            from,
            to,
            stamped,
        })
    }

    /// True when the tracked version of `name` is at least `required`.
    /// Untracked commands are never compatible.
    pub fn is_compatible(&self, name: &str, required: &str) -> Result<bool> {
        let required = parse_version(required)?;
        let Some(meta) = self.commands.get(name) else {
            return Ok(false);
        };
        Ok(parse_version(&meta.current_version)? >= required)
    }

    pub fn render_report(&self, now: DateTime<Utc>) -> String {
        let mut lines = vec![
            "# Command Version Report\n".to_string(),
            format!("Generated: {}\n", now.format("%Y-%m-%d %H:%M:%S")),
        ];
        for (kind, heading) in [
            (CommandKind::Workflow, "Workflows"),
            (CommandKind::Tool, "Tools"),
        ] {
            let group: Vec<&CommandMetadata> =
                self.commands.values().filter(|m| m.kind == kind).collect();
            if group.is_empty() {
                continue;
            }
            lines.push(format!("\n## {heading}\n"));
            for meta in group {
                lines.push(format!("- **{}** (v{})", meta.name, meta.current_version));
                if !meta.description.is_empty() {
                    lines.push(format!("  - {}", meta.description));
                }
                lines.push(format!("  - Last updated: {}", meta.last_updated_date()));
                lines.push(String::new());
            }
        }
        lines.join("\n")
    }
}

fn stamp_file(file: &CommandFile, version: &str) -> Result<()> {
    let content = file.read()?;
    let stamped = frontmatter::stamp_version(&content, version);
    crate::io::atomic_write(&file.path, stamped.as_bytes())
}

/// `api-scaffold` → `Api Scaffold`, `k8s-manifest` → `K8S Manifest`.
/// Every letter that follows a non-letter starts a new word.
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.chars() {
        let c = if c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
