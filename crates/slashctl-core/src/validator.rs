use crate::command::{self, CommandFile};
use crate::config::Config;
use crate::frontmatter::{self, ParseError};
use crate::types::{CommandKind, Level};
use crate::version;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Finding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub level: Level,
    pub message: String,
    /// 1-based line the finding points at, when it has one.
    #[serde(rename = "line_number")]
    pub line: Option<usize>,
    /// Id of the check that produced this finding.
    pub rule: String,
}

impl Finding {
    fn new(rule: &str, level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            rule: rule.to_string(),
        }
    }

    fn at(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

// ---------------------------------------------------------------------------
// CheckContext
// ---------------------------------------------------------------------------

pub struct CheckContext<'a> {
    pub root: &'a Path,
    pub config: &'a Config,
    pub command: &'a CommandFile,
    pub content: &'a str,
}

impl CheckContext<'_> {
    fn name(&self) -> &str {
        &self.command.name
    }

    /// Body lines outside frontmatter and fenced code blocks, paired with
    /// their 1-based number.
    fn prose_lines(&self) -> Vec<(usize, &str)> {
        let skip = match frontmatter::split(self.content) {
            Some((_, rest)) => {
                let head = &self.content[..self.content.len() - rest.len()];
                head.matches('\n').count() + 1
            }
            None => 0,
        };
        let mut in_fence = false;
        let mut out = Vec::new();
        for (i, line) in self.content.lines().enumerate().skip(skip) {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                continue;
            }
            if !in_fence {
                out.push((i + 1, line));
            }
        }
        out
    }

    fn line_of(&self, byte_offset: usize) -> usize {
        self.content[..byte_offset].matches('\n').count() + 1
    }
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

/// A fn-pointer check. Checks scoped to workflows only run on workflow files.
pub struct Check {
    pub id: &'static str,
    pub workflow_only: bool,
    pub run: fn(&CheckContext) -> Vec<Finding>,
}

pub fn default_checks() -> Vec<Check> {
    vec![
        Check { id: "structure", workflow_only: false, run: check_structure },
        Check { id: "naming", workflow_only: false, run: check_naming },
        Check { id: "placeholders", workflow_only: false, run: check_placeholders },
        Check { id: "markdown", workflow_only: false, run: check_markdown },
        Check { id: "references", workflow_only: false, run: check_references },
        Check { id: "metadata", workflow_only: false, run: check_metadata },
        Check { id: "task_tool", workflow_only: true, run: check_task_tool },
        Check { id: "subagents", workflow_only: true, run: check_subagents },
    ]
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

pub struct Validator {
    checks: Vec<Check>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(default_checks())
    }
}

impl Validator {
    pub fn new(checks: Vec<Check>) -> Self {
        Self { checks }
    }

    pub fn validate(&self, ctx: &CheckContext) -> Vec<Finding> {
        let is_workflow = ctx.command.kind == CommandKind::Workflow;
        let mut findings = Vec::new();
        for check in &self.checks {
            if check.workflow_only && !is_workflow {
                continue;
            }
            let found = (check.run)(ctx);
            if !found.is_empty() {
                tracing::debug!(
                    command = %ctx.command.name,
                    check = check.id,
                    count = found.len(),
                    "check reported findings"
                );
            }
            findings.extend(found);
        }
        findings
    }
}

// ---------------------------------------------------------------------------
// Common checks
// ---------------------------------------------------------------------------

fn check_structure(ctx: &CheckContext) -> Vec<Finding> {
    let mut out = Vec::new();
    if ctx.content.trim().is_empty() {
        out.push(Finding::new("structure", Level::Error, "Command file is empty"));
    }
    if !ctx.prose_lines().iter().any(|(_, l)| l.starts_with('#')) {
        out.push(Finding::new(
            "structure",
            Level::Warning,
            "Command should have at least one header",
        ));
    }
    out
}

fn check_naming(ctx: &CheckContext) -> Vec<Finding> {
    let mut out = Vec::new();
    let name = ctx.name();
    if !crate::paths::is_command_name(name) {
        out.push(Finding::new(
            "naming",
            Level::Error,
            format!("Command name '{name}' must use lowercase-hyphen format"),
        ));
    }
    let max = ctx.config.validation.max_name_length;
    if name.chars().count() > max {
        out.push(Finding::new(
            "naming",
            Level::Warning,
            format!("Command name '{name}' is longer than {max} characters"),
        ));
    }
    out
}

fn check_placeholders(ctx: &CheckContext) -> Vec<Finding> {
    let name = ctx.name();
    let wants_args = ctx
        .config
        .validation
        .argument_keywords
        .iter()
        .any(|k| name.contains(k.as_str()));
    if wants_args && !ctx.content.contains("$ARGUMENTS") {
        return vec![Finding::new(
            "placeholders",
            Level::Warning,
            "Command likely needs $ARGUMENTS placeholder based on its name",
        )];
    }
    Vec::new()
}

fn check_markdown(ctx: &CheckContext) -> Vec<Finding> {
    let mut out = Vec::new();

    if ctx.content.matches("```").count() % 2 != 0 {
        out.push(Finding::new("markdown", Level::Error, "Unclosed code block detected"));
    }

    let headers: Vec<(usize, usize)> = ctx
        .prose_lines()
        .into_iter()
        .filter(|(_, l)| l.starts_with('#'))
        .map(|(n, l)| (l.len() - l.trim_start_matches('#').len(), n))
        .collect();

    for pair in headers.windows(2) {
        let (prev, _) = pair[0];
        let (curr, line) = pair[1];
        if curr > prev + 1 {
            out.push(
                Finding::new(
                    "markdown",
                    Level::Warning,
                    format!("Header level jumps from {prev} to {curr}"),
                )
                .at(line),
            );
        }
    }
    out
}

static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();

fn reference_re() -> &'static Regex {
    REFERENCE_RE.get_or_init(|| Regex::new(r"(?m)(?:^|[\s`])/([a-z][a-z0-9-]+)").unwrap())
}

/// `/name` tokens that end at whitespace, a backtick, or end of input.
/// Returns each distinct name with the byte offset of its first occurrence.
pub fn command_references(content: &str) -> Vec<(String, usize)> {
    let mut refs: Vec<(String, usize)> = Vec::new();
    for caps in reference_re().captures_iter(content) {
        let Some(m) = caps.get(1) else { continue };
        let terminated = content[m.end()..]
            .chars()
            .next()
            .map(|c| c.is_whitespace() || c == '`')
            .unwrap_or(true);
        if !terminated {
            continue;
        }
        if refs.iter().any(|(r, _)| r == m.as_str()) {
            continue;
        }
        refs.push((m.as_str().to_string(), m.start()));
    }
    refs
}

fn check_references(ctx: &CheckContext) -> Vec<Finding> {
    command_references(ctx.content)
        .into_iter()
        .filter(|(r, _)| r != ctx.name())
        .filter(|(r, _)| !ctx.config.validation.is_ignored_reference(r))
        .filter(|(r, _)| !command::exists(ctx.root, ctx.config, r))
        .map(|(r, offset)| {
            Finding::new(
                "references",
                Level::Warning,
                format!("Referenced command '/{r}' not found"),
            )
            .at(ctx.line_of(offset))
        })
        .collect()
}

fn check_metadata(ctx: &CheckContext) -> Vec<Finding> {
    if frontmatter::has_unclosed_block(ctx.content) {
        return vec![Finding::new(
            "metadata",
            Level::Warning,
            "Frontmatter block is not closed with '---'",
        )
        .at(1)];
    }

    let fm = match frontmatter::read(ctx.content) {
        None => {
            return vec![Finding::new(
                "metadata",
                Level::Info,
                "Command has no version in frontmatter",
            )]
        }
        Some(Err(ParseError::Yaml(e))) => {
            return vec![Finding::new(
                "metadata",
                Level::Error,
                format!("Invalid YAML frontmatter: {e}"),
            )]
        }
        Some(Err(ParseError::NotAMapping)) => {
            return vec![Finding::new(
                "metadata",
                Level::Error,
                "Invalid YAML frontmatter: expected a mapping of keys to values",
            )]
        }
        Some(Ok(fm)) => fm,
    };

    let mut out = Vec::new();
    match &fm.version {
        Some(v) if !version::is_strict_version(v) => out.push(Finding::new(
            "metadata",
            Level::Error,
            format!("Invalid version format: {v}"),
        )),
        Some(_) => {}
        None => out.push(Finding::new(
            "metadata",
            Level::Info,
            "Command has no version in frontmatter",
        )),
    }
    if fm.malformed_tags {
        out.push(Finding::new(
            "metadata",
            Level::Warning,
            "Frontmatter 'tags' should be a list of strings",
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Workflow checks
// ---------------------------------------------------------------------------

fn check_task_tool(ctx: &CheckContext) -> Vec<Finding> {
    let mut out = Vec::new();
    let uses_task_tool = ctx.content.contains("Task tool");
    if !uses_task_tool && !ctx.content.to_lowercase().contains("subagent") {
        out.push(Finding::new(
            "task_tool",
            Level::Warning,
            "Workflow should use Task tool for subagent coordination",
        ));
    }
    if uses_task_tool && !ctx.content.contains("subagent_type") {
        out.push(Finding::new(
            "task_tool",
            Level::Warning,
            "Workflow using Task tool should specify subagent_type",
        ));
    }
    out
}

static SUBAGENT_RE: OnceLock<Regex> = OnceLock::new();

fn subagent_re() -> &'static Regex {
    SUBAGENT_RE.get_or_init(|| Regex::new(r#"subagent_type["\s=:]+([a-z-]+)"#).unwrap())
}

fn check_subagents(ctx: &CheckContext) -> Vec<Finding> {
    let mut seen: Vec<&str> = Vec::new();
    let mut out = Vec::new();
    for caps in subagent_re().captures_iter(ctx.content) {
        let Some(m) = caps.get(1) else { continue };
        let agent = m.as_str();
        if seen.contains(&agent) {
            continue;
        }
        seen.push(agent);
        if !ctx.config.validation.is_known_subagent(agent) {
            out.push(
                Finding::new(
                    "subagents",
                    Level::Warning,
                    format!("Unknown subagent type: {agent}"),
                )
                .at(ctx.line_of(m.start())),
            );
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
