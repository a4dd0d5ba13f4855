use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CommandKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Workflow,
    Tool,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Workflow => "workflow",
            CommandKind::Tool => "tool",
        }
    }

    /// Title used for the generated description of a freshly registered command.
    pub fn label(self) -> &'static str {
        match self {
            CommandKind::Workflow => "Workflow",
            CommandKind::Tool => "Tool",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Error,
    Warning,
    Info,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Level::Error => "❌",
            Level::Warning => "⚠️",
            Level::Info => "ℹ️",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChangeType
// ---------------------------------------------------------------------------

/// Semantic version component to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// Breaking changes.
    Major,
    /// New behavior, backward compatible.
    Minor,
    /// Fixes.
    Patch,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Major => "major",
            ChangeType::Minor => "minor",
            ChangeType::Patch => "patch",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeType {
    type Err = crate::error::SlashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(ChangeType::Major),
            "minor" => Ok(ChangeType::Minor),
            "patch" => Ok(ChangeType::Patch),
            _ => Err(crate::error::SlashError::InvalidChangeType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_type_from_str() {
        assert_eq!("major".parse::<ChangeType>().unwrap(), ChangeType::Major);
        assert_eq!("minor".parse::<ChangeType>().unwrap(), ChangeType::Minor);
        assert_eq!("patch".parse::<ChangeType>().unwrap(), ChangeType::Patch);
        assert!("breaking".parse::<ChangeType>().is_err());
    }

    #[test]
    fn level_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Level::Warning).unwrap(), "\"warning\"");
        assert_eq!(serde_json::to_string(&Level::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn command_kind_display() {
        assert_eq!(CommandKind::Workflow.to_string(), "workflow");
        assert_eq!(CommandKind::Tool.label(), "Tool");
    }
}
