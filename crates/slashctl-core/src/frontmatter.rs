//! YAML frontmatter handling for command files.
//!
//! A frontmatter block starts on the very first line with `---` and ends at the
//! next line that begins with `---`. Everything after the closing delimiter is
//! the markdown body.

use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

fn opening(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Split `content` into `(yaml, rest)` where `rest` starts right after the
/// closing `---` (usually with the newline that ends that line).
pub fn split(content: &str) -> Option<(&str, &str)> {
    let rest = opening(content)?;
    if let Some(after) = rest.strip_prefix("---") {
        return Some(("", after));
    }
    let end = rest.find("\n---")?;
    let yaml = rest[..end].strip_suffix('\r').unwrap_or(&rest[..end]);
    Some((yaml, &rest[end + "\n---".len()..]))
}

/// True when the file opens a frontmatter block that never closes.
pub fn has_unclosed_block(content: &str) -> bool {
    opening(content).is_some() && split(content).is_none()
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Fields of interest from a command's frontmatter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// `version` rendered as text, whether YAML typed it as a string or number.
    pub version: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `tags` was present but not a list of strings.
    pub malformed_tags: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Yaml(String),
    NotAMapping,
}

pub fn parse(yaml: &str) -> Result<Frontmatter, ParseError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| ParseError::Yaml(e.to_string()))?;
    let map = match value {
        serde_yaml::Value::Null => return Ok(Frontmatter::default()),
        serde_yaml::Value::Mapping(m) => m,
        _ => return Err(ParseError::NotAMapping),
    };

    let mut fm = Frontmatter::default();

    if let Some(v) = map.get("version") {
        fm.version = Some(scalar_text(v));
    }

    if let Some(v) = map.get("tags") {
        match v {
            serde_yaml::Value::Sequence(items) => {
                let tags: Option<Vec<String>> = items
                    .iter()
                    .map(|t| t.as_str().map(str::to_string))
                    .collect();
                match tags {
                    Some(t) => fm.tags = Some(t),
                    None => fm.malformed_tags = true,
                }
            }
            _ => fm.malformed_tags = true,
        }
    }

    Ok(fm)
}

fn scalar_text(v: &serde_yaml::Value) -> String {
    match v {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Parse the frontmatter of a whole file. `None` when there is no closed block.
pub fn read(content: &str) -> Option<Result<Frontmatter, ParseError>> {
    split(content).map(|(yaml, _)| parse(yaml))
}

// ---------------------------------------------------------------------------
// Stamping
// ---------------------------------------------------------------------------

static VERSION_LINE_RE: OnceLock<Regex> = OnceLock::new();

fn version_line_re() -> &'static Regex {
    VERSION_LINE_RE.get_or_init(|| Regex::new(r"(?m)^version:[ \t]*.*$").unwrap())
}

/// Return `content` with its frontmatter `version` set to `version`.
///
/// Existing `version:` lines are rewritten in place, a closed block without one
/// gets the field appended, and files without a closed block get a new block
/// prepended.
pub fn stamp_version(content: &str, version: &str) -> String {
    let line = format!("version: {version}");
    match split(content) {
        Some((yaml, rest)) => {
            let yaml = if version_line_re().is_match(yaml) {
                version_line_re()
                    .replacen(yaml, 1, regex::NoExpand(&line))
                    .into_owned()
            } else if yaml.trim().is_empty() {
                line
            } else {
                format!("{}\n{line}", yaml.trim_end())
            };
            format!("---\n{yaml}\n---{rest}")
        }
        None => format!("---\n{line}\n---\n{content}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_basic() {
        let (yaml, rest) = split("---\nversion: 1.0.0\n---\n# Title\n").unwrap();
        assert_eq!(yaml, "version: 1.0.0");
        assert_eq!(rest, "\n# Title\n");
    }

    #[test]
    fn split_empty_block() {
        let (yaml, rest) = split("---\n---\nbody").unwrap();
        assert_eq!(yaml, "");
        assert_eq!(rest, "\nbody");
    }

    #[test]
    fn split_crlf() {
        let (yaml, _) = split("---\r\nversion: 2.0.0\r\n---\r\nbody").unwrap();
        assert_eq!(yaml, "version: 2.0.0");
    }

    #[test]
    fn split_without_frontmatter() {
        assert!(split("# Title\n---\n").is_none());
        assert!(split("----\nnot frontmatter\n---\n").is_none());
    }

    #[test]
    fn unclosed_block_detected() {
        assert!(has_unclosed_block("---\nversion: 1.0.0\n# Title\n"));
        assert!(!has_unclosed_block("---\nversion: 1.0.0\n---\n"));
        assert!(!has_unclosed_block("# Title"));
    }

    #[test]
    fn parse_version_and_tags() {
        let fm = parse("version: 1.2.3\ntags: [api, backend]").unwrap();
        assert_eq!(fm.version.as_deref(), Some("1.2.3"));
        assert_eq!(fm.tags, Some(vec!["api".to_string(), "backend".to_string()]));
        assert!(!fm.malformed_tags);
    }

    #[test]
    fn parse_numeric_version_as_text() {
        let fm = parse("version: 1.0").unwrap();
        assert_eq!(fm.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn parse_empty_is_default() {
        assert_eq!(parse("").unwrap(), Frontmatter::default());
    }

    #[test]
    fn parse_rejects_non_mapping() {
        assert_eq!(parse("- a\n- b").unwrap_err(), ParseError::NotAMapping);
    }

    #[test]
    fn parse_reports_yaml_errors() {
        assert!(matches!(parse("version: [1, 2"), Err(ParseError::Yaml(_))));
    }

    #[test]
    fn parse_flags_malformed_tags() {
        assert!(parse("tags: backend").unwrap().malformed_tags);
        assert!(parse("tags: [1, {a: b}]").unwrap().malformed_tags);
    }

    #[test]
    fn stamp_prepends_block() {
        let out = stamp_version("# Deploy\n", "1.0.0");
        assert_eq!(out, "---\nversion: 1.0.0\n---\n# Deploy\n");
    }

    #[test]
    fn stamp_replaces_existing_version() {
        let out = stamp_version("---\ntags: [ops]\nversion: 1.0.0\n---\n# Deploy\n", "1.1.0");
        assert_eq!(out, "---\ntags: [ops]\nversion: 1.1.0\n---\n# Deploy\n");
    }

    #[test]
    fn stamp_appends_missing_version() {
        let out = stamp_version("---\ntags: [ops]\n---\n# Deploy\n", "2.0.0");
        assert_eq!(out, "---\ntags: [ops]\nversion: 2.0.0\n---\n# Deploy\n");
    }

    #[test]
    fn stamp_leaves_similar_keys_alone() {
        let out = stamp_version("---\nmin_version: 0.1.0\n---\nbody", "1.0.1");
        assert_eq!(out, "---\nmin_version: 0.1.0\nversion: 1.0.1\n---\nbody");
    }

    #[test]
    fn stamp_unclosed_block_prepends() {
        let out = stamp_version("---\nbroken\n", "1.0.0");
        assert!(out.starts_with("---\nversion: 1.0.0\n---\n---\nbroken"));
    }

    #[test]
    fn stamp_then_read() {
        let out = stamp_version("# Title\n\nBody with $ARGUMENTS\n", "3.4.5");
        let fm = read(&out).unwrap().unwrap();
        assert_eq!(fm.version.as_deref(), Some("3.4.5"));
    }
}
