use crate::error::Result;
use crate::version::CommandVersion;
use chrono::NaiveDate;
use std::path::Path;

/// Render the changelog section for one release of one command.
pub fn render_entry(name: &str, release: &CommandVersion, date: NaiveDate) -> String {
    let mut out = format!(
        "\n## [{name}] {} - {}\n",
        release.version,
        date.format("%Y-%m-%d")
    );
    for (heading, items) in [
        ("Breaking Changes", &release.breaking_changes),
        ("Changes", &release.changes),
        ("Deprecated", &release.deprecated_features),
    ] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n### {heading}\n"));
        for item in items {
            out.push_str(&format!("- {item}\n"));
        }
    }
    out
}

/// Insert `entry` right below the first `# ` heading of the changelog at
/// `path`, creating the file with `title` when it does not exist yet.
pub fn insert_entry(path: &Path, title: &str, entry: &str) -> Result<()> {
    let updated = match crate::io::read_optional(path)? {
        Some(existing) => {
            let mut lines: Vec<&str> = existing.split('\n').collect();
            let at = lines
                .iter()
                .position(|l| l.starts_with("# "))
                .map(|i| i + 1)
                .unwrap_or(0);
            lines.insert(at, entry);
            lines.join("\n")
        }
        None => format!("{title}\n{entry}"),
    };
    crate::io::atomic_write(path, updated.as_bytes())?;
    tracing::debug!(path = %path.display(), "changelog updated");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn release() -> CommandVersion {
        CommandVersion {
            version: "2.0.0".to_string(),
            released: "2026-03-01T00:00:00+00:00".to_string(),
            changes: vec!["Split deploy into stages".to_string()],
            breaking_changes: vec!["Drops --legacy flag".to_string()],
            deprecated_features: vec![],
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn entry_lists_non_empty_sections_in_order() {
        let entry = render_entry("deploy-checklist", &release(), date());
        assert!(entry.starts_with("\n## [deploy-checklist] 2.0.0 - 2026-03-01\n"));
        let breaking = entry.find("### Breaking Changes").unwrap();
        let changes = entry.find("### Changes").unwrap();
        assert!(breaking < changes);
        assert!(!entry.contains("### Deprecated"));
        assert!(entry.contains("- Drops --legacy flag\n"));
    }

    #[test]
    fn creates_changelog_with_title() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        let entry = render_entry("deploy-checklist", &release(), date());
        insert_entry(&path, "# Commands Changelog", &entry).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Commands Changelog\n\n## [deploy-checklist] 2.0.0"));
    }

    #[test]
    fn newest_entry_goes_below_title() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        std::fs::write(&path, "# Changelog\n\n## [old-cmd] 1.0.1 - 2026-01-01\n").unwrap();
        let entry = render_entry("deploy-checklist", &release(), date());
        insert_entry(&path, "# unused", &entry).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let new_pos = content.find("[deploy-checklist]").unwrap();
        let old_pos = content.find("[old-cmd]").unwrap();
        assert!(content.starts_with("# Changelog\n"));
        assert!(new_pos < old_pos);
        assert!(!content.contains("# unused"));
    }

    #[test]
    fn headless_changelog_gets_entry_on_top() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        std::fs::write(&path, "notes only\n").unwrap();
        let entry = render_entry("deploy-checklist", &release(), date());
        insert_entry(&path, "# unused", &entry).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("\n## [deploy-checklist]"));
        assert!(content.contains("notes only"));
    }
}
