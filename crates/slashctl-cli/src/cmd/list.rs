use crate::output::{print_json, print_table};
use anyhow::Context;
use slashctl_core::command;
use slashctl_core::config::Config;
use slashctl_core::version::Registry;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let commands = command::discover(root, &config).context("failed to list commands")?;
    let registry = Registry::load(root).context("failed to load command metadata")?;

    if json {
        let value: Vec<_> = commands
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name,
                    "type": c.kind,
                    "path": c.path.strip_prefix(root).unwrap_or(&c.path),
                    "version": registry.get(&c.name).map(|m| m.current_version.as_str()),
                })
            })
            .collect();
        return print_json(&value);
    }

    if commands.is_empty() {
        println!(
            "No commands found under {}/ or {}/.",
            config.workflows_dir, config.tools_dir
        );
        return Ok(());
    }

    let rows = commands
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.kind.to_string(),
                registry
                    .get(&c.name)
                    .map(|m| m.current_version.clone())
                    .unwrap_or_else(|| "-".to_string()),
                c.path
                    .strip_prefix(root)
                    .unwrap_or(&c.path)
                    .display()
                    .to_string(),
            ]
        })
        .collect();
    print_table(&["NAME", "TYPE", "VERSION", "PATH"], rows);
    Ok(())
}
