use crate::output::print_json;
use anyhow::Context;
use slashctl_core::config::Config;
use slashctl_core::paths;
use slashctl_core::report::ValidationRun;
use std::path::Path;

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

pub fn run(root: &Path, output: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let run = ValidationRun::execute(root, &config).context("failed to validate commands")?;

    match output {
        Some(out) => {
            let saved = if json {
                run.save_json(out)
            } else {
                run.save_markdown(out)
            };
            saved.with_context(|| format!("failed to write report to {}", out.display()))?;
            println!("Validation report saved to: {}", out.display());
            if run.has_errors() {
                print!("{}", run.render_markdown());
            }
        }
        None if json => print_json(&run.to_json())?,
        None => print!("{}", run.render_markdown()),
    }

    fail_on_errors(&run)
}

fn fail_on_errors(run: &ValidationRun) -> anyhow::Result<()> {
    let totals = run.totals();
    if totals.errors > 0 {
        anyhow::bail!(
            "validation found {} error(s) across {} command(s)",
            totals.errors,
            totals.commands
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// test
// ---------------------------------------------------------------------------

pub fn run_tests(root: &Path) -> anyhow::Result<()> {
    println!("Running command validation tests...");
    let config = Config::load(root).context("failed to load config")?;
    let run = ValidationRun::execute(root, &config).context("failed to validate commands")?;

    let report = paths::report_path(root);
    run.save_markdown(&report)
        .with_context(|| format!("failed to write report to {}", report.display()))?;

    if run.has_errors() {
        println!("❌ Command validation failed!");
        println!();
        print!("{}", run.render_markdown());
        return fail_on_errors(&run);
    }

    let totals = run.totals();
    println!(
        "✅ All command validations passed! ({} commands, {} warnings)",
        totals.commands, totals.warnings
    );
    println!("Report: {}", report.display());
    Ok(())
}
