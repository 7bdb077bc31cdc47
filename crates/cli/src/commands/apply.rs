use anyhow::{Context, Result};
use projectcfg_core::{WriteMode, run_workspace};
use std::process::ExitCode;
use tracing::info;

use crate::display::print_project_run;
use crate::utils::load_project;

pub fn apply_command(cwd: Option<&str>, check: bool) -> Result<ExitCode> {
    let project = load_project(cwd)?;
    let mode = if check { WriteMode::Check } else { WriteMode::Write };

    println!(
        "🚀 Applying conventions in: {}{}",
        project.root.display(),
        if check { " (check only)" } else { "" }
    );

    let run = run_workspace(&project.config, &project.root, mode)
        .with_context(|| format!("Failed to apply conventions from {}", project.config_path.display()))?;

    for project_run in run.runs() {
        print_project_run(project_run, &project.root);
    }

    let drifted = run
        .runs()
        .flat_map(|r| &r.report.files)
        .filter(|f| f.status.is_drift())
        .count();
    info!(drifted, "convention run finished");

    if check && drifted > 0 {
        println!("\n❌ {drifted} file(s) out of date. Run `projectcfg apply` to update them");
        return Ok(ExitCode::FAILURE);
    }

    if drifted == 0 {
        println!("\n✅ Everything up to date");
    } else {
        println!("\n✅ Updated {drifted} file(s)");
    }
    Ok(ExitCode::SUCCESS)
}
