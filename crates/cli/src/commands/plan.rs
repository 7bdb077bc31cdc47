use anyhow::Result;
use projectcfg_core::{WriteMode, run_workspace};

use crate::utils::load_project;

/// Print what `apply` would declare, as JSON on stdout
pub fn plan_command(cwd: Option<&str>) -> Result<()> {
    let project = load_project(cwd)?;
    let run = run_workspace(&project.config, &project.root, WriteMode::Check)?;
    println!("{}", serde_json::to_string_pretty(&run)?);
    Ok(())
}
