use anyhow::{Context, Result, bail};
use projectcfg_core::config::{CONFIG_FILE_NAME, ProjectConfig};
use std::{env, path::{Path, PathBuf}};
use tracing::debug;

/// A configuration file together with the directory it governs
pub struct LoadedProject {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config: ProjectConfig,
}

/// Resolve `--cwd` or the process working directory
pub fn project_root(cwd: Option<&str>) -> Result<PathBuf> {
    let root = match cwd {
        Some(cwd) => PathBuf::from(cwd),
        None => env::current_dir().context("Failed to get current directory")?,
    };

    root.canonicalize()
        .with_context(|| format!("Failed to canonicalize {}", root.display()))
}

/// Find the nearest configuration file above `cwd` and load it
pub fn load_project(cwd: Option<&str>) -> Result<LoadedProject> {
    let start = project_root(cwd)?;
    let Some(config_path) = ProjectConfig::find_config_file(&start) else {
        bail!(
            "No {} found in {} or any parent directory. Run `projectcfg init` first",
            CONFIG_FILE_NAME,
            start.display()
        );
    };
    debug!("Using config: {}", config_path.display());

    let config = ProjectConfig::load_from_file(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let root = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start.clone());

    Ok(LoadedProject {
        root,
        config_path,
        config,
    })
}

/// The `log_level` of the governing config, if any can be read
pub fn configured_log_level(cwd: Option<&str>) -> Option<String> {
    let start = project_root(cwd).ok()?;
    let path = ProjectConfig::find_config_file(&start)?;
    ProjectConfig::load_from_file(&path).ok()?.log_level
}
