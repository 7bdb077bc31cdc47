use anyhow::{Context, Result};
use projectcfg_core::{
    ProjectConfig, ProjectLanguage,
    config::{CONFIG_FILE_NAME, SubprojectConfig},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::utils::project_root;

const BUILD_FILES: [&str; 2] = ["build.gradle", "build.gradle.kts"];

pub fn init_command(cwd: Option<&str>, force: bool) -> Result<()> {
    let project_root = project_root(cwd)?;
    let config_path = project_root.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    println!("🚀 Initializing projectcfg in: {}", project_root.display());

    let build_dirs = find_build_dirs(&project_root);
    println!("📦 Found {} Gradle build files", build_dirs.len());

    let language = if build_dirs
        .iter()
        .chain(std::iter::once(&project_root))
        .any(|dir| dir.join("src/main/kotlin").is_dir())
    {
        ProjectLanguage::Kotlin
    } else {
        ProjectLanguage::Java
    };

    let subprojects = build_dirs
        .iter()
        .filter(|dir| **dir != project_root)
        .filter_map(|dir| dir.strip_prefix(&project_root).ok())
        .map(|relative| SubprojectConfig {
            path: relative.to_string_lossy().replace('\\', "/"),
            ..Default::default()
        })
        .collect::<Vec<_>>();

    for sub in &subprojects {
        println!("   • subproject {}", sub.path);
    }

    let config = ProjectConfig {
        name: project_root
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string),
        language,
        subprojects,
        ..Default::default()
    };

    config
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    info!("Wrote {}", config_path.display());

    println!("✅ Created config: {}", config_path.display());
    println!("\n📌 Next: edit type/framework/flags, then run `projectcfg apply`");

    Ok(())
}

/// Directories holding a Gradle build file, sorted, skipping build output
fn find_build_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            // Skip build output, tool caches and hidden directories
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            match e.file_name().to_str() {
                Some(name) => !(name.starts_with('.') || name == "build" || name == "node_modules"),
                None => false,
            }
        })
        .filter_map(|e| e.ok())
    {
        let is_build_file = entry
            .file_name()
            .to_str()
            .is_some_and(|name| BUILD_FILES.contains(&name));
        if is_build_file {
            if let Some(parent) = entry.path().parent() {
                debug!("Found build file in {}", parent.display());
                dirs.push(parent.to_path_buf());
            }
        }
    }

    dirs.sort();
    dirs.dedup();
    dirs
}
