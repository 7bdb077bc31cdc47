use projectcfg_core::{FileStatus, ModuleStatus, workspace::ProjectRun};
use std::path::Path;

pub fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Created => "created",
        FileStatus::Updated => "updated",
        FileStatus::Unchanged => "unchanged",
    }
}

/// Print modules and files of one project run, paths relative to `root`
pub fn print_project_run(run: &ProjectRun, root: &Path) {
    let report = &run.report;
    println!("\n📦 {} ({}, {})", report.project, run.context.language(), run.context.project_type());

    let applied: Vec<&str> = report.applied().collect();
    let skipped: Vec<&str> = report
        .modules
        .iter()
        .filter(|m| m.status == ModuleStatus::Skipped)
        .map(|m| m.name.as_str())
        .collect();

    if applied.is_empty() {
        println!("   🧩 Applied: none");
    } else {
        println!("   🧩 Applied: {}", applied.join(", "));
    }
    if !skipped.is_empty() {
        println!("   ⏭️  Skipped: {}", skipped.join(", "));
    }

    for file in &report.files {
        let path = file.path.strip_prefix(root).unwrap_or(&file.path);
        let icon = if file.status.is_drift() { "📝" } else { "✔️ " };
        println!(
            "   {icon} {} [{}] {}",
            path.display(),
            file.module,
            status_label(file.status)
        );
    }
}
