use anyhow::Result;
use projectcfg_core::Orchestrator;

use crate::utils::load_project;

pub fn modules_command(cwd: Option<&str>) -> Result<()> {
    let project = load_project(cwd)?;
    let orchestrator = Orchestrator::new(project.config.versions.clone());

    let root = project.config.root_context(&project.root);
    let mut contexts = vec![root.clone()];
    contexts.extend(project.config.subproject_contexts(&root));

    println!("🧩 Convention modules (in order):");
    for module in orchestrator.modules() {
        let applies: Vec<&str> = contexts
            .iter()
            .filter(|ctx| module.is_applicable(ctx))
            .map(|ctx| ctx.name())
            .collect();

        if applies.is_empty() {
            println!("   • {:<12} ⏭️  not applicable", module.name());
        } else {
            println!("   • {:<12} ✅ {}", module.name(), applies.join(", "));
        }
    }

    Ok(())
}
