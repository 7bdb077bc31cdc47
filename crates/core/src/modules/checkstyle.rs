//! Checkstyle static analysis for the root project
//!
//! Applies when the repository carries its own `checkstyle.xml` or a bundled
//! ruleset is selected via the `checkstyle_rule_set` flag.

use super::{ConventionModule, ModuleContext};
use crate::{
    context::ProjectContext,
    error::{Error, Result},
    host::TaskSpec,
};
use std::path::PathBuf;
use tracing::info;

const CONFIG_FILE: &str = "checkstyle.xml";
const AGGREGATE_TASK: &str = "checkstyleAll";

const BUNDLED_RULESETS: &[(&str, &str)] = &[
    ("google", include_str!("../../resources/checkstyle/google.xml")),
    ("sun", include_str!("../../resources/checkstyle/sun.xml")),
];

/// Content of a ruleset shipped with projectcfg
pub fn bundled_ruleset(name: &str) -> Option<&'static str> {
    BUNDLED_RULESETS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, content)| *content)
}

pub struct CheckstyleModule;

impl CheckstyleModule {
    pub const NAME: &'static str = "checkstyle";
}

impl ConventionModule for CheckstyleModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_applicable(&self, project: &ProjectContext) -> bool {
        project.is_root()
            && (project.root_dir().join(CONFIG_FILE).exists()
                || !project.flags().checkstyle_rule_set.is_empty())
    }

    fn apply(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        // resolve first so a bad ruleset leaves the project untouched
        let config_file = resolve_config_file(ctx)?;

        ctx.ensure_plugin_applied("checkstyle")?;
        register_aggregate_task(ctx)?;

        let tool_version = ctx.project().flags().checkstyle_tool_version.clone();
        ctx.configure_extension("checkstyle", "toolVersion", &tool_version);
        ctx.configure_extension("checkstyle", "configFile", &config_file.to_string_lossy());
        ctx.configure_extension("checkstyle", "maxWarnings", "0");
        ctx.configure_extension("checkstyle", "maxErrors", "0");
        info!(module = Self::NAME, config = %config_file.display(), "using checkstyle config");

        reporting_setup(ctx);
        Ok(())
    }
}

fn resolve_config_file(ctx: &mut ModuleContext<'_>) -> Result<PathBuf> {
    let project_file = ctx.project().root_dir().join(CONFIG_FILE);
    if project_file.exists() {
        return Ok(project_file);
    }

    let rule_set = ctx.project().flags().checkstyle_rule_set.clone();
    let content = bundled_ruleset(&rule_set).ok_or_else(|| {
        Error::configuration(
            CheckstyleModule::NAME,
            format!("checkstyle/{rule_set}.xml"),
            format!("checkstyle ruleset '{rule_set}' is not supported"),
        )
    })?;
    info!(module = CheckstyleModule::NAME, rule_set = %rule_set, "using bundled checkstyle ruleset");

    let target = ctx.project().build_dir().join("tmp").join(CONFIG_FILE);
    ctx.write_generated(&target, content)?;
    Ok(target)
}

fn register_aggregate_task(ctx: &mut ModuleContext<'_>) -> Result<()> {
    let mut task = TaskSpec::new(AGGREGATE_TASK, "Checkstyle").with_group("verification");

    if let Some(main) = ctx.main_source_dir() {
        task = task.with_source(main);
    }
    for sub in ctx.subprojects() {
        if !(sub.has_plugin("java") || sub.has_plugin("java-library")) {
            continue;
        }
        if let Some(main) = sub.main_source_dir {
            task = task.with_source(main);
        }
    }

    let task = task
        .with_exclude("**/generated/**")
        .with_exclude("**/internal/**");
    ctx.ensure_task(task)?;
    Ok(())
}

fn reporting_setup(ctx: &mut ModuleContext<'_>) {
    ctx.configure_task(AGGREGATE_TASK, |task| {
        task.set("reports.xml.required", "false");
        task.set("reports.html.required", "true");
    });
}
