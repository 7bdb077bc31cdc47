//! Kotlin on the JVM

use super::{ConventionModule, ModuleContext};
use crate::{
    context::{ProjectContext, ProjectLanguage},
    error::Result,
};

pub struct KotlinModule;

impl KotlinModule {
    pub const NAME: &'static str = "kotlin";
}

impl ConventionModule for KotlinModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_applicable(&self, project: &ProjectContext) -> bool {
        project.is_language(ProjectLanguage::Kotlin)
    }

    fn apply(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        ctx.ensure_plugin_applied("org.jetbrains.kotlin.jvm")?;

        let kotlin = ctx.versions().kotlin.clone();
        ctx.ensure_dependency(
            "implementation",
            &format!("org.jetbrains.kotlin:kotlin-stdlib-jdk8:{kotlin}"),
        )?;

        let java_version = ctx.project().flags().java_version.clone();
        ctx.configure_extension("kotlin", "jvmTarget", &java_version);

        Ok(())
    }
}
