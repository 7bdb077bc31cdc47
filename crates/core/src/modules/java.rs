//! Base JVM setup shared by every project

use super::{ConventionModule, ModuleContext};
use crate::{
    context::{ProjectContext, ProjectLanguage, ProjectType},
    error::Result,
};

pub struct JavaModule;

impl JavaModule {
    pub const NAME: &'static str = "java";
}

impl ConventionModule for JavaModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_applicable(&self, project: &ProjectContext) -> bool {
        matches!(
            project.language(),
            ProjectLanguage::Java | ProjectLanguage::Kotlin
        )
    }

    fn apply(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        let plugin = match ctx.project().project_type() {
            ProjectType::Library => "java-library",
            ProjectType::Application => "java",
        };
        ctx.ensure_plugin_applied(plugin)?;

        let java_version = ctx.project().flags().java_version.clone();
        ctx.configure_extension("java", "sourceCompatibility", &java_version);
        ctx.configure_extension("java", "targetCompatibility", &java_version);

        Ok(())
    }
}
