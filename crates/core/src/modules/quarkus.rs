//! Quarkus defaults

use super::{ConventionModule, ModuleContext};
use crate::{
    context::{ProjectContext, ProjectFramework, ProjectType},
    error::Result,
    reconcile::PropertySet,
};

const QUARKUS_GROUP: &str = "io.quarkus";
const REST_EXTENSION: &str = "io.quarkus:quarkus-resteasy";

pub const PROPERTIES_FILE: &str = "src/main/resources/application.properties";

pub struct QuarkusModule;

impl QuarkusModule {
    pub const NAME: &'static str = "quarkus";
}

impl ConventionModule for QuarkusModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        let quarkus = ctx.versions().quarkus.clone();
        ctx.ensure_platform_constraint(&format!("{QUARKUS_GROUP}:quarkus-bom:{quarkus}"))?;
        Ok(())
    }

    fn is_applicable(&self, project: &ProjectContext) -> bool {
        project.is_framework(ProjectFramework::Quarkus)
    }

    fn apply(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        // versions come from the bom
        ctx.ensure_dependency("implementation", "io.quarkus:quarkus-arc")?;
        ctx.ensure_dependency("testImplementation", "io.quarkus:quarkus-junit5")?;

        let flags = ctx.project().flags().clone();
        if flags.framework_metrics {
            ctx.ensure_dependency("implementation", "io.quarkus:quarkus-micrometer-registry-prometheus")?;
            if ctx.has_dependency(&["implementation"], REST_EXTENSION) {
                ctx.ensure_dependency("implementation", "io.quarkus:quarkus-smallrye-health")?;
            }
        }
        if flags.framework_db_migrate {
            ctx.ensure_dependency("implementation", "io.quarkus:quarkus-flyway")?;
        }

        if ctx.project().is_type(ProjectType::Application) {
            ctx.ensure_plugin_applied(QUARKUS_GROUP)?;
            config_defaults(ctx)?;
        }
        Ok(())
    }
}

fn config_defaults(ctx: &mut ModuleContext<'_>) -> Result<()> {
    let flags = ctx.project().flags().clone();

    let mut properties = PropertySet::new()
        .with("quarkus.banner.enabled", "false")
        .with("quarkus.log.level", "INFO")
        .with(
            "quarkus.log.console.format",
            "%d{yyyy-MM-dd HH:mm:ss} %-5p %c{3.} : %s%e%n",
        )
        .with("quarkus.http.port", "8080")
        .with("quarkus.shutdown.timeout", "60s");

    if flags.framework_metrics {
        properties.insert("quarkus.micrometer.export.prometheus.enabled", "true");
        if ctx.has_dependency(&["implementation"], "io.quarkus:quarkus-smallrye-health") {
            properties.insert("quarkus.management.enabled", "true");
            properties.insert("quarkus.management.port", "8081");
        }
    }

    if flags.framework_db_migrate {
        properties.insert("quarkus.flyway.migrate-at-start", "true");
        properties.insert("quarkus.flyway.baseline-on-migrate", "true");
        properties.insert("quarkus.flyway.baseline-version", "0");
        properties.insert("quarkus.flyway.locations", "db/migration");
    }

    ctx.write_managed(PROPERTIES_FILE, properties)
}
