//! JUnit 5 test wiring

use super::{ConventionModule, ModuleContext};
use crate::{
    context::{ProjectContext, ProjectLanguage},
    error::Result,
};
use tracing::{debug, warn};

pub struct JUnit5Module;

impl JUnit5Module {
    pub const NAME: &'static str = "junit5";
}

impl ConventionModule for JUnit5Module {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_applicable(&self, _project: &ProjectContext) -> bool {
        true
    }

    fn apply(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        configure_dependencies(ctx)?;
        configure_test_task(ctx);
        Ok(())
    }
}

fn configure_dependencies(ctx: &mut ModuleContext<'_>) -> Result<()> {
    let junit = ctx.versions().junit5.clone();
    ctx.ensure_dependency(
        "testImplementation",
        &format!("org.junit.jupiter:junit-jupiter-api:{junit}"),
    )?;
    ctx.ensure_dependency(
        "testImplementation",
        &format!("org.junit.jupiter:junit-jupiter-params:{junit}"),
    )?;
    ctx.ensure_dependency(
        "testRuntimeOnly",
        &format!("org.junit.jupiter:junit-jupiter-engine:{junit}"),
    )?;

    if ctx.project().is_language(ProjectLanguage::Kotlin) {
        let kotlin = ctx.versions().kotlin.clone();
        ctx.ensure_dependency(
            "testImplementation",
            &format!("org.jetbrains.kotlin:kotlin-test:{kotlin}"),
        )?;
    }

    Ok(())
}

fn configure_test_task(ctx: &mut ModuleContext<'_>) {
    let configured = ctx.configure_task("test", |test| {
        test.set("useJUnitPlatform", "true");
        test.set("testLogging.showExceptions", "true");
        test.set("testLogging.showStandardStreams", "true");
        test.set("testLogging.exceptionFormat", "FULL");
        // don't require tests
        test.set("filter.failOnNoMatchingTests", "false");
        // full retest, even if nothing changed
        test.depend_on("cleanTest");
    });

    if configured {
        debug!(module = JUnit5Module::NAME, "configured [test] for the JUnit platform");
    } else {
        warn!(module = JUnit5Module::NAME, "no [test] task, the java plugin is not applied");
    }
}
