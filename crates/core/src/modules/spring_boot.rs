//! Spring Boot defaults
//!
//! Libraries only get the starters. Applications additionally switch logging
//! to log4j2, optionally wire metrics and native images, and get a managed
//! `application-default.properties`.

use super::{ConventionModule, ModuleContext};
use crate::{
    context::{ProjectContext, ProjectFramework, ProjectType},
    error::Result,
    host::TaskSpec,
    reconcile::PropertySet,
};

const BOOT_GROUP: &str = "org.springframework.boot";
const BOOT_PLUGIN: &str = "org.springframework.boot";
const WEB_STARTER: &str = "org.springframework.boot:spring-boot-starter-web";
const ACTUATOR_STARTER: &str = "org.springframework.boot:spring-boot-starter-actuator";
const NATIVE_REPOSITORY: &str = "https://repo.spring.io/release";

pub const PROPERTIES_FILE: &str = "src/main/resources/application-default.properties";

pub struct SpringBootModule;

impl SpringBootModule {
    pub const NAME: &'static str = "spring-boot";
}

impl ConventionModule for SpringBootModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        let boot = ctx.versions().spring_boot.clone();
        ctx.ensure_platform_constraint(&format!("{BOOT_GROUP}:spring-boot-dependencies:{boot}"))?;
        Ok(())
    }

    fn is_applicable(&self, project: &ProjectContext) -> bool {
        project.is_framework(ProjectFramework::SpringBoot)
    }

    fn apply(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        match ctx.project().project_type() {
            ProjectType::Library => configure_library(ctx),
            ProjectType::Application => {
                configure_application(ctx)?;
                config_defaults(ctx)
            }
        }
    }
}

fn configure_starters(ctx: &mut ModuleContext<'_>) -> Result<()> {
    let boot = ctx.versions().spring_boot.clone();
    ctx.ensure_dependency("implementation", &format!("{BOOT_GROUP}:spring-boot-starter:{boot}"))?;
    ctx.ensure_dependency(
        "testImplementation",
        &format!("{BOOT_GROUP}:spring-boot-starter-test:{boot}"),
    )?;
    Ok(())
}

fn configure_library(ctx: &mut ModuleContext<'_>) -> Result<()> {
    configure_starters(ctx)
}

fn configure_application(ctx: &mut ModuleContext<'_>) -> Result<()> {
    ctx.ensure_plugin_applied(BOOT_PLUGIN)?;
    configure_starters(ctx)?;

    // the plain jar is never deployed
    ctx.configure_task("jar", |jar| jar.enabled = false);

    // log4j2 instead of logback
    let boot = ctx.versions().spring_boot.clone();
    ctx.exclude_transitive("implementation", BOOT_GROUP, "spring-boot-starter-logging")?;
    ctx.ensure_dependency(
        "implementation",
        &format!("{BOOT_GROUP}:spring-boot-starter-log4j2:{boot}"),
    )?;
    let disruptor = ctx.versions().disruptor.clone();
    ctx.ensure_dependency("implementation", &format!("com.lmax:disruptor:{disruptor}"))?;

    if ctx.project().flags().framework_metrics {
        let micrometer = ctx.versions().micrometer.clone();
        ctx.ensure_dependency("implementation", &format!("io.micrometer:micrometer-core:{micrometer}"))?;
        ctx.ensure_dependency(
            "implementation",
            &format!("io.micrometer:micrometer-registry-prometheus:{micrometer}"),
        )?;

        if ctx.has_dependency(&["implementation"], WEB_STARTER) {
            ctx.ensure_dependency("implementation", &format!("{ACTUATOR_STARTER}:{boot}"))?;
        }
    }

    if ctx.project().flags().native {
        configure_native(ctx)?;
    }

    Ok(())
}

fn configure_native(ctx: &mut ModuleContext<'_>) -> Result<()> {
    ctx.ensure_plugin_applied("org.springframework.experimental.aot")?;
    ctx.add_repository(NATIVE_REPOSITORY)?;

    let native = ctx.versions().spring_native.clone();
    ctx.ensure_dependency(
        "implementation",
        &format!("org.springframework.experimental:spring-native:{native}"),
    )?;

    ctx.ensure_task(TaskSpec::new("bootBuildImage", "BootBuildImage"))?;
    ctx.configure_task("bootBuildImage", |image| {
        image.set("builder", "paketobuildpacks/builder:tiny");
        image.set("buildpacks", "gcr.io/paketo-buildpacks/java-native-image:7.4.0");
        image.set("environment.BP_NATIVE_IMAGE", "true");
    });
    Ok(())
}

fn config_defaults(ctx: &mut ModuleContext<'_>) -> Result<()> {
    let db_migrate = ctx.project().flags().framework_db_migrate;

    let mut properties = config_logging();
    // server.* settings only mean something with an embedded web server
    let web = ctx.has_dependency(&["implementation"], WEB_STARTER);
    if web {
        properties.extend(config_web());
    }
    properties.extend(config_graceful_exit(web));

    if ctx.has_dependency(&["implementation"], ACTUATOR_STARTER) {
        properties.extend(config_actuator(db_migrate));
    }
    if db_migrate {
        properties.extend(config_db_migration());
    }

    ctx.write_managed(PROPERTIES_FILE, properties)
}

fn config_logging() -> PropertySet {
    PropertySet::new()
        .with("spring.main.banner-mode", "off")
        .with("logging.level.root", "INFO")
        .with(
            "logging.pattern.console",
            "%d{yyyy-MM-dd HH:mm:ss} %highlight(%-5level) %logger{36} : %msg%n",
        )
        .with(
            "logging.pattern.file",
            "%d{yyyy-MM-dd HH:mm:ss} %-5level %logger{36} : %msg%n",
        )
        .with("logging.charset.console", "UTF-8")
        .with("logging.charset.file", "UTF-8")
}

fn config_web() -> PropertySet {
    PropertySet::new()
        .with("server.port", "8080")
        // no default error page
        .with("server.error.whitelabel.enabled", "false")
        .with("server.http2.enabled", "true")
        .with("server.tomcat.uri-encoding", "UTF-8")
        .with("server.tomcat.relaxed-query-chars", "[,]")
        .with("server.compression.enabled", "true")
        .with(
            "server.compression.mime-types",
            "text/html,text/xml,text/plain,text/css,text/javascript,application/javascript,application/json",
        )
        .with("server.compression.min-response-size", "1024")
        .with("spring.web.resources.cache.cachecontrol.max-age", "120")
        .with("spring.web.resources.cache.cachecontrol.must-revalidate", "true")
        .with("spring.main.allow-bean-definition-overriding", "true")
}

fn config_graceful_exit(web: bool) -> PropertySet {
    let mut properties = PropertySet::new();
    if web {
        properties.insert("server.shutdown", "graceful");
    }
    properties.with("spring.lifecycle.timeout-per-shutdown-phase", "1m")
}

fn config_actuator(db_migrate: bool) -> PropertySet {
    let mut endpoints = vec!["health", "heapdump", "prometheus"];
    if db_migrate {
        endpoints.push("flyway");
    }

    PropertySet::new()
        .with("management.endpoints.web.discovery.enabled", "false")
        // management endpoints on their own port
        .with("management.server.port", "8081")
        .with("management.endpoints.web.exposure.include", endpoints.join(","))
        // expose /livez and /readyz
        .with("management.endpoint.health.probes.add-additional-paths", "true")
        .with("management.endpoint.health.show-details", "always")
}

fn config_db_migration() -> PropertySet {
    PropertySet::new()
        .with("spring.flyway.baselineOnMigrate", "true")
        .with("spring.flyway.baselineVersion", "0")
        .with("spring.flyway.locations", "classpath:db/migration")
}
