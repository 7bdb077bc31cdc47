//! Multi-project runs driven by a configuration file

use projectcfg_core::{ModuleStatus, ProjectConfig, WriteMode, run_workspace};
use projectcfg_suite::Fixture;

const CONFIG: &str = r#"{
    "name": "shop",
    "language": "java",
    "type": "library",
    "framework": "none",
    "flags": { "checkstyle_rule_set": "google" },
    "subprojects": [
        {
            "path": "service",
            "type": "application",
            "framework": "quarkus",
            "flags": { "framework_db_migrate": true },
            "dependencies": { "implementation": ["io.quarkus:quarkus-resteasy"] }
        },
        { "path": "model" }
    ]
}"#;

fn load(fixture: &Fixture) -> ProjectConfig {
    fixture.write("projectcfg.json", CONFIG).unwrap();
    ProjectConfig::load_from_file(&fixture.path("projectcfg.json")).unwrap()
}

#[test]
fn test_workspace_run_covers_every_project() {
    let fixture = Fixture::new().unwrap();
    let config = load(&fixture);

    let run = run_workspace(&config, fixture.root(), WriteMode::Write).unwrap();

    let service = &run.subprojects[0];
    assert_eq!(service.report.status_of("quarkus"), Some(ModuleStatus::Applied));
    assert!(service.host.plugins().iter().any(|p| p == "io.quarkus"));
    let deps: Vec<String> = service.host.dependencies("implementation").iter().map(|c| c.key()).collect();
    assert!(deps.contains(&"io.quarkus:quarkus-flyway".to_string()));
    assert!(deps.contains(&"io.quarkus:quarkus-smallrye-health".to_string()));

    let properties = fixture.read("service/src/main/resources/application.properties").unwrap();
    assert!(properties.contains("quarkus.management.port=8081\n"));

    let model = &run.subprojects[1];
    assert_eq!(model.report.status_of("quarkus"), Some(ModuleStatus::Skipped));
    assert_eq!(model.report.status_of("checkstyle"), Some(ModuleStatus::Skipped));

    assert_eq!(run.root.report.status_of("checkstyle"), Some(ModuleStatus::Applied));
    let task = run.root.host.task("checkstyleAll").unwrap();
    assert!(task.sources.contains(&fixture.path("service/src/main/java")));
    assert!(task.sources.contains(&fixture.path("model/src/main/java")));
}

#[test]
fn test_check_mode_detects_drift_then_converges() {
    let fixture = Fixture::new().unwrap();
    let config = load(&fixture);

    let check = run_workspace(&config, fixture.root(), WriteMode::Check).unwrap();
    assert!(check.has_drift());
    assert!(!fixture.exists("service/src/main/resources/application.properties"));

    run_workspace(&config, fixture.root(), WriteMode::Write).unwrap();
    let again = run_workspace(&config, fixture.root(), WriteMode::Check).unwrap();
    assert!(!again.has_drift());
}
