//! Checkstyle gating and ruleset resolution

use projectcfg_core::{
    Error, FeatureFlags, ModuleStatus, ProjectFramework, ProjectLanguage, ProjectType,
    modules::checkstyle::bundled_ruleset,
};
use projectcfg_suite::Fixture;

fn library_flags(rule_set: &str) -> FeatureFlags {
    FeatureFlags {
        checkstyle_rule_set: rule_set.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_checkstyle_skipped_without_config_or_rule_set() {
    let fixture = Fixture::new().unwrap();
    let context = fixture.context(
        ProjectLanguage::Java,
        ProjectType::Library,
        ProjectFramework::None,
        library_flags(""),
    );
    let mut host = fixture.host();

    let report = fixture.run(&context, &mut host).unwrap();

    assert_eq!(report.status_of("checkstyle"), Some(ModuleStatus::Skipped));
    assert!(!host.plugins().iter().any(|p| p == "checkstyle"));
    assert!(host.task("checkstyleAll").is_none());
    assert!(host.extension("checkstyle", "toolVersion").is_none());
}

#[test]
fn test_project_checkstyle_file_is_used_in_place() {
    let fixture = Fixture::new().unwrap();
    fixture.write("checkstyle.xml", "<module name=\"Checker\"/>\n").unwrap();
    let context = fixture.context(
        ProjectLanguage::Java,
        ProjectType::Library,
        ProjectFramework::None,
        library_flags(""),
    );
    let mut host = fixture.host();

    let report = fixture.run(&context, &mut host).unwrap();

    assert_eq!(report.status_of("checkstyle"), Some(ModuleStatus::Applied));
    let config_file = fixture.path("checkstyle.xml");
    assert_eq!(
        host.extension("checkstyle", "configFile"),
        Some(&*config_file.to_string_lossy())
    );
    assert_eq!(host.extension("checkstyle", "toolVersion"), Some("10.3.1"));
    assert!(!fixture.exists("build/tmp/checkstyle.xml"));

    let task = host.task("checkstyleAll").unwrap();
    assert_eq!(task.group.as_deref(), Some("verification"));
    assert_eq!(task.sources, vec![fixture.path("src/main/java")]);
    assert_eq!(task.excludes, vec!["**/generated/**", "**/internal/**"]);
    assert_eq!(task.settings.get("reports.html.required").map(String::as_str), Some("true"));
}

#[test]
fn test_bundled_rule_set_is_materialized() {
    let fixture = Fixture::new().unwrap();
    let context = fixture.context(
        ProjectLanguage::Java,
        ProjectType::Library,
        ProjectFramework::None,
        library_flags("sun"),
    );
    let mut host = fixture.host();

    let report = fixture.run(&context, &mut host).unwrap();

    assert_eq!(
        fixture.read("build/tmp/checkstyle.xml").unwrap(),
        bundled_ruleset("sun").unwrap()
    );
    let file = report
        .files
        .iter()
        .find(|f| f.path.ends_with("build/tmp/checkstyle.xml"))
        .unwrap();
    assert_eq!(file.module, "checkstyle");
}

#[test]
fn test_unknown_rule_set_fails_the_run() {
    let fixture = Fixture::new().unwrap();
    let context = fixture.context(
        ProjectLanguage::Java,
        ProjectType::Library,
        ProjectFramework::None,
        library_flags("acme"),
    );
    let mut host = fixture.host();

    let err = fixture.run(&context, &mut host).unwrap_err();

    match err.root_cause() {
        Error::Configuration { module, resource, .. } => {
            assert_eq!(module, "checkstyle");
            assert_eq!(resource, "checkstyle/acme.xml");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // earlier modules stay applied, nothing of checkstyle lands
    assert!(host.plugins().iter().any(|p| p == "java-library"));
    assert!(!host.plugins().iter().any(|p| p == "checkstyle"));
    assert!(!fixture.exists("build"));
}
