//! Convention modules
//!
//! Each module is one opinionated concern. [`default_modules`] returns the
//! built-in set in registration order; modules that inspect what earlier ones
//! declared must come after them.

pub mod checkstyle;
pub mod context;
pub mod java;
pub mod junit5;
pub mod kotlin;
pub mod quarkus;
pub mod spring_boot;
pub mod traits;

// Re-export main types
pub use checkstyle::CheckstyleModule;
pub use context::{ModuleContext, Phase};
pub use java::JavaModule;
pub use junit5::JUnit5Module;
pub use kotlin::KotlinModule;
pub use quarkus::QuarkusModule;
pub use spring_boot::SpringBootModule;
pub use traits::ConventionModule;

/// Built-in modules in registration order
pub fn default_modules() -> Vec<Box<dyn ConventionModule>> {
    vec![
        Box::new(JavaModule),
        Box::new(KotlinModule),
        Box::new(JUnit5Module),
        Box::new(CheckstyleModule),
        Box::new(SpringBootModule),
        Box::new(QuarkusModule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_modules_order_and_unique_names() {
        let names: Vec<_> = default_modules().iter().map(|m| m.name()).collect();
        assert_eq!(
            names,
            vec!["java", "kotlin", "junit5", "checkstyle", "spring-boot", "quarkus"]
        );
        assert_eq!(names.iter().collect::<HashSet<_>>().len(), names.len());
    }
}
