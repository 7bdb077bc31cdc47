pub mod project;

pub use project::{configured_log_level, load_project, project_root, LoadedProject};
