pub mod report;

pub use report::{print_project_run, status_label};
