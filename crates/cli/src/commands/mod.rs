pub mod apply;
pub mod init;
pub mod modules;
pub mod plan;

pub use apply::apply_command;
pub use init::init_command;
pub use modules::modules_command;
pub use plan::plan_command;
