use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::commands::{apply_command, init_command, modules_command, plan_command};

#[derive(Parser, Debug)]
#[command(name = "projectcfg")]
#[command(version, about = "Apply build conventions to JVM projects", long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
#[command(subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply every convention module to the root project and its subprojects
    #[command(visible_alias = "a")]
    Apply {
        /// Specify the current working directory
        #[arg(short, long)]
        cwd: Option<String>,

        /// Report drift without writing; exits with status 1 when files would change
        #[arg(long)]
        check: bool,
    },
    /// List convention modules and where they apply
    #[command(visible_alias = "m")]
    Modules {
        /// Specify the current working directory
        #[arg(short, long)]
        cwd: Option<String>,
    },
    /// Initialize projectcfg configuration
    Init {
        /// Specify the current working directory
        #[arg(short, long)]
        cwd: Option<String>,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Print the resulting build plan as JSON without touching any file
    Plan {
        /// Specify the current working directory
        #[arg(short, long)]
        cwd: Option<String>,
    },
}

impl Commands {
    /// Directory the command operates from, if given
    pub fn cwd(&self) -> Option<&str> {
        match self {
            Commands::Apply { cwd, .. }
            | Commands::Modules { cwd }
            | Commands::Init { cwd, .. }
            | Commands::Plan { cwd } => cwd.as_deref(),
        }
    }

    pub fn execute(self) -> Result<ExitCode> {
        match self {
            Commands::Apply { cwd, check } => apply_command(cwd.as_deref(), check),
            Commands::Modules { cwd } => modules_command(cwd.as_deref()).map(|_| ExitCode::SUCCESS),
            Commands::Init { cwd, force } => init_command(cwd.as_deref(), force).map(|_| ExitCode::SUCCESS),
            Commands::Plan { cwd } => plan_command(cwd.as_deref()).map(|_| ExitCode::SUCCESS),
        }
    }
}
