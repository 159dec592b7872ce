// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use clap::Subcommand;
use cloud_config_logging::CliLoggingArgs;
use std::io;

pub use clap::Parser;

pub mod inspect;
pub mod render;

#[derive(clap::Parser)]
#[command(
    name = "cloud-config",
    about = "Render #cloud-config user data from typed input",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge input layers and print the rendered document
    Render(render::RenderArgs),
    /// Print the JSON Schema of the accepted input
    Schema,
    /// List the registered modules in execution order
    Modules,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Render(args) => args.run(),
            Commands::Schema => inspect::print_schema(&mut io::stdout().lock()),
            Commands::Modules => inspect::print_modules(&mut io::stdout().lock()),
        }
    }
}
