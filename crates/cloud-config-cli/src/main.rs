// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use cloud_config_cli::{Cli, Parser};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.logging.clone().init("cloud-config")?;
    cli.run()
}
