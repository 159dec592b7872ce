// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The `schema` and `modules` commands

use anyhow::Result;
use cloud_config_core::{loader, MODULES};
use std::io::Write;

pub fn print_schema(out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, loader::schema())?;
    writeln!(out)?;
    Ok(())
}

pub fn print_modules(out: &mut impl Write) -> Result<()> {
    for (position, module) in MODULES.iter().enumerate() {
        writeln!(out, "{:>2}  {}", position + 1, module.id)?;
    }
    Ok(())
}
