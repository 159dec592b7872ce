// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use cloud_config_cli::{inspect, Cli, Commands, Parser};
use cloud_config_core::InputFormat;
use cloud_config_logging::{CliLogLevel, LogFormat};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

fn render_args(args: &[&str]) -> cloud_config_cli::render::RenderArgs {
    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Commands::Render(args) => args,
        _ => panic!("expected the render command"),
    }
}

#[test]
fn test_global_logging_flags() {
    let cli = Cli::try_parse_from([
        "cloud-config",
        "render",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .unwrap();
    assert_eq!(cli.logging.log_level, Some(CliLogLevel::Debug));
    assert_eq!(cli.logging.log_format, Some(LogFormat::Json));
}

#[test]
fn test_render_flags() {
    let args = render_args(&[
        "cloud-config",
        "render",
        "base.yaml",
        "extra.toml",
        "--format",
        "toml",
        "--set",
        "hostname=two",
        "--set",
        "apt_pipelining.depth=14",
        "-o",
        "user-data",
    ]);
    assert_eq!(args.inputs.len(), 2);
    assert_eq!(args.format, Some(InputFormat::Toml));
    assert_eq!(args.overrides.len(), 2);
    assert_eq!(args.output.as_deref(), Some(std::path::Path::new("user-data")));
}

#[test]
fn test_malformed_override_is_a_usage_error() {
    assert!(Cli::try_parse_from(["cloud-config", "render", "--set", "hostname"]).is_err());
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["cloud-config", "deploy"]).is_err());
}

#[test]
fn test_render_merges_files_and_overrides() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base.yaml");
    let extra = dir.path().join("extra.json");
    fs::write(&base, "hostname: one\ntimezone: UTC\nruncmd:\n  - ls\n").unwrap();
    fs::write(&extra, r#"{"runcmd": ["echo '11'"]}"#).unwrap();

    let args = render_args(&[
        "cloud-config",
        "render",
        base.to_str().unwrap(),
        extra.to_str().unwrap(),
        "--set",
        "hostname=two",
        "--set",
        "apt_pipelining.depth=14",
    ]);

    let document = args.document(Cursor::new("")).unwrap();
    assert_eq!(
        document,
        "#cloud-config\nhostname: two\ntimezone: UTC\nruncmd:\n    - echo '11'\napt_pipelining: 14"
    );
}

#[test]
fn test_render_reads_stdin_without_inputs() {
    let args = render_args(&["cloud-config", "render"]);
    let document = args.document(Cursor::new("chpasswd:\n  expire: false\n")).unwrap();
    assert_eq!(document, "#cloud-config\nchpasswd:\n    expire: false");
}

#[test]
fn test_render_stdin_format_flag() {
    let args = render_args(&["cloud-config", "render", "-", "--format", "toml"]);
    let document = args.document(Cursor::new("[apt_pipelining]\nos = true\n")).unwrap();
    assert_eq!(document, "#cloud-config\napt_pipelining: os");
}

#[test]
fn test_render_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.yaml");
    let output = dir.path().join("user-data");
    fs::write(&input, "hostname: one\n").unwrap();

    let args = render_args(&[
        "cloud-config",
        "render",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);
    args.run().unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "#cloud-config\nhostname: one\n"
    );
}

#[test]
fn test_render_failure_reports_conflict() {
    let args = render_args(&[
        "cloud-config",
        "render",
        "--set",
        "manage_etc_hosts=true",
        "--set",
        "manage_etc_hosts_localhost=true",
    ]);

    let err = args.document(Cursor::new("")).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("manage_etc_hosts, manage_etc_hosts_localhost"), "{message}");
}

#[test]
fn test_missing_input_file() {
    let args = render_args(&["cloud-config", "render", "/nonexistent/input.yaml"]);
    let err = args.document(Cursor::new("")).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/input.yaml"));
}

#[test]
fn test_schema_output_is_json() {
    let mut out = Vec::new();
    inspect::print_schema(&mut out).unwrap();

    let schema: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert!(schema["properties"]["hostname"].is_object());
    assert!(schema["properties"]["power_state"].is_object());
}

#[test]
fn test_modules_listing_follows_registry() {
    let mut out = Vec::new();
    inspect::print_modules(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(lines.len(), 35);
    assert_eq!(lines[0], " 1  set_hostname");
    assert_eq!(lines[34], "35  spacewalk");
}
