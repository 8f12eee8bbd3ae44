#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use survey_catalog::{Catalog, SplitName};
use tempfile::NamedTempFile;

/// The compiled-in catalog in its on-disk JSON form.
pub fn builtin_json() -> Value {
    serde_json::to_value(Catalog::builtin()).expect("built-in catalog serializes")
}

pub fn write_catalog(value: &Value) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("failed to allocate catalog file")?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.flush()?;
    Ok(file)
}

/// `survey-catalog` invocation with a clean catalog environment.
pub fn cli(args: &[&str], catalog_path: Option<&Path>) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_survey-catalog"));
    cmd.args(args).env_remove("SURVEY_CATALOG_PATH");
    if let Some(path) = catalog_path {
        cmd.env("SURVEY_CATALOG_PATH", path);
    }
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn stdout_json(output: &Output) -> Result<Value> {
    serde_json::from_slice(&output.stdout).context("stdout is not JSON")
}

pub fn split<'a>(splits: &'a survey_catalog::SplitAssignment, name: SplitName) -> Vec<&'a str> {
    splits
        .get(&name)
        .map(|ids| ids.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

