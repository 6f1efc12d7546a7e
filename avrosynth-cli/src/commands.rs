//! Subcommand implementations.

use crate::cli::{CheckArgs, GenerateArgs};
use crate::source::{CommandIdlCompiler, LocationSource};
use anyhow::{Context, bail};
use avrosynth::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Runs `generate` and writes the artifacts.
///
/// Returns the run report together with the written file paths.
///
/// # Errors
/// Returns an error if the input cannot be retrieved, compiled or parsed, or
/// if an artifact cannot be written. Failed targets are not errors.
pub fn generate(args: &GenerateArgs) -> anyhow::Result<(Report, Vec<PathBuf>)> {
    let config = args.synth_config()?;
    let report = match &args.idl_compiler {
        Some(program) => Pipeline::new(
            LocationSource,
            CommandIdlCompiler::new(program.clone(), args.idl_args.clone()),
        )
        .config(config)
        .run(&args.input),
        None => Pipeline::new(LocationSource, NoIdlCompiler)
            .config(config)
            .run(&args.input),
    }
    .with_context(|| format!("processing {}", args.input))?;

    let written = write_artifacts(&report, &args.out)?;
    Ok((report, written))
}

/// Writes `<stem>.avsc` and `<stem>.json` for every generated artifact.
///
/// # Errors
/// Returns an error if the directory or a file cannot be written.
pub fn write_artifacts(report: &Report, out: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if report.generated_count() == 0 {
        return Ok(written);
    }
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    for artifact in report.artifacts() {
        let stem = artifact.file_stem();
        for (extension, text) in [("avsc", &artifact.schema_text), ("json", &artifact.example_text)] {
            let path = out.join(format!("{stem}.{extension}"));
            fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
            tracing::debug!("Wrote {}", path.display());
            written.push(path);
        }
    }
    Ok(written)
}

/// Runs `check`: validates and encodes a JSON instance.
///
/// Returns the size of the binary encoding.
///
/// # Errors
/// Returns an error if either file cannot be read or parsed, or if the
/// instance does not conform.
pub fn check(args: &CheckArgs) -> anyhow::Result<usize> {
    let text = LocationSource.fetch(&args.schema)?;
    let schema = parse_schema(&text).with_context(|| format!("parsing {}", args.schema))?;

    let instance_text = fs::read_to_string(&args.instance)
        .with_context(|| format!("reading {}", args.instance.display()))?;
    let json: serde_json::Value = serde_json::from_str(&instance_text)
        .with_context(|| format!("parsing {}", args.instance.display()))?;
    let value = Value::from_json(&json);

    // Encode only: JSON integers are valid float values.
    let encoded = match DatumWriter::new(schema.graph(), schema.root()).encode(&value) {
        Ok(encoded) => encoded,
        Err(err) => bail!("{}: {}", args.instance.display(), err),
    };
    Ok(encoded.len())
}
