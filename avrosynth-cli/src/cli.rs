//! Command-line arguments.

use anyhow::Context;
use avrosynth::prelude::{SynthConfig, UnionPolicy};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Synthesize and verify example instances for Avro schemas.
///
/// Reads a schema (.avsc), protocol (.avpr) or IDL (.avdl) document from a
/// path or URL and writes one schema and one example file per target.
#[derive(Parser, Debug)]
#[command(name = "avrosynth", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate (schema, example) pairs for every target of a document.
    Generate(GenerateArgs),
    /// Validate and encode an existing JSON instance against a schema.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Input path or http(s) URL.
    pub input: String,

    /// Output directory.
    #[arg(short, long, default_value = "out")]
    pub out: PathBuf,

    /// Program that reads IDL on stdin and prints protocol JSON.
    #[arg(long, value_name = "PROGRAM")]
    pub idl_compiler: Option<String>,

    /// Argument passed to the IDL compiler (repeatable).
    #[arg(long = "idl-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub idl_args: Vec<String>,

    /// Union branch selection: `last-non-null` or `first`.
    #[arg(long, value_name = "POLICY")]
    pub union_policy: Option<UnionPolicy>,

    /// Use explicit field defaults when they conform.
    #[arg(long)]
    pub use_defaults: bool,

    /// JSON synthesis configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl GenerateArgs {
    /// Builds the synthesis configuration: file values first, flags on top.
    ///
    /// # Errors
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn synth_config(&self) -> anyhow::Result<SynthConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                SynthConfig::from_json(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SynthConfig::default(),
        };
        if let Some(policy) = self.union_policy {
            config = config.union_policy(policy);
        }
        if self.use_defaults {
            config = config.use_field_defaults(true);
        }
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema path or http(s) URL.
    pub schema: String,

    /// JSON instance file.
    pub instance: PathBuf,
}
