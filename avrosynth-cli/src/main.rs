//! # avrosynth CLI Entry Point

use avrosynth_cli::{Cli, Command, commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Generate(args) => {
            let (report, written) = commands::generate(&args)?;
            for path in &written {
                println!("{}", path.display());
            }
            for (fullname, error) in report.failures() {
                eprintln!("failed: {fullname}: {error}");
            }
        }
        Command::Check(args) => {
            let encoded_len = commands::check(&args)?;
            println!("valid ({encoded_len} bytes encoded)");
        }
    }

    Ok(())
}
