//! Interface Generator CLI
//!
//! Generates the C interface definitions from a directory of `.json` interface
//! files, or checks that previously generated ones are up to date.

use std::path::PathBuf;

use astarte_interface_codegen::{emit, Error, GenerateOptions, GeneratorConfig, Mode};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "generate-interfaces")]
#[command(about = "Generates C interfaces definitions from .json definitions")]
#[command(version)]
struct Cli {
    /// Directory containing the interfaces .json file(s)
    json_dir: PathBuf,

    /// Prefix to add to all generated sources
    #[arg(short = 'p', long, alias = "output_prefix")]
    output_prefix: Option<String>,

    /// Directory where the generated sources will be stored (default: JSON_DIR)
    #[arg(short = 'd', long, alias = "output_dir")]
    output_dir: Option<PathBuf>,

    /// Check if previously generated interfaces are up to date
    #[arg(short, long)]
    check: bool,

    /// Additional configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this file and exit
    #[arg(long, value_name = "FILE")]
    save_config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ {}", e);
        if let Some(diff) = e.downcast_ref::<Error>().and_then(Error::diff) {
            eprintln!("{}", diff);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GeneratorConfig::load_from(cli.config.as_deref())?;
    if let Some(prefix) = cli.output_prefix {
        config.output.prefix = prefix;
    }
    if let Some(dir) = cli.output_dir {
        config.output.dir = Some(dir);
    }

    if let Some(path) = cli.save_config {
        config.save(&path)?;
        println!("✅ Configuration written to {}", path.display());
        return Ok(());
    }

    let mode = if cli.check { Mode::Check } else { Mode::Write };
    let options = GenerateOptions::from_config(&cli.json_dir, &config).mode(mode);
    let report = emit::run(&options)?;

    match report.mode {
        Mode::Write => {
            println!("✅ Generated {} interface(s)", report.interface_count);
            for artifact in &report.artifacts {
                println!("   {} ({})", artifact.path.display(), artifact.checksum.short());
            }
        }
        Mode::Check => {
            println!(
                "✅ Generated interfaces are up to date ({} interface(s))",
                report.interface_count
            );
        }
    }

    Ok(())
}
