use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use astarte_interface_codegen::{emit, loader, GenerateOptions, GeneratorConfig, LoadConfig, Mode};
use clap::{Parser, Subcommand};
use walkdir::WalkDir;

/// Name of the directories holding interface definitions
const INTERFACES_DIR: &str = "interfaces";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Regenerates or checks every interfaces directory of a source tree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the interface tables of every `interfaces` directory
    Generate {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Fail if any `interfaces` directory holds out of date tables
    Check {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (root, mode) = match cli.command {
        Commands::Generate { root } => (root, Mode::Write),
        Commands::Check { root } => (root, Mode::Check),
    };

    let config = GeneratorConfig::load().context("loading interfaces configuration")?;
    let dirs = interface_dirs(&root, &config.load_config())?;
    if dirs.is_empty() {
        println!("💡 No `{}` directories under {}", INTERFACES_DIR, root.display());
        return Ok(());
    }

    let mut failures = 0;
    for dir in &dirs {
        // Artifacts stay next to their interfaces whatever `output.dir` says
        let options = GenerateOptions::from_config(dir, &config).output_dir(dir).mode(mode);
        match emit::run(&options) {
            Ok(report) => {
                println!("✅ {} ({} interface(s))", dir.display(), report.interface_count)
            }
            Err(e) => {
                failures += 1;
                eprintln!("❌ {}: {}", dir.display(), e);
                if let Some(diff) = e.diff() {
                    eprintln!("{}", diff);
                }
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} interfaces directories failed", failures, dirs.len());
    }
    Ok(())
}

/// Every directory named `interfaces` holding interface files below `root`,
/// skipping build output
fn interface_dirs(root: &Path, load: &LoadConfig) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !matches!(e.file_name().to_str(), Some("target" | ".git" | "build"))
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_dir() || entry.file_name() != INTERFACES_DIR {
            continue;
        }
        if loader::discover(entry.path(), load)?.is_empty() {
            continue;
        }
        dirs.push(entry.into_path());
    }
    Ok(dirs)
}
