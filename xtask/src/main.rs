use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Check formatting, run clippy, and validate bundled TOML assets
    Lint,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Lint => {
            let root = workspace_root()?;
            run_cargo(&root, &["fmt", "--all", "--check"])?;
            run_cargo(
                &root,
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            )?;
            check_assets(&root)?;
        }
    }
    Ok(())
}

fn workspace_root() -> Result<PathBuf> {
    let metadata = MetadataCommand::new()
        .no_deps()
        .exec()
        .context("failed to read cargo metadata")?;
    Ok(metadata.workspace_root.into_std_path_buf())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("nextest").arg("run");
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if release {
        cmd.arg("--release");
    }
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("cargo nextest run failed");
    }
    Ok(())
}

fn run_cargo(root: &Path, args: &[&str]) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .current_dir(root)
        .status()
        .with_context(|| format!("failed to spawn cargo {}", args.join(" ")))?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args.join(" "));
    }
    Ok(())
}

/// Every `*.toml` under a crate's `assets/` directory must parse.
fn check_assets(root: &Path) -> Result<()> {
    let crates = root.join("crates");
    for entry in WalkDir::new(&crates) {
        let entry = entry?;
        let path = entry.path();
        let in_assets = path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|name| name == "assets");
        if !in_assets || path.extension().is_none_or(|ext| ext != "toml") {
            continue;
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        data.parse::<toml::Table>()
            .with_context(|| format!("invalid TOML in {}", path.display()))?;
        println!("ok {}", path.display());
    }
    Ok(())
}
