//! Command-line entry point.

pub mod replay;

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::display::{LabelState, pluralize};
use crate::domain::model::SelectionSnapshot;
use crate::infra::config::Config;

#[derive(Debug, Parser)]
#[command(author, version, about = "Count words and characters in text selections", long_about = None)]
pub struct Cli {
    /// Extra config file layered above the user config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Count words and characters in a file, or stdin when no file is given
    Count {
        file: Option<PathBuf>,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay a JSON page script and print every label change
    Replay {
        script: PathBuf,
        /// Print label changes as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    run_with(cli, &mut stdout.lock())
}

fn run_with(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Count { file, json } => {
            let config = Config::load_with(cli.config.as_deref())?;
            let text = read_input(file)?;
            count(&text, json, &config, out)
        }
        Commands::Replay { script, json } => {
            let config = Config::load_with(cli.config.as_deref())?;
            let script = replay::ReplayScript::from_file(&script)?;
            let lines = replay::replay(&script, &config)?;
            for line in lines {
                if json {
                    writeln!(out, "{}", serde_json::to_string(&line)?)?;
                } else {
                    writeln!(out, "{}: {}", line.step, describe(&line.label))?;
                }
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "wordcount", out);
            Ok(())
        }
    }
}

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn count(text: &str, json: bool, config: &Config, out: &mut impl Write) -> Result<()> {
    let snapshot = SelectionSnapshot::from_text(text);
    if json {
        writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
    } else {
        let words = snapshot.word_count();
        let characters = snapshot.character_count();
        writeln!(
            out,
            "{words} {}, {characters} {}",
            pluralize(&config.display.noun, words),
            pluralize("character", characters)
        )?;
    }
    Ok(())
}

fn describe(label: &LabelState) -> &str {
    label.message().unwrap_or("hidden")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_prints_words_and_characters() {
        let mut out = Vec::new();
        count("hello\nworld", false, &Config::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2 words, 11 characters\n");
    }

    #[test]
    fn count_uses_configured_noun() {
        let mut config = Config::default();
        config.display.noun = "token".into();
        let mut out = Vec::new();
        count("one", false, &config, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 token, 3 characters\n");
    }

    #[test]
    fn count_prints_json_snapshot() {
        let mut out = Vec::new();
        count("a b", true, &Config::default(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"text\":\"a b\",\"wordCount\":2,\"characterCount\":3}\n"
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
