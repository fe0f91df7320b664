//! Ranks release names read from stdin.
//!
//! Each input line is `<infohash>\t<raw title>`. By default one JSON object
//! is printed per line: the ranked release, or the input with an error.
//! With `--sorted` the admitted candidates are ranked as a batch and printed
//! as one JSON array, best first.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use rtn_core::{RankOptions, RankedRelease, RankingModel, Rtn, Settings};

#[derive(Parser)]
#[command(name = "rtn-rank")]
#[command(about = "Parse, gate and rank release names against a policy")]
#[command(version)]
struct Cli {
    /// Policy settings as JSON; omitted fields use the defaults
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Ranking model weights as JSON
    #[arg(short, long)]
    ranking: Option<PathBuf>,

    /// Expected title for similarity checks
    #[arg(short, long)]
    correct_title: Option<String>,

    /// Reject mismatched titles, denied releases and low ranks
    #[arg(long)]
    remove_trash: bool,

    /// Run every fetch gate instead of stopping at the first failure
    #[arg(long)]
    exhaustive: bool,

    /// Keep at most this many releases per resolution tier (implies --sorted)
    #[arg(short, long)]
    bucket_limit: Option<usize>,

    /// Print one sorted JSON array instead of one object per line
    #[arg(long)]
    sorted: bool,

    /// Log decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    Ranked(Box<RankedRelease>),
    Failed { input: String, error: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let settings = match &cli.settings {
        Some(path) => Settings::from_json(&read(path)?)
            .with_context(|| format!("Invalid settings in {}", path.display()))?,
        None => Settings::default(),
    };
    let model = match &cli.ranking {
        Some(path) => RankingModel::from_json(&read(path)?)
            .with_context(|| format!("Invalid ranking model in {}", path.display()))?,
        None => RankingModel::default(),
    };
    let rtn = Rtn::new(settings, model).context("Failed to build the ranking engine")?;

    let mut options = RankOptions::default()
        .with_remove_trash(cli.remove_trash)
        .with_speed_mode(!cli.exhaustive);
    if let Some(title) = &cli.correct_title {
        options = options.with_correct_title(title.as_str());
    }

    let candidates = read_candidates()?;
    info!(count = candidates.len(), "read candidates");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.sorted || cli.bucket_limit.is_some() {
        let ranked = rtn.rank_many(candidates, cli.bucket_limit, &options)?;
        serde_json::to_writer_pretty(&mut out, &ranked)?;
        writeln!(out)?;
        return Ok(());
    }

    for (infohash, title) in candidates {
        let output = match rtn.rank_one(&title, &infohash, &options) {
            Ok(ranked) => Output::Ranked(Box::new(ranked)),
            Err(err) => {
                warn!(%title, error = %err, "candidate rejected");
                Output::Failed {
                    input: title,
                    error: err.to_string(),
                }
            }
        };
        serde_json::to_writer(&mut out, &output)?;
        writeln!(out)?;
    }

    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Reads `<infohash>\t<title>` lines, skipping blank ones.
fn read_candidates() -> Result<Vec<(String, String)>> {
    let mut candidates = Vec::new();
    for (index, line) in io::stdin().lock().lines().enumerate() {
        let line = line.context("Failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (hash, title) = split_line(line)
            .with_context(|| format!("Line {} is not `<infohash>\\t<title>`", index + 1))?;
        candidates.push((hash.to_string(), title.to_string()));
    }
    Ok(candidates)
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    let (hash, title) = line.split_once('\t')?;
    Some((hash.trim(), title.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "rtn-rank",
            "--remove-trash",
            "--exhaustive",
            "-b",
            "2",
            "--correct-title",
            "The Matrix",
        ]);
        assert!(cli.remove_trash);
        assert!(cli.exhaustive);
        assert_eq!(cli.bucket_limit, Some(2));
        assert_eq!(cli.correct_title.as_deref(), Some("The Matrix"));
        assert!(!cli.sorted);
    }

    #[test]
    fn splits_tab_separated_lines() {
        assert_eq!(
            split_line("abc\tThe.Matrix.1999.1080p"),
            Some(("abc", "The.Matrix.1999.1080p"))
        );
        assert_eq!(split_line("no tab here"), None);
    }

    #[test]
    fn failed_output_serializes_flat() {
        let output = Output::Failed {
            input: "x".into(),
            error: "invalid input: raw title is empty".into(),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["input"], "x");
        assert!(json["error"].as_str().unwrap().starts_with("invalid input"));
    }
}
