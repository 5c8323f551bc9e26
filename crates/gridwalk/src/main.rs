//! CLI entry point.
//!
//! Usage:
//!   gridwalk [-v...] [-q] [--json] <COMMAND> [FILE]
//!
//! Every command reads FILE (default: `input`) and prints one `label: value`
//! line per answer, or a JSON report with `--json`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use strum::VariantArray;
use tracing_subscriber::EnvFilter;

use gridwalk::calibration::{parse_equations, total_calibration};
use gridwalk::disk::checksum;
use gridwalk::ordering::parse_manual;
use gridwalk::patrol::{find_guard, loop_obstructions, run_with};
use gridwalk::region::{find_plots, total_bulk_cost, total_fence_cost};
use gridwalk::stones::{count_after, parse_stones};
use gridwalk::trail::load_height_map;
use gridwalk::{
    antenna, wordsearch, Direction, DiskMap, Grid, HeightGraph, Operator, PatrolConfig,
    PatrolState, Position,
};

#[derive(Parser)]
#[command(name = "gridwalk")]
#[command(about = "Grid traversal puzzle solvers")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print a JSON report instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Garden regions: fence cost by perimeter and by sides
    Regions {
        #[arg(value_name = "FILE", default_value = "input")]
        file: PathBuf,
    },

    /// Trailhead score and rating sums over a height map
    Trails {
        #[arg(value_name = "FILE", default_value = "input")]
        file: PathBuf,
    },

    /// Cells visited by the walker and obstacles that make it loop
    Patrol {
        #[arg(value_name = "FILE", default_value = "input")]
        file: PathBuf,

        /// Test candidate obstacles one at a time on the main thread
        #[arg(long)]
        sequential: bool,
    },

    /// Middle-page sums of ordered and repaired updates
    Ordering {
        #[arg(value_name = "FILE", default_value = "input")]
        file: PathBuf,
    },

    /// Total of the calibration equations that can be satisfied
    Calibrate {
        #[arg(value_name = "FILE", default_value = "input")]
        file: PathBuf,
    },

    /// Distinct antinode positions
    Antinodes {
        #[arg(value_name = "FILE", default_value = "input")]
        file: PathBuf,
    },

    /// Word occurrences in 8 directions and X-MAS crosses
    Wordsearch {
        #[arg(value_name = "FILE", default_value = "input")]
        file: PathBuf,

        /// Word to search for
        #[arg(long, default_value = "XMAS")]
        word: String,
    },

    /// Disk checksums after block-wise and whole-file compaction
    Disk {
        #[arg(value_name = "FILE", default_value = "input")]
        file: PathBuf,
    },

    /// Number of stones after a number of blinks
    Stones {
        #[arg(value_name = "FILE", default_value = "input")]
        file: PathBuf,

        /// Blinks to simulate
        #[arg(long, default_value_t = 25)]
        blinks: usize,
    },
}

/// Output format for a command run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    command: &'static str,
    answers: Vec<Answer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patrol: Option<PatrolDetail>,
}

/// Walker details included in the JSON output of `patrol`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PatrolDetail {
    start: Position,
    direction: Direction,
    state: PatrolState,
    ticks: usize,
    loop_obstructions: Vec<Position>,
}

#[derive(Debug, Serialize)]
struct Answer {
    label: &'static str,
    value: u64,
}

impl Report {
    fn new(command: &'static str) -> Self {
        Self {
            command,
            answers: Vec::new(),
            patrol: None,
        }
    }

    fn answer(mut self, label: &'static str, value: impl TryInto<u64>) -> Self {
        let value = value.try_into().unwrap_or(u64::MAX);
        self.answers.push(Answer { label, value });
        self
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(text.lines().map(String::from).collect())
}

fn execute(command: Commands) -> Result<Report> {
    let report = match command {
        Commands::Regions { file } => {
            let grid = Grid::load(read_lines(&file)?)?;
            grid.require_rectangular()?;
            let regions = find_plots(&grid);
            Report::new("regions")
                .answer("regions", regions.len())
                .answer("fence cost", total_fence_cost(&regions))
                .answer("bulk cost", total_bulk_cost(&regions))
        }

        Commands::Trails { file } => {
            let heights = load_height_map(read_lines(&file)?)?;
            let graph = HeightGraph::build(&heights);
            Report::new("trails")
                .answer("trailheads", graph.trailheads().count())
                .answer("score", graph.total_score())
                .answer("rating", graph.total_rating())
        }

        Commands::Patrol { file, sequential } => {
            let grid = Grid::load(read_lines(&file)?)?;
            let (start, direction) = find_guard(&grid)?;
            let config = PatrolConfig {
                parallel: !sequential,
                ..Default::default()
            };
            let outcome = run_with(&grid, start, direction, &config)?;
            let obstructions = loop_obstructions(&grid, start, direction, &config)?;
            let mut report = Report::new("patrol")
                .answer("visited", outcome.visited.len())
                .answer("loop obstructions", obstructions.len());
            report.patrol = Some(PatrolDetail {
                start,
                direction,
                state: outcome.state,
                ticks: outcome.ticks,
                loop_obstructions: obstructions,
            });
            report
        }

        Commands::Ordering { file } => {
            let manual = parse_manual(read_lines(&file)?)?;
            Report::new("ordering")
                .answer("ordered middles", manual.sum_ordered_middles())
                .answer("repaired middles", manual.sum_repaired_middles()?)
        }

        Commands::Calibrate { file } => {
            let equations = parse_equations(read_lines(&file)?)?;
            Report::new("calibrate").answer(
                "calibration",
                total_calibration(&equations, Operator::VARIANTS)?,
            )
        }

        Commands::Antinodes { file } => {
            let grid = Grid::load(read_lines(&file)?)?;
            Report::new("antinodes").answer("antinodes", antenna::antinodes(&grid)?.len())
        }

        Commands::Wordsearch { file, word } => {
            let grid = Grid::load(read_lines(&file)?)?;
            Report::new("wordsearch")
                .answer("matches", wordsearch::count_word(&grid, &word))
                .answer("crosses", wordsearch::count_crosses(&grid))
        }

        Commands::Disk { file } => {
            let disk = DiskMap::parse(read_lines(&file)?)?;
            Report::new("disk")
                .answer("block checksum", checksum(&disk.compact_blocks()))
                .answer("file checksum", checksum(&disk.compact_files()))
        }

        Commands::Stones { file, blinks } => {
            let stones = parse_stones(read_lines(&file)?)?;
            Report::new("stones").answer("stones", count_after(&stones, blinks)?)
        }
    };

    Ok(report)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(if cli.quiet { 0 } else { cli.verbose });

    let report = match execute(cli.command) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(1);
            }
        }
    } else {
        for answer in &report.answers {
            println!("{}: {}", answer.label, answer.value);
        }
    }
}
