//! Command-line tool computing plane copper fragments from a board
//! snapshot file.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use copperfill_board::Board;
use copperfill_types::{Path, PlaneId};

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Compute PCB plane copper fragments from a board snapshot",
    long_about = "Loads a JSON board snapshot, rebuilds the copper fragments of \
                  its planes, and writes them back out as JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild plane fragments and write them to a file
    Build {
        /// Input board snapshot (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output fragments file (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Only emit the fragments of this plane id
        #[arg(short, long)]
        plane: Option<PlaneId>,
    },

    /// Print a per-plane summary of a board snapshot
    Info {
        /// Input board snapshot (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Serialize)]
struct PlaneFragments<'a> {
    id: PlaneId,
    layer: &'a str,
    net: String,
    priority: i32,
    fragments: &'a [Path],
}

#[derive(Serialize)]
struct FragmentsFile<'a> {
    planes: Vec<PlaneFragments<'a>>,
}

fn load_board(input: &PathBuf) -> Result<Board> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    Board::from_json(&content)
        .with_context(|| format!("Failed to load board from: {}", input.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            plane,
        } => {
            let mut board = load_board(&input)?;
            board.rebuild_planes();

            if let Some(id) = plane {
                if board.plane(id).is_none() {
                    bail!("no plane with id {id} in {}", input.display());
                }
            }
            let file = FragmentsFile {
                planes: board
                    .planes()
                    .iter()
                    .filter(|p| plane.map_or(true, |id| p.id == id))
                    .map(|p| PlaneFragments {
                        id: p.id,
                        layer: p.layer.as_str(),
                        net: p.net.to_string(),
                        priority: p.priority,
                        fragments: &p.fragments,
                    })
                    .collect(),
            };
            let json = serde_json::to_string_pretty(&file)?;
            fs::write(&output, json)
                .with_context(|| format!("Failed to write output file: {}", output.display()))?;

            println!(
                "Wrote fragments of {} plane(s) to {}",
                file.planes.len(),
                output.display()
            );
        }

        Commands::Info { input } => {
            let mut board = load_board(&input)?;
            board.rebuild_planes();

            println!(
                "{} polygon(s), {} device(s), {} net segment(s)",
                board.polygons().len(),
                board.devices().len(),
                board.net_segments().len()
            );
            for p in board.planes() {
                println!(
                    "plane {} layer={} net={} priority={} fragments={}",
                    p.id,
                    p.layer,
                    p.net,
                    p.priority,
                    p.fragments.len()
                );
            }
        }
    }

    Ok(())
}
