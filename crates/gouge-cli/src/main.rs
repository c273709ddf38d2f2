//! gouge CLI - grinding solver for bowl-gouge sharpening jigs
//!
//! Reads a JSON design file and computes the jig rotation and ground
//! surface for every point along the cutting edge.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

mod design;

use design::Design;

#[derive(Parser)]
#[command(name = "gouge")]
#[command(about = "Grinding solver for bowl-gouge sharpening jigs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a design and write the grind profile as JSON
    Solve {
        /// Input design file (JSON)
        design: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of edge sample points
        #[arg(short, long, default_value_t = 21)]
        samples: usize,
        /// Bracket edge-point rotations on all cores
        #[arg(long)]
        parallel: bool,
    },
    /// Display information about a design file
    Info {
        /// Input design file (JSON)
        design: PathBuf,
    },
    /// Print the sampled cutting-edge curve as JSON
    Edge {
        /// Input design file (JSON)
        design: PathBuf,
        /// Number of edge sample points
        #[arg(short, long, default_value_t = 21)]
        samples: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            design,
            output,
            samples,
            parallel,
        } => solve(&design, output.as_deref(), samples, parallel),
        Commands::Info { design } => show_info(&design),
        Commands::Edge { design, samples } => show_edge(&design, samples),
    }
}

fn load_design(path: &std::path::Path) -> Result<Design> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    Design::from_json(&json)
}

fn solve(
    path: &std::path::Path,
    output: Option<&std::path::Path>,
    samples: usize,
    parallel: bool,
) -> Result<()> {
    let design = load_design(path)?;
    let (flute, edge, jig, wheel) = design.resolve()?;
    let profile = if parallel {
        gouge_solver::compute_model_parallel(&flute, &edge, &jig, &wheel, samples)?
    } else {
        gouge_solver::compute_model(&flute, &edge, &jig, &wheel, samples)?
    };

    let solved = profile.solved_count();
    let total = profile.points.len();
    if solved < total {
        eprintln!(
            "warning: {} of {} edge points unsolvable (indices {:?})",
            total - solved,
            total,
            profile.failed()
        );
    }

    let json = profile.to_json()?;
    match output {
        Some(out) => {
            fs::write(out, json)
                .with_context(|| format!("cannot write {}", out.display()))?;
            println!("Solved {}/{} edge points -> {}", solved, total, out.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn show_info(path: &std::path::Path) -> Result<()> {
    let design = load_design(path)?;
    let (flute, _edge, jig, wheel) = design.resolve()?;

    println!("Design: {}", path.display());
    println!("  Bar diameter:  {:.3}\"", design.bar_diameter);
    println!(
        "  Flute depth:   {:.3}\" (rim height {:.3}\")",
        flute.top_height() - flute.bottom_height(),
        flute.top_height()
    );
    println!(
        "  Flute rim:     {:.1} deg from vertical",
        flute.top_angle().to_degrees()
    );
    println!("  Jig:           {:.2}\" arm at {:.1} deg", jig.length(), jig.angle().to_degrees());
    println!("  Nose bevel:    {:.1} deg", jig.nose_angle().to_degrees());
    println!("  Wheel:         {:.1}\" diameter", wheel.diameter());
    Ok(())
}

fn show_edge(path: &std::path::Path, samples: usize) -> Result<()> {
    let design = load_design(path)?;
    let (flute, edge, _jig, _wheel) = design.resolve()?;
    let curve = gouge_edge::CuttingEdgeCurve::build(&flute, &edge)?;
    let points: Vec<[f64; 3]> = curve
        .sample(samples)
        .iter()
        .map(|p| [p.x, p.y, p.z])
        .collect();
    println!("{}", serde_json::to_string_pretty(&points)?);
    Ok(())
}
