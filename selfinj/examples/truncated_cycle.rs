//! Nakayama permutation of an oriented cycle truncated at a given length.
//!
//! ```text
//! cargo run --example truncated_cycle -- --vertices 5 --truncation 3 --parallelism threads
//! ```
use clap::Parser;
use selfinj::{
    quiver::{Path, Quiver},
    rules::SemimonomialIdeal,
    search::options::{Parallelism, SearchOptions},
    selfinjectivity::{AnalysisOptions, SelfInjectivityAnalysis, Verdict},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of vertices of the oriented cycle.
    #[arg(short, long, default_value_t = 5)]
    vertices: u32,

    /// Length of the paths generating the ideal.
    #[arg(short, long, default_value_t = 3)]
    truncation: u32,

    /// Abort the search from a vertex after meeting a longer path.
    #[arg(short, long)]
    max_path_length: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = Parallelism::Sequential)]
    parallelism: Parallelism,

    /// Print debug logs of the searches.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }
    anyhow::ensure!(args.vertices > 0, "the cycle needs at least one vertex");

    let mut quiver = Quiver::with_vertices(0..args.vertices);
    for vertex in 0..args.vertices {
        quiver.add_arrow(vertex, (vertex + 1) % args.vertices)?;
    }

    let mut ideal = SemimonomialIdeal::default();
    for start in 0..args.vertices {
        let vertices = (0..=args.truncation)
            .map(|step| (start + step) % args.vertices)
            .collect();
        ideal.add_monomial(Path::new(vertices)?);
    }
    let rules = ideal.compile_for(&quiver)?;

    let options = AnalysisOptions::builder()
        .search(
            SearchOptions::builder()
                .maybe_max_path_length(args.max_path_length)
                .detect_cancellativity_failure(true)
                .detect_weak_cancellativity_failure(true)
                .build(),
        )
        .parallelism(args.parallelism)
        .build();
    let analysis = SelfInjectivityAnalysis::run(&quiver, &rules, &options)?;

    for (vertex, result) in &analysis.results {
        for representative in &result.representatives {
            println!("{vertex}: {representative}");
        }
    }

    match analysis.verdict {
        Verdict::SelfInjective(permutation) => {
            println!("self-injective, Nakayama permutation:");
            for (vertex, image) in permutation.iter() {
                println!("  {vertex} -> {image}");
            }
        }
        Verdict::NotSelfInjective(reason) => println!("not self-injective: {reason:?}"),
    }

    Ok(())
}
