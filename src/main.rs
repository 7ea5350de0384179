//! Coverset CLI
//!
//! Loads an event catalog fixture, selects items and bundles, and prints the
//! cheapest way to buy every selected item.
//!
//! Use `-f` to load a catalog fixture by name
//! Use `--item` / `--bundle` to pick what to buy, or `-n` for the first `n` items

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::info;

use coverset::{
    cli::CoverArgs,
    fixtures::Fixture,
    logging::init_subscriber,
    receipt::Receipt,
    solvers::{CheapestCoverSolver, ExactTrace, Solver},
};

/// Coverset CLI
#[expect(clippy::print_stdout, reason = "CLI output")]
pub fn main() -> Result<()> {
    let args = CoverArgs::parse();

    init_subscriber(&args.logging)?;

    let catalog = Fixture::with_base_path(&args.fixtures_dir).load_catalog(&args.fixture)?;
    let selection = args.selection(&catalog)?;
    let request = catalog.request(&selection)?;
    let solver = CheapestCoverSolver::new(args.solver_config()?);

    info!(
        catalog = catalog.name(),
        items = request.len(),
        bundles = request.bundles().len(),
        "solving selection"
    );

    let start = Instant::now();
    let solution = solver.solve(&request)?;
    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    println!("{}", catalog.name());

    Receipt::from_solution(&request, &solution)?.write_to(&mut handle)?;

    if let Some(trace) = solution.trace() {
        print_trace(trace);
    }

    println!(
        "Solution ({} path): {}",
        solution.path(),
        elapsed.human(Truncate::Nano)
    );

    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output")]
fn print_trace(trace: &ExactTrace) {
    let reachable = (0..trace.len())
        .filter(|mask| trace.cost(*mask).is_some())
        .count();

    println!("Exact table: {reachable} of {} states reachable", trace.len());

    // Only small tables are worth printing row by row.
    if trace.len() > 64 {
        return;
    }

    for mask in 0..trace.len() {
        if let Some(cost) = trace.cost(mask) {
            let choice = trace
                .choice(mask)
                .map_or_else(|| "-".to_string(), |origin| format!("{origin:?}"));

            println!("  {mask:#b}: {cost} via {choice}");
        }
    }
}
