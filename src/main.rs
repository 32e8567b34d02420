mod options;

use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use options::SsspCli;
use sssp_sim::engine::{self, EngineConfig};
use sssp_sim::error::SimError;
use sssp_sim::graph::Graph;
use sssp_sim::printer;
use sssp_sim::worklist::build_worklist;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = SsspCli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &SsspCli) -> Result<(), SimError> {
    cli.describe();

    let start = Instant::now();
    let graph = Graph::load_edgelist_file(&cli.graph_file)?;
    println!("Done loading");

    let worklist = build_worklist(cli.policy, cli.delta, cli.local_queues, cli.sync_every);
    let cfg = EngineConfig {
        max_slots: cli.max_cores,
        launch_threads: cli.launch_threads,
        log_every: cli.log_every,
    };
    let setup = start.elapsed();

    let start = Instant::now();
    let summary = engine::run(&graph, worklist.as_ref(), cli.source, &cfg)?;
    let sssp = start.elapsed();

    printer::print_summary(&summary, setup, sssp);

    if let Some(out) = &cli.out {
        printer::write_results(&graph, out)?;
    }
    printer::write_stats(&summary.per_round, &cli.stats)?;
    Ok(())
}
