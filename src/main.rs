use clap::Parser;
use std::process::ExitCode;

use dynamic_search::config::Config;
use dynamic_search::simulation::{Silent, Simulation};
use dynamic_search::statistics::print_comparison;
use dynamic_search::view::TerminalView;
use dynamic_search::Result;
use tracing::{error, info};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dynamic_search=info")),
        )
        .init();

    let config = Config::parse();
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<()> {
    println!("Starting grid search...");
    println!("Grid size: {}x{}", config.grid_size, config.grid_size);
    println!("Layout: {:?}", config.layout);
    println!("Start: {} | Target: {}", config.start(), config.target());
    println!("Obstacle chance: {}", config.obstacle_chance);
    if let Some(seed) = config.seed {
        println!("Seed: {} (for reproducibility)", seed);
    }
    println!();

    if config.all {
        info!("running every algorithm on one map");
        let results = Simulation::run_all_algorithms(&config)?;
        print_comparison(&results);
        return Ok(());
    }

    let mut simulation = Simulation::from_config(&config)?;
    let report = if config.no_visualization {
        simulation.run(config.algorithm, &mut Silent)
    } else {
        let mut view = TerminalView::new(simulation.start(), simulation.target(), config.speed);
        simulation.run(config.algorithm, &mut view)
    };

    println!("\n=== FINAL RESULTS ===");
    println!("{}", report);
    Ok(())
}
