use ballast_runner::config::{load_config, load_default_config};
use ballast_runner::{SimulationBootstrap, SimulationConfig};

fn print_help() {
    eprintln!(
        r#"ballast - run rebalancing agents through a simulated market day

USAGE:
    ballast [OPTIONS]

OPTIONS:
    --config <PATH>     Load agents from JSON file (default: embedded agents)
    --seed <N>          Seed for the quote feed (default: 42)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)
"#
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut sim_config = SimulationConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                match args.get(i).and_then(|s| s.parse().ok()) {
                    Some(seed) => sim_config.feed_seed = seed,
                    None => {
                        eprintln!("Error: --seed requires an integer argument");
                        std::process::exit(1);
                    }
                }
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let agents = match config_path {
        Some(path) => {
            log::info!("Loading agents from: {}", path);
            load_config(&path)?
        }
        None => load_default_config()?,
    };

    let mut simulation = SimulationBootstrap::from_file(&agents, sim_config)?.into_simulation()?;
    let results = simulation.run();

    println!("{:<12} {:>8} {:>8} {:>12} {:>14}", "agent", "orders", "fills", "shares", "surplus");
    for valuation in &results.valuations {
        let surplus = valuation
            .surplus
            .map_or_else(|| "n/a".to_string(), |s| s.round_dp(6).to_string());
        println!(
            "{:<12} {:>8} {:>8} {:>12} {:>14}",
            valuation.agent_id,
            results.orders_by_agent.get(&valuation.agent_id).copied().unwrap_or(0),
            results.fills_by_agent.get(&valuation.agent_id).copied().unwrap_or(0),
            valuation.shares,
            surplus
        );
    }

    Ok(())
}
