use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use flowsynth::config::GeneratorConfig;
use flowsynth::config_loader::{self, CliOverrides};
use flowsynth::orchestrator;

/// Synthesize cluster flow records with volumetric attack episodes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional YAML configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the records-*.csv artifact is created in
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Number of pods in the cluster [default: 20]
    #[arg(long)]
    number_of_pods: Option<usize>,

    /// Number of normal flows [default: 100]
    #[arg(long)]
    num_normal_flow: Option<usize>,

    /// Number of DDoS flows in each attack [default: 0]
    #[arg(long)]
    num_ddos_flow: Option<usize>,

    /// Time range for flow start times, in minutes [default: 10]
    #[arg(long)]
    time_range: Option<u64>,

    /// Maximum DDoS flow duration, in milliseconds [default: 50]
    #[arg(long)]
    ddos_time_duration: Option<u64>,

    /// Number of candidate attacker pods near a victim [default: 5]
    #[arg(long)]
    num_attack_pods: Option<usize>,

    /// Number of attack episodes [default: 1]
    #[arg(long)]
    num_attack: Option<usize>,

    /// TCP state written on attack flows [default: empty]
    #[arg(long)]
    tcp_state: Option<String>,

    /// Subnet pod addresses are allocated from [default: 10.0.0.0/16]
    #[arg(long)]
    subnet: Option<String>,

    /// Number of nodes pods are placed on [default: 10]
    #[arg(long)]
    num_nodes: Option<usize>,

    /// Seed for reproducible output [default: random, logged]
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            number_of_pods: self.number_of_pods,
            num_normal_flow: self.num_normal_flow,
            num_ddos_flow: self.num_ddos_flow,
            time_range: self.time_range,
            ddos_time_duration: self.ddos_time_duration,
            num_attack_pods: self.num_attack_pods,
            num_attack: self.num_attack,
            tcp_state: self.tcp_state.clone(),
            subnet: self.subnet.clone(),
            num_nodes: self.num_nodes,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // Logs go to stderr; stdout carries only the artifact path
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    info!("Starting flowsynth");

    let mut config = match &args.config {
        Some(path) => config_loader::load_config(path)?,
        None => GeneratorConfig::default(),
    };
    config_loader::apply_cli_overrides(&mut config, &args.overrides())?;

    info!(
        "Generating {} normal flows and {} attack(s) of {} flows over {} pods",
        config.num_normal_flow, config.num_attack, config.num_ddos_flow, config.number_of_pods
    );

    let output = orchestrator::run(&config, &args.output_dir, chrono::Utc::now())?;

    println!("{}", output.path.display());
    Ok(())
}
