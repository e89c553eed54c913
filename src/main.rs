//! Command line front end for the delivery routing demo.

use clap::{Args, Parser, Subcommand};
use log::info;
use route_demo::config::Config;
use route_demo::error::Result;
use route_demo::geo::City;
use route_demo::plan::Algorithm;
use route_demo::report::algorithm_catalogue;
use route_demo::simulation::{Player, SystemClock};
use route_demo::utils::{format_duration, write_json, write_json_file};
use route_demo::RouteDemo;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "route-demo", version, about = "Multi-agent delivery routing demo")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Settings {
    /// JSON configuration file; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    city: Option<City>,

    /// Number of delivery locations
    #[arg(long, global = true)]
    locations: Option<usize>,

    /// Number of delivery agents
    #[arg(long, global = true)]
    agents: Option<usize>,

    #[arg(long, global = true)]
    algorithm: Option<Algorithm>,

    /// Seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Simulation speed multiplier (0.1 to 10)
    #[arg(long, global = true)]
    speed: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate delivery locations and print them as JSON
    Generate,
    /// Plan routes and print the statistics and route summary
    Solve,
    /// Play the delivery simulation in real time
    Simulate {
        /// Number of timer ticks to play
        #[arg(long, default_value_t = 10)]
        ticks: u64,
        /// Start from this timeline position (0-100)
        #[arg(long)]
        seek: Option<f64>,
        /// Agent (1-based) whose details are printed after every tick
        #[arg(long, default_value_t = 1)]
        follow: usize,
    },
    /// Write the map layers as GeoJSON
    Geojson {
        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only place the locations, without routes
        #[arg(long)]
        unsolved: bool,
    },
    /// Print the solution report as JSON
    Report,
    /// Print the operational profile of one agent
    Agent {
        /// 1-based agent id
        id: usize,
    },
    /// Print the available algorithms
    Info,
    /// Draw the map in the terminal
    Map,
}

impl Settings {
    fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::new(),
        };
        if let Some(city) = self.city {
            config = config.with_city(city);
        }
        if let Some(n) = self.locations {
            config = config.with_num_locations(n);
        }
        if let Some(n) = self.agents {
            config = config.with_num_agents(n);
        }
        if let Some(algorithm) = self.algorithm {
            config = config.with_algorithm(algorithm);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(speed) = self.speed {
            config = config.with_speed(speed);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.settings.to_config()?;
    let mut demo = RouteDemo::new(config)?;
    info!("{}", demo.title());

    match cli.command {
        Command::Generate => {
            let scenario = demo.generate();
            write_json(io::stdout().lock(), scenario)?;
        }
        Command::Solve => {
            demo.generate();
            let plan = demo.solve()?;
            for route in &plan.routes {
                println!("{}", route);
            }
            write_json(io::stdout().lock(), &demo.statistics())?;
            if let Some(summary) = demo.route_summary() {
                println!("{}", summary);
            }
        }
        Command::Simulate {
            ticks,
            seek,
            follow,
        } => {
            demo.generate();
            demo.solve()?;
            if let Some(value) = seek {
                demo.seek(value);
            }
            demo.toggle()?;

            let index = follow.saturating_sub(1);
            demo.select_agent(index)?;

            let start = Instant::now();
            let mut player = Player::new(SystemClock);
            let played = player.play(
                demo.simulation_mut(),
                ticks,
                |_| {},
                |simulation, outcome| {
                    println!(
                        "tick {:>3}  timeline {:>5.1}%  moved {}  delivered {}{}",
                        simulation.step(),
                        outcome.timeline,
                        outcome.moved.len(),
                        outcome.deliveries.len(),
                        if outcome.looped { "  (loop)" } else { "" }
                    );
                },
            )?;

            if let Some(details) = demo.selected_agent_details() {
                println!("{}", details);
            }
            println!(
                "Played {} ticks in {}",
                played,
                format_duration(start.elapsed())
            );
        }
        Command::Geojson { output, unsolved } => {
            demo.generate();
            if !unsolved {
                demo.solve()?;
            }
            let layers = demo.map_layers()?;
            match output {
                Some(path) => {
                    write_json_file(&path, &layers)?;
                    info!("Map layers written to {}", path.display());
                }
                None => write_json(io::stdout().lock(), &layers)?,
            }
        }
        Command::Report => {
            demo.generate();
            demo.solve()?;
            write_json(io::stdout().lock(), &demo.report()?)?;
        }
        Command::Agent { id } => {
            demo.generate();
            demo.solve()?;
            write_json(io::stdout().lock(), &demo.agent_profile(id)?)?;
        }
        Command::Info => {
            write_json(io::stdout().lock(), &algorithm_catalogue())?;
        }
        Command::Map => {
            demo.generate();
            demo.solve()?;
            print!("{}", demo.console_map()?);
            for entry in demo.legend() {
                println!("{} {} ({})", entry.label(), entry.color, entry.icon);
            }
        }
    }

    Ok(())
}
