use clap::Parser;
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use log::{error, info};
use std::env;
use std::path::Path;
use std::rc::Rc;

use uav_fleet_endurance::config::SimulationConfig;
use uav_fleet_endurance::core::fleet::Fleet;
use uav_fleet_endurance::core::placement::solver::SolverEnvironment;
use uav_fleet_endurance::error::SimulationError;
use uav_fleet_endurance::metrics::printer::{endurance_table, print_metrics};
use uav_fleet_endurance::metrics::records::write_reports;
use uav_fleet_endurance::scenario::Scenario;
use uav_fleet_endurance::sweep::{run_fleet, run_fleet_sweep};

#[derive(Parser)]
struct Args {
    #[clap(short, long)]
    config_file: std::path::PathBuf,
    #[clap(short, long)]
    scenario_file: std::path::PathBuf,
    /// Simulates a single fleet of this many template UAVs instead of the sweep.
    #[clap(long)]
    fleet_size: Option<usize>,
}

const LOG_FILE_SIZE_LIMIT: usize = 10 * 1024 * 1024;

fn init_logger(logs_filepath: Option<&str>) {
    // log level INFO by default
    let mut env_logger_builder = env_logger::builder();
    if env::var("RUST_LOG").is_err() {
        env_logger_builder.filter_level(log::LevelFilter::Info);
    }
    if let Some(path) = logs_filepath {
        let log_file = FileRotate::new(
            path,
            AppendCount::new(3),
            ContentLimit::Bytes(LOG_FILE_SIZE_LIMIT),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        env_logger_builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    env_logger_builder.init();
}

fn run(args: Args, config: SimulationConfig) -> Result<(), SimulationError> {
    info!("Path to scenario file: {:?}", args.scenario_file);
    let scenario = Rc::new(Scenario::from_json_file(&args.scenario_file)?);
    let config = Rc::new(config);

    let solver = SolverEnvironment::start();
    let results = match (args.fleet_size, config.fleet.as_ref()) {
        (Some(fleet_size), _) => {
            let fleet = Fleet::homogeneous(&config.fleet_sweep.uav_template, fleet_size);
            vec![run_fleet(config.clone(), scenario.clone(), fleet, &solver)?]
        }
        (None, Some(groups)) => {
            let fleet = Fleet::from_groups(groups);
            vec![run_fleet(config.clone(), scenario.clone(), fleet, &solver)?]
        }
        (None, None) => run_fleet_sweep(config.clone(), scenario.clone(), &solver)?,
    };
    drop(solver);

    endurance_table(&results).printstd();

    if let Some(printer_config) = config.metrics_printer.as_ref() {
        print_metrics(&results, printer_config)?;
    }
    if let Some(dir) = config.slot_records_dir.as_ref() {
        write_reports(Path::new(dir), &results, scenario.catalog.service_count())?;
        info!("Reports written to {:?}", dir);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let config = std::fs::read_to_string(&args.config_file)
        .map_err(SimulationError::from)
        .and_then(|yaml| SimulationConfig::from_yaml_str(&yaml));
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            init_logger(None);
            error!("Failed to load config {:?}: {}", args.config_file, err);
            std::process::exit(1);
        }
    };

    init_logger(config.logs_filepath.as_deref());
    info!("Path to config file: {:?}", args.config_file);

    if let Err(err) = run(args, config) {
        error!("Simulation failed: {}", err);
        std::process::exit(1);
    }
}
