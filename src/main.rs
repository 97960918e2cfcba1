// Ride Operation Manager - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/ride-operation-manager --visitors roster.csv --cycles 3
// ```
//
// Or with a configuration file and an export:
//
// ```console
// $ ./target/release/ride-operation-manager --config ride.json --export history.csv --verbose
// ```

use anyhow::Context;
use clap::Parser;
use ride_operation_manager::codec::{decode_line, ImportReport};
use ride_operation_manager::logging::LoggingConfig;
use ride_operation_manager::ride::{Ride, RideError, RideStatistics};
use ride_operation_manager::types::config::CliArgs;
use ride_operation_manager::types::ManagerConfig;
use std::process;
use tracing::{error, info, warn};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match ManagerConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let mut logging = LoggingConfig::from_flags(args.verbose, args.debug);
    if let Some(dir) = &args.log_dir {
        logging = logging.with_file_logging(dir.clone());
    }
    // Dropping the guard flushes the log file, so it must be dropped before exiting
    let log_guard = match logging.init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Ride Operation Manager");

    // Load configuration from CLI arguments and optional config file
    let dry_run = args.dry_run;
    let config = match ManagerConfig::from_cli_args(args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {}", e);
            drop(log_guard);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        drop(log_guard);
        process::exit(1);
    }

    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - the ride will not be operated.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    if let Err(e) = run(&config) {
        error!("Ride operation failed: {:#}", e);
        eprintln!("Ride operation failed: {:#}", e);
        drop(log_guard);
        process::exit(1);
    }

    info!("Ride Operation Manager completed successfully");
    drop(log_guard);
}

/// Operate the ride described by `config`
fn run(config: &ManagerConfig) -> anyhow::Result<()> {
    let options = config.codec_options()?;
    let policy = config.get_sort_policy()?;
    let mut ride = Ride::new(config.ride_config()?);

    if let Some(path) = &config.visitors_file {
        let report = ride
            .load_visitor_roster(path, &options)
            .with_context(|| format!("Failed to load visitor roster '{}'", path))?;
        eprintln!("Queued {} visitor(s) from {}", report.imported, path);
        print_line_issues(&report);
    }

    for record in &config.visitors {
        let visitor = decode_line(record, &options)
            .with_context(|| format!("Invalid visitor '{}'", record))?;
        ride.add_visitor_to_queue(visitor)
            .with_context(|| format!("Failed to queue visitor '{}'", record))?;
    }
    if !config.visitors.is_empty() {
        eprintln!("Queued {} visitor(s) from the command line", config.visitors.len());
    }

    if let Some(path) = &config.import_file {
        let report = ride
            .import_ride_history(path, &options)
            .with_context(|| format!("Failed to import ride history '{}'", path))?;
        eprintln!("{} from {}", report, path);
        print_line_issues(&report);
    }

    run_cycles(&mut ride, config.cycles);

    if ride.history().is_empty() {
        info!("History is empty, nothing to sort");
    } else {
        ride.sort_ride_history(policy)?;
        info!(policy = %policy, "Ride history sorted");
    }

    if let Some(path) = &config.export_file {
        let report = ride
            .export_ride_history(path, &options)
            .with_context(|| format!("Failed to export ride history '{}'", path))?;
        eprintln!("Exported {} record(s) to {}", report.records_written, report.path.display());
    }

    print_listings(&ride);
    print_final_statistics(ride.statistics());
    Ok(())
}

/// Run up to `cycles` cycles, stopping at the first refusal
fn run_cycles(ride: &mut Ride, cycles: usize) {
    for _ in 0..cycles {
        match ride.run_one_cycle() {
            Ok(report) => {
                eprintln!(
                    "Cycle {}: {} rider(s) admitted, {} still waiting",
                    report.cycle_number,
                    report.admitted_count(),
                    report.remaining_in_queue
                );
            }
            Err(RideError::EmptyQueue) => {
                eprintln!("Queue is empty, no more cycles to run");
                break;
            }
            Err(e) => {
                warn!("Cycle refused: {}", e);
                eprintln!("Cycle refused: {}", e);
                break;
            }
        }
    }
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &ManagerConfig) {
    eprintln!("Ride Operation Manager");
    eprintln!("======================");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &ManagerConfig) {
    eprintln!("Configuration:");
    eprintln!("  Ride: {} ({})", config.ride_name, config.ride_type);
    eprintln!("  Capacity: {}", config.capacity);
    eprintln!("  Operational: {}", if config.operational { "Yes" } else { "No" });
    match &config.operator {
        Some(operator) => eprintln!("  Operator: {}", operator),
        None => eprintln!("  Operator: none"),
    }
    eprintln!("  Max Riders per Cycle: {}", config.max_riders_per_cycle);
    eprintln!("  Cycles: {}", config.cycles);
    eprintln!("  Sort Policy: {}", config.sort_policy);
    eprintln!("  Delimiter: {:?}", config.delimiter);
    if let Some(path) = &config.visitors_file {
        eprintln!("  Visitor Roster: {}", path);
    }
    if !config.visitors.is_empty() {
        eprintln!("  Inline Visitors: {}", config.visitors.len());
    }
    if let Some(path) = &config.import_file {
        eprintln!("  Import From: {}", path);
    }
    if let Some(path) = &config.export_file {
        eprintln!("  Export To: {}", path);
    }
    eprintln!();
}

fn print_line_issues(report: &ImportReport) {
    for issue in &report.issues {
        eprintln!("  {}", issue);
    }
}

/// Print the waiting line and the history on stdout
fn print_listings(ride: &Ride) {
    println!("{}", ride);

    println!("Visitors in queue ({}):", ride.queue().size());
    if ride.queue().is_empty() {
        println!("  (none)");
    }
    for visitor in ride.queue_listing() {
        println!("  {}", visitor);
    }

    println!("Ride history ({}):", ride.number_of_visitors());
    if ride.history().is_empty() {
        println!("  (none)");
    }
    for visitor in ride.history().iter() {
        println!("  {}", visitor);
    }
}

fn print_final_statistics(statistics: &RideStatistics) {
    eprintln!();
    eprintln!("{}", statistics);
}
