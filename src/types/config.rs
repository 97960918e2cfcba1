//! Configuration structures for the ride operation manager
//!
//! This module contains the command line arguments, the partial JSON
//! configuration file and the merged, validated configuration used by the
//! binary to set up a ride.

use crate::codec::{decode_line, CodecOptions};
use crate::ride::{RideConfig, RideResult, SortPolicy};
use crate::types::StaffRecord;
use clap::Parser;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ride-operation-manager",
    version = "0.1.0",
    about = "Ride Operation Manager - queue, run and record visitors for a single attraction",
    long_about = "Loads waiting visitors into a ride's admission queue, runs ride cycles that move them into the ride history, sorts the history and exchanges it with delimited text files.

EXAMPLES:
    # Queue visitors from a roster file and run three cycles
    ride-operation-manager --visitors roster.csv --cycles 3

    # Use a configuration file
    ride-operation-manager --config ride.json

    # Export the resulting history
    ride-operation-manager --visitors roster.csv --cycles 2 --export history.csv

    # Queue two visitors given inline and log to a file
    ride-operation-manager --visitor \"Amy,30,Female,V1,General,true\" --visitor \"Bob,12,Male,V2,Child Ticket,false\" --log-dir logs

    # Import an existing history and re-sort it with season pass holders first
    ride-operation-manager --import history.csv --sort pass-name --cycles 0

    # Generate configuration template
    ride-operation-manager --print-config > ride.json

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Name of the ride
    #[arg(long, help = "Ride name")]
    pub ride_name: Option<String>,

    /// Type of the ride
    #[arg(long, help = "Ride type, e.g. \"Roller Coaster\"")]
    pub ride_type: Option<String>,

    /// Seating capacity
    #[arg(long, help = "Seating capacity (display only, must be > 0)")]
    pub capacity: Option<u32>,

    /// Most visitors admitted per cycle
    #[arg(
        long,
        help = "Maximum riders per cycle",
        long_help = "Maximum number of visitors moved from the queue into the history by one cycle. Must be greater than 0. Default: 4"
    )]
    pub max_riders: Option<usize>,

    /// Mark the ride as closed
    #[arg(long, help = "Mark the ride as not operational")]
    pub closed: bool,

    /// Run without an operator
    #[arg(long, help = "Remove the ride operator")]
    pub no_operator: bool,

    /// Field delimiter for history files
    #[arg(
        long,
        help = "Field delimiter for history files",
        long_help = "Single character used to separate fields in history files. ';' and '#' are reserved. Default: ','"
    )]
    pub delimiter: Option<char>,

    /// Sort policy applied to the history before export
    #[arg(
        long = "sort",
        help = "History sort policy (age-name, ticket-age, pass-name)",
        long_help = "Ordering applied to the ride history after the cycles run. age-name: youngest first then name; ticket-age: ticket type then oldest first; pass-name: season pass holders first then name."
    )]
    pub sort_policy: Option<String>,

    /// Number of cycles to run
    #[arg(long, help = "Number of ride cycles to run")]
    pub cycles: Option<usize>,

    /// Roster of visitors to queue
    #[arg(long = "visitors", help = "Visitor roster file to load into the queue")]
    pub visitors_file: Option<String>,

    /// Visitors to queue, one delimited record each
    #[arg(
        long = "visitor",
        value_name = "RECORD",
        help = "Queue a visitor given as Name,Age,Gender,VisitorID,TicketType,HasSeasonPass (repeatable)",
        long_help = "Queue one visitor given in the history line format, using the configured delimiter. May be repeated; inline visitors are queued after the roster file, in the order given."
    )]
    pub visitors: Vec<String>,

    /// History file to import before running
    #[arg(long = "import", help = "History file to import before running")]
    pub import_file: Option<String>,

    /// History file to export after running
    #[arg(long = "export", help = "History file to export after running")]
    pub export_file: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Directory for JSON log files
    #[arg(long, value_name = "DIR", help = "Also write JSON logs to a daily file in DIR")]
    pub log_dir: Option<String>,

    /// Dry run mode - validate configuration without touching the ride
    #[arg(long, help = "Validate configuration without running")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Name of the ride
    pub ride_name: Option<String>,

    /// Type of the ride
    pub ride_type: Option<String>,

    /// Seating capacity
    pub capacity: Option<u32>,

    /// Whether the ride is open
    pub operational: Option<bool>,

    /// Most visitors admitted per cycle
    pub max_riders_per_cycle: Option<usize>,

    /// Employee operating the ride; an explicit `null` means no operator
    #[serde(default, deserialize_with = "deserialize_present")]
    pub operator: Option<Option<StaffRecord>>,

    /// Field delimiter for history files
    pub delimiter: Option<char>,

    /// Sort policy applied to the history
    pub sort_policy: Option<String>,

    /// Number of cycles to run
    pub cycles: Option<usize>,

    /// Roster of visitors to queue
    pub visitors_file: Option<String>,

    /// Visitors to queue, one delimited record each
    pub visitors: Option<Vec<String>>,

    /// History file to import
    pub import_file: Option<String>,

    /// History file to export
    pub export_file: Option<String>,
}

/// Distinguish a field set to `null` from a missing field
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Merged configuration for one run of the manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Name of the ride
    pub ride_name: String,

    /// Type of the ride
    pub ride_type: String,

    /// Seating capacity
    pub capacity: u32,

    /// Whether the ride is open
    pub operational: bool,

    /// Most visitors admitted per cycle
    pub max_riders_per_cycle: usize,

    /// Employee operating the ride
    pub operator: Option<StaffRecord>,

    /// Field delimiter for history files
    pub delimiter: char,

    /// Sort policy applied to the history
    pub sort_policy: String,

    /// Number of cycles to run
    pub cycles: usize,

    /// Roster of visitors to queue
    pub visitors_file: Option<String>,

    /// Visitors to queue, one delimited record each
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visitors: Vec<String>,

    /// History file to import
    pub import_file: Option<String>,

    /// History file to export
    pub export_file: Option<String>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for the manager configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Ride name is empty
    #[error("Ride name must not be empty")]
    EmptyRideName,

    /// Capacity is invalid
    #[error("Capacity must be greater than 0, got {0}")]
    InvalidCapacity(u32),

    /// Riders per cycle is invalid
    #[error("Max riders per cycle must be greater than 0, got {0}")]
    InvalidRiderLimit(usize),

    /// Delimiter is reserved
    #[error("Invalid delimiter {0:?}: ';', '#' and line breaks are reserved")]
    InvalidDelimiter(char),

    /// Sort policy is unknown
    #[error("Unknown sort policy '{0}' (expected age-name, ticket-age or pass-name)")]
    InvalidSortPolicy(String),

    /// An inline visitor record cannot be decoded
    #[error("Invalid visitor '{record}': {reason}")]
    InvalidVisitor {
        /// The record as given
        record: String,
        /// Why it was rejected
        reason: String,
    },
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            ride_name: "Thunder Bolt".to_string(),
            ride_type: "Roller Coaster".to_string(),
            capacity: 24,
            operational: true,
            max_riders_per_cycle: 4,
            operator: Some(StaffRecord::default()),
            delimiter: ',',
            sort_policy: SortPolicy::default().to_string(),
            cycles: 1,
            visitors_file: None,
            visitors: Vec::new(),
            import_file: None,
            export_file: None,
        }
    }
}

impl ManagerConfig {
    /// Create a new configuration from command line arguments and optional config file
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::from_cli_args(args)
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            ride_name: config_file.ride_name.unwrap_or(defaults.ride_name),
            ride_type: config_file.ride_type.unwrap_or(defaults.ride_type),
            capacity: config_file.capacity.unwrap_or(defaults.capacity),
            operational: config_file.operational.unwrap_or(defaults.operational),
            max_riders_per_cycle: config_file
                .max_riders_per_cycle
                .unwrap_or(defaults.max_riders_per_cycle),
            operator: config_file.operator.unwrap_or(defaults.operator),
            delimiter: config_file.delimiter.unwrap_or(defaults.delimiter),
            sort_policy: config_file.sort_policy.unwrap_or(defaults.sort_policy),
            cycles: config_file.cycles.unwrap_or(defaults.cycles),
            visitors_file: config_file.visitors_file.or(defaults.visitors_file),
            visitors: config_file.visitors.unwrap_or(defaults.visitors),
            import_file: config_file.import_file.or(defaults.import_file),
            export_file: config_file.export_file.or(defaults.export_file),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.ride_name {
            config.ride_name = value;
        }
        if let Some(value) = args.ride_type {
            config.ride_type = value;
        }
        if let Some(value) = args.capacity {
            config.capacity = value;
        }
        if let Some(value) = args.max_riders {
            config.max_riders_per_cycle = value;
        }
        if let Some(value) = args.delimiter {
            config.delimiter = value;
        }
        if let Some(value) = args.sort_policy {
            config.sort_policy = value;
        }
        if let Some(value) = args.cycles {
            config.cycles = value;
        }
        if let Some(value) = args.visitors_file {
            config.visitors_file = Some(value);
        }
        if !args.visitors.is_empty() {
            config.visitors = args.visitors;
        }
        if let Some(value) = args.import_file {
            config.import_file = Some(value);
        }
        if let Some(value) = args.export_file {
            config.export_file = Some(value);
        }

        if args.closed {
            config.operational = false;
        }
        if args.no_operator {
            config.operator = None;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.ride_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyRideName);
        }

        if self.capacity == 0 {
            return Err(ConfigValidationError::InvalidCapacity(self.capacity));
        }

        if self.max_riders_per_cycle == 0 {
            return Err(ConfigValidationError::InvalidRiderLimit(self.max_riders_per_cycle));
        }

        let options = CodecOptions::new(self.delimiter)
            .map_err(|_| ConfigValidationError::InvalidDelimiter(self.delimiter))?;

        for record in &self.visitors {
            decode_line(record, &options).map_err(|e| ConfigValidationError::InvalidVisitor {
                record: record.clone(),
                reason: e.to_string(),
            })?;
        }

        self.get_sort_policy()?;

        Ok(())
    }

    /// Get the sort policy as an enum value
    pub fn get_sort_policy(&self) -> Result<SortPolicy, ConfigValidationError> {
        self.sort_policy
            .parse()
            .map_err(|_| ConfigValidationError::InvalidSortPolicy(self.sort_policy.clone()))
    }

    /// Build the ride configuration described by this configuration
    pub fn ride_config(&self) -> RideResult<RideConfig> {
        let mut ride = RideConfig::new(
            self.ride_name.clone(),
            self.ride_type.clone(),
            self.capacity,
            self.max_riders_per_cycle,
        )?
        .with_operational(self.operational);
        ride.operator = self.operator.clone();
        Ok(ride)
    }

    /// Codec options for history files
    pub fn codec_options(&self) -> RideResult<CodecOptions> {
        CodecOptions::new(self.delimiter)
    }
}
