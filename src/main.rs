//! SkyCast command-line front end.
//!
//! Looks up current weather and a per-day forecast, offers location
//! suggestions, and manages the records the backend stores for each query.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use skycast_core::{AppError, Config, ConfigError, InputError, UnitPreference};
use skycast_services::{
    lookup, DateRange, LookupInput, RecordEditor, RecordList, TypeaheadResolver, WeatherApiClient,
    WeatherRecord, WeatherView,
};
use skycast_weather::DisplayWeather;

/// Days covered when no end date is given.
const DEFAULT_RANGE_DAYS: i64 = 5;

/// Look up weather and manage stored weather queries.
#[derive(Parser)]
#[command(name = "skycast", version)]
#[command(about = "Look up weather and manage stored weather queries")]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Backend base URL, overriding the config file and `SKYCAST_API_URL`.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current weather and daily forecast for a location.
    Weather {
        /// Place name, postal code, or `lat,lon`.
        location: String,

        /// First day of the range (default: today).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the range (default: five days after start).
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Suggest locations for partial text.
    Search {
        text: String,

        /// Fetch weather for the Nth suggestion (1-based).
        #[arg(long)]
        pick: Option<usize>,
    },

    /// Stored weather queries.
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },

    /// Configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum RecordsAction {
    /// List every stored record.
    List,

    /// Change a record's location, keeping its date range.
    Edit { id: String, location: String },

    /// Delete a record.
    Delete { id: String },

    /// Download all records.
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file (default: weather.csv or weather.json).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location.
    Path,
    /// Print the effective configuration.
    Show,
    /// Check the configuration for problems.
    Validate,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn default_file(self) -> &'static str {
        match self {
            Self::Csv => "weather.csv",
            Self::Json => "weather.json",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    if let Err(e) = skycast_core::init(filter) {
        eprintln!("{}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    match cli.command {
        Commands::Config { action } => run_config(action, &config),
        command => {
            check_config(&config)?;
            let client = WeatherApiClient::from_config(&config)?;
            match command {
                Commands::Weather {
                    location,
                    start,
                    end,
                } => {
                    let range = date_range(start, end);
                    weather(&client, &config, LookupInput::Typed(location), range).await
                }
                Commands::Search { text, pick } => search(&client, &config, &text, pick).await,
                Commands::Records { action } => run_records(&client, &config, action).await,
                Commands::Config { .. } => Ok(()),
            }
        }
    }
}

fn check_config(config: &Config) -> Result<(), AppError> {
    let validation = config.validate();
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }
    if validation.is_valid() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(validation.error_summary()).into())
    }
}

fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> DateRange {
    let start = start.unwrap_or_else(|| Local::now().date_naive());
    match end {
        Some(end) => DateRange::new(start, end),
        None => DateRange::starting(start, DEFAULT_RANGE_DAYS),
    }
}

async fn weather(
    client: &WeatherApiClient,
    config: &Config,
    input: LookupInput,
    range: DateRange,
) -> Result<(), AppError> {
    let mut view = WeatherView::new();
    lookup(client, &mut view, &input, range).await?;
    print_view(&view, config.display.units);
    Ok(())
}

async fn search(
    client: &WeatherApiClient,
    config: &Config,
    text: &str,
    pick: Option<usize>,
) -> Result<(), AppError> {
    let mut resolver = TypeaheadResolver::from_config(&config.search);
    let candidates = resolver.resolve(client, text).await;

    if candidates.is_empty() {
        println!("No matching locations.");
        return Ok(());
    }

    let Some(pick) = pick else {
        for (i, candidate) in candidates.iter().enumerate() {
            println!("{:>2}. {}  [{}]", i + 1, candidate.label, candidate.location);
        }
        return Ok(());
    };

    let location = pick
        .checked_sub(1)
        .and_then(|index| resolver.select(index))
        .ok_or_else(|| {
            InputError::Invalid(format!(
                "Pick a suggestion between 1 and {}.",
                candidates.len()
            ))
        })?;

    let range = date_range(None, None);
    weather(client, config, LookupInput::Selected(location), range).await
}

async fn run_records(
    client: &WeatherApiClient,
    config: &Config,
    action: RecordsAction,
) -> Result<(), AppError> {
    match action {
        RecordsAction::List => {
            let list = RecordList::new(client.list_records().await?);
            if list.is_empty() {
                println!("No stored records.");
            }
            for record in list.records() {
                print_record(record, config.display.units);
            }
        }
        RecordsAction::Edit { id, location } => {
            let mut list = RecordList::new(client.list_records().await?);
            let record = list.get(&id).ok_or_else(|| unknown_record(&id))?;

            let mut editor = RecordEditor::new();
            editor.begin_edit(record);
            let updated = editor.apply_edit(client, &location).await?;

            print_record(&updated, config.display.units);
            list.replace(updated);
        }
        RecordsAction::Delete { id } => {
            let mut list = RecordList::new(client.list_records().await?);
            if list.get(&id).is_none() {
                return Err(unknown_record(&id));
            }
            list.delete(client, &id).await?;
            println!("Deleted record {} ({} remaining).", id, list.len());
        }
        RecordsAction::Export { format, out } => {
            let path = out.unwrap_or_else(|| PathBuf::from(format.default_file()));
            let bytes = match format {
                ExportFormat::Csv => client.export_csv().await?,
                ExportFormat::Json => {
                    let records = client.export_json().await?;
                    serde_json::to_vec_pretty(&records).map_err(anyhow::Error::from)?
                }
            };
            std::fs::write(&path, &bytes)?;
            println!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
    }
    Ok(())
}

fn unknown_record(id: &str) -> AppError {
    InputError::Invalid(format!("No record with id {}.", id)).into()
}

fn run_config(action: ConfigAction, config: &Config) -> Result<(), AppError> {
    match action {
        ConfigAction::Path => {
            println!("{}", Config::config_path()?.display());
        }
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(config).map_err(anyhow::Error::from)?;
            print!("{}", rendered);
        }
        ConfigAction::Validate => {
            let validation = config.validate();
            for warning in &validation.warnings {
                println!("warning: {}", warning);
            }
            for error in &validation.errors {
                println!("error: {}", error);
            }
            if !validation.is_valid() {
                return Err(ConfigError::Invalid(validation.error_summary()).into());
            }
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

fn print_view(view: &WeatherView, units: UnitPreference) {
    if let Some(name) = view.location_name() {
        println!("{}", name);
    }
    if let Some(current) = view.current() {
        println!("  Now: {}", summary(current, units));
    }

    let days = view.forecast_days();
    if !days.is_empty() {
        println!("  Forecast:");
        for (day, display) in &days {
            println!("    {}  {}", day.format("%a %b %d"), summary(display, units));
        }
    }

    if let Some(url) = view.map_url() {
        println!("  Map: {}", url);
    }
}

fn print_record(record: &WeatherRecord, units: UnitPreference) {
    println!(
        "{}  {}  {} to {}",
        record.id, record.location, record.date_range.start, record.date_range.end
    );
    if record.current_weather().is_some() {
        println!("    {}", summary(&record.display(), units));
    }
    if let Some(url) = record.map_url() {
        println!("    Map: {}", url);
    }
}

fn summary(display: &DisplayWeather, units: UnitPreference) -> String {
    let mut parts = Vec::new();
    if !display.description.is_empty() {
        parts.push(display.description.clone());
    }
    if let Some(temp) = paired(display.temp_f, "°F", display.temp_c, "°C", units) {
        parts.push(temp);
    }
    if let Some(humidity) = display.humidity_pct {
        parts.push(format!("{}% humidity", humidity));
    }
    if let Some(wind) = paired(display.wind_mph, " mph", display.wind_kmh, " km/h", units) {
        parts.push(format!("wind {}", wind));
    }
    if let Some(icon) = &display.icon_url {
        parts.push(icon.clone());
    }
    parts.join(", ")
}

/// Format an imperial/metric pair according to the unit preference.
fn paired(
    imperial: Option<i64>,
    imperial_unit: &str,
    metric: Option<i64>,
    metric_unit: &str,
    units: UnitPreference,
) -> Option<String> {
    let imperial = imperial.map(|v| format!("{}{}", v, imperial_unit));
    let metric = metric.map(|v| format!("{}{}", v, metric_unit));
    match units {
        UnitPreference::Imperial => imperial,
        UnitPreference::Metric => metric,
        UnitPreference::Both => match (imperial, metric) {
            (Some(i), Some(m)) => Some(format!("{} / {}", i, m)),
            (i, m) => i.or(m),
        },
    }
}
