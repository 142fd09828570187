use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use weather_report_core::{
    Applied, Config, LocationQuery, ProviderId, ReportBoard, UnitSystem, WeatherAggregator,
};

use crate::render::render_report;

const START_CITY: &str = "Redmond";
const START_REGION: &str = "WA";
const TOGGLE_UNITS: &str = ":units";
const QUIT: &str = ":quit";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-report", version, about = "Current weather and UV index for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name: "openweather" or "openuv".
        provider: String,
    },

    /// Show the weather report for a city.
    Show {
        city: String,

        /// State or region code, e.g. "WA".
        region: String,

        /// ISO country code; defaults to the configured country.
        #[arg(long)]
        country: Option<String>,

        /// "metric" or "imperial"; defaults to the configured units.
        #[arg(long)]
        units: Option<UnitSystem>,
    },

    /// Keep a report on screen and refresh it as the location or units change.
    Interactive {
        #[arg(long)]
        units: Option<UnitSystem>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { city, region, country, units } => {
                let config = Config::load()?;
                let country = country.unwrap_or_else(|| config.default_country.clone());
                let units = units.unwrap_or(config.default_units);
                let query = LocationQuery::with_country(city, region, country);

                let aggregator = WeatherAggregator::from_config(&config);
                match aggregator.fetch_report(&query, units).await {
                    Ok(report) => {
                        println!("{}", render_report(&report));
                        Ok(())
                    }
                    Err(err) => {
                        let notice = err.user_message();
                        Err(anyhow::Error::new(err).context(notice))
                    }
                }
            }
            Command::Interactive { units } => {
                let config = Config::load()?;
                let units = units.unwrap_or(config.default_units);
                interactive(&config, units).await
            }
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load_file()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(anyhow!("API key for '{id}' must not be empty"));
    }

    config.upsert_provider_api_key(id, api_key.to_string());
    config.save()?;

    println!("Saved {id} credentials to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn interactive(config: &Config, mut units: UnitSystem) -> anyhow::Result<()> {
    let aggregator = WeatherAggregator::from_config(config);
    let mut board = ReportBoard::new();
    let mut query =
        LocationQuery::with_country(START_CITY, START_REGION, config.default_country.as_str());
    let mut last_good: Option<LocationQuery> = None;

    loop {
        let ticket = board.begin();
        let result = aggregator.fetch_report(&query, units).await;

        match board.apply(ticket, result) {
            Applied::Updated(report) => {
                println!("\n{}\n", render_report(report));
                last_good = Some(query.clone());
            }
            Applied::Failed { error, retained } => {
                tracing::debug!(error = ?error, "fetch failed");
                eprintln!("\n! {}", error.user_message());
                if let Some(report) = retained {
                    eprintln!("  Still showing {} {}.\n", report.name, report.country);
                }
                if let Some(shown) = &last_good {
                    query = shown.clone();
                }
            }
            Applied::Stale(ticket) => {
                tracing::debug!(ticket = ticket.sequence(), "ignored superseded result");
            }
        }

        let city = match prompt(
            &format!("City ({TOGGLE_UNITS} to switch to {}, {QUIT} to exit):", units.toggled()),
            &query.city,
        ) {
            Some(city) => city,
            None => return Ok(()),
        };

        match city.as_str() {
            QUIT => return Ok(()),
            TOGGLE_UNITS => {
                units = units.toggled();
                continue;
            }
            _ => {}
        }

        let region = match prompt("State or country code (ex. 'WA'):", &query.region_code) {
            Some(region) => region,
            None => return Ok(()),
        };

        query = LocationQuery::with_country(city, region, query.country_code.as_str());
    }
}

/// `None` when the user cancels the prompt.
fn prompt(message: &str, default: &str) -> Option<String> {
    match Text::new(message).with_default(default).prompt() {
        Ok(answer) => Some(answer.trim().to_string()),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => None,
        Err(err) => {
            eprintln!("Input error: {err}");
            None
        }
    }
}
