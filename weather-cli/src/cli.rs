use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use tracing::debug;
use weather_core::{
    ClockStyle, Config, MemorySurface, OpenWeatherProvider, Orchestrator, SearchOutcome, Units,
};

use crate::terminal::TerminalSurface;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current conditions and a 24-hour forecast from OpenWeather"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively store the API key, unit system and clock style.
    Configure,

    /// Look up the weather for a city name or 5-digit zip code.
    Show {
        /// City name or zip code, e.g. "New York" or 10001.
        #[arg(required = true)]
        location: Vec<String>,

        /// Override the configured unit system (imperial, metric, standard).
        #[arg(long, value_parser = parse_units)]
        units: Option<Units>,

        /// Print the rendered screen as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for locations repeatedly; press Enter to search, Esc to quit.
    Interactive {
        /// Override the configured unit system (imperial, metric, standard).
        #[arg(long, value_parser = parse_units)]
        units: Option<Units>,
    },

    /// Print the path of the configuration file.
    ConfigPath,
}

fn parse_units(value: &str) -> Result<Units, String> {
    Units::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                location,
                units,
                json,
            } => {
                let config = load_config(units)?;
                show(&config, &location.join(" "), json).await
            }
            Command::Interactive { units } => {
                let config = load_config(units)?;
                interactive(&config).await
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn load_config(units: Option<Units>) -> anyhow::Result<Config> {
    let mut config = Config::load()?.apply_env();
    if let Some(units) = units {
        config.units = units;
    }
    debug!(units = %config.units, clock = %config.clock, "configuration loaded");
    Ok(config)
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = Select::new("Unit system:", Units::all().to_vec())
        .with_starting_cursor(Units::all().iter().position(|u| *u == config.units).unwrap_or(0))
        .prompt()
        .context("Failed to read unit system")?;

    let clock = Select::new("Clock style:", ClockStyle::all().to_vec())
        .with_starting_cursor(ClockStyle::all().iter().position(|c| *c == config.clock).unwrap_or(0))
        .prompt()
        .context("Failed to read clock style")?;

    config.set_api_key(api_key);
    config.units = units;
    config.clock = clock;

    if !config.is_api_key_configured() {
        anyhow::bail!("The API key is empty or a placeholder; configuration not saved.");
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(ExitCode::SUCCESS)
}

async fn show(config: &Config, location: &str, json: bool) -> anyhow::Result<ExitCode> {
    let provider = OpenWeatherProvider::new(config);

    let outcome = if json {
        let orch = Orchestrator::new(provider, MemorySurface::default(), config.formatting());
        let outcome = orch.submit(location).await;
        let surface = orch.into_surface();
        println!(
            "{}",
            serde_json::to_string_pretty(&surface).context("Failed to serialize output")?
        );
        outcome
    } else {
        let orch = Orchestrator::new(provider, TerminalSurface::default(), config.formatting());
        let outcome = orch.submit(location).await;
        print!("{}", orch.inspect(TerminalSurface::draw).await);
        outcome
    };

    Ok(exit_code(outcome))
}

async fn interactive(config: &Config) -> anyhow::Result<ExitCode> {
    let orch = Orchestrator::new(
        OpenWeatherProvider::new(config),
        TerminalSurface::default(),
        config.formatting(),
    );

    loop {
        let input = match Text::new("Location:")
            .with_help_message("city or 5-digit zip code, Esc to quit")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read location"),
        };

        orch.submit(&input).await;
        println!("{}", orch.inspect(TerminalSurface::draw).await);
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_code(outcome: SearchOutcome) -> ExitCode {
    match outcome {
        SearchOutcome::Shown => ExitCode::SUCCESS,
        SearchOutcome::Rejected(_) => ExitCode::from(2),
        SearchOutcome::Failed | SearchOutcome::Superseded => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_joins_multi_word_locations() {
        let cli = Cli::try_parse_from(["weather", "show", "New", "York", "--units", "metric"])
            .expect("arguments must parse");

        match cli.command {
            Command::Show {
                location,
                units,
                json,
            } => {
                assert_eq!(location.join(" "), "New York");
                assert_eq!(units, Some(Units::Metric));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_a_location() {
        assert!(Cli::try_parse_from(["weather", "show"]).is_err());
    }

    #[test]
    fn unknown_units_are_rejected() {
        let err = Cli::try_parse_from(["weather", "show", "10001", "--units", "rankine"])
            .unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }
}
