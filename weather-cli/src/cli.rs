use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode};
use tracing::debug;
use weather_core::{
    Config, Coordinates, FixedPosition, Phase, PositionSource, QueryController, QueryState,
    client_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the final query state as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and device position in the config file.
    Configure,

    /// Show current weather and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,
    },

    /// Show weather for a latitude/longitude pair.
    At {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Show weather for this device's configured position.
    Here,

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    /// Runs the command; returns `false` when the query ended in an error.
    pub async fn run(self) -> anyhow::Result<bool> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(true)
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(true)
            }
            Command::Show { city } => run_query(Target::City(city), self.json).await,
            Command::At { lat, lon } => run_query(Target::Coordinates(lat, lon), self.json).await,
            Command::Here => run_query(Target::Device, self.json).await,
        }
    }
}

enum Target {
    City(String),
    Coordinates(f64, f64),
    Device,
}

/// Run one query while a renderer task follows the published state.
async fn run_query(target: Target, json: bool) -> anyhow::Result<bool> {
    let config = Config::load()?;
    let controller = QueryController::new(client_from_config(&config));
    let mut rx = controller.subscribe();

    let position = config.position.map(FixedPosition);
    let query = async {
        match &target {
            Target::City(city) => controller.search_city(city).await,
            Target::Coordinates(lat, lon) => controller.search_coordinates(*lat, *lon).await,
            Target::Device => {
                let source = position.as_ref().map(|p| p as &dyn PositionSource);
                controller.search_device(source).await
            }
        }
    };

    let renderer = async move {
        let mut last = QueryState::default();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if state.phase == Phase::Loading && !json {
                render::loading();
            }
            if state.is_settled() {
                return state;
            }
            last = state;
        }
        last
    };

    let (submission, state) = tokio::join!(query, renderer);
    debug!("Query finished: {:?}", submission);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&state).context("Failed to serialize query state")?
        );
    } else {
        render::state(&state);
    }

    Ok(state.phase != Phase::Error)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let help = if config.has_api_key() {
        "Leave blank to keep the current key"
    } else {
        "Get one at https://home.openweathermap.org/api_keys"
    };
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message(help)
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let set_position = Confirm::new("Set this device's position for `weather here`?")
        .with_default(config.position.is_some())
        .prompt()
        .context("Failed to read answer")?;

    if set_position {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a latitude in decimal degrees")
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a longitude in decimal degrees")
            .prompt()
            .context("Failed to read longitude")?;
        config.position = Some(Coordinates {
            latitude,
            longitude,
        });
    }

    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}
