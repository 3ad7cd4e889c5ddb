//! Weather dashboard CLI

use clap::{Parser, Subcommand};
use common::errors::AppError;
use common::tracing::{init_tracing, init_tracing_pretty};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use weather_dashboard::config::Config;
use weather_dashboard::{CardSupervisor, Dashboard, FavoritesList, JsonFileStore, render};
use weather_gateway::{TemperatureUnit, WeatherGateway};

#[derive(Parser)]
#[command(name = "weather-dashboard")]
#[command(version, about = "Current conditions and short-term forecasts for your favorite cities")]
struct Cli {
    /// Emit JSON log lines instead of human readable ones
    #[arg(long)]
    json_logs: bool,

    /// Display unit (celsius or fahrenheit), overrides TEMPERATURE_UNIT
    #[arg(short, long)]
    unit: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search cities by name
    Search { query: String },

    /// Show current conditions for a city
    Current { city: String },

    /// Show the five-day and next-24-hour forecast for a city
    Forecast { city: String },

    /// Manage favorite cities
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Refresh every favorite periodically until interrupted (default)
    Watch,
}

#[derive(Subcommand)]
enum FavoritesAction {
    List,
    Add { city: String },
    Remove { city: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.json_logs {
        init_tracing();
    } else {
        init_tracing_pretty();
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            match e {
                AppError::ConfigError(_) | AppError::StorageError(_) => eprintln!("{}", e),
                _ => eprintln!("{}", e.user_message()),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env()?;
    let unit = match cli.unit.as_deref() {
        Some(value) => value.parse()?,
        None => config.temperature_unit,
    };

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Search { query } => {
            let gateway = gateway()?;
            for city in gateway.search_cities(&query).await {
                println!("{}", render::city_match(&city));
            }
        }
        Commands::Current { city } => {
            let gateway = gateway()?;
            let current = gateway.get_current_weather(&city).await?;
            println!("{}", render::snapshot(&current, unit));
        }
        Commands::Forecast { city } => {
            let gateway = gateway()?;
            let bundle = gateway.get_forecast(&city).await?;
            print!("{}", render::forecast(&bundle.forecast, &bundle.hourly, unit));
        }
        Commands::Favorites { action } => {
            let mut favorites = FavoritesList::load(JsonFileStore::new(&config.favorites_path))?;
            match action {
                FavoritesAction::List => {}
                FavoritesAction::Add { city } => {
                    if !favorites.add(&city)? {
                        println!("{} is already a favorite", city);
                    }
                }
                FavoritesAction::Remove { city } => {
                    if !favorites.remove(&city)? {
                        println!("{} is not a favorite", city);
                    }
                }
            }
            for city in favorites.cities() {
                println!("{}", city);
            }
        }
        Commands::Watch => watch(&config, unit).await?,
    }

    Ok(())
}

fn gateway() -> Result<WeatherGateway, AppError> {
    WeatherGateway::new(&weather_gateway::Config::from_env()?)
}

async fn watch(config: &Config, unit: TemperatureUnit) -> Result<(), AppError> {
    let gateway = Arc::new(gateway()?);
    let (supervisor, mut updates) = CardSupervisor::new(gateway, config.refresh_interval());
    let favorites = FavoritesList::load(JsonFileStore::new(&config.favorites_path))?;
    let mut dashboard = Dashboard::new(favorites, supervisor);

    info!(cities = dashboard.favorites().len(), "Dashboard starting");
    dashboard.start();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(update) = updates.recv() => {
                let city = update.city.clone();
                if let Some(view) = dashboard.apply(update) {
                    print!("{}", render::card(&city, view, unit));
                }
            }
            _ = &mut shutdown => break,
        }
    }

    dashboard.shutdown();
    info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, stopping cards...");
        },
        _ = terminate => {
            info!("Received SIGTERM, stopping cards...");
        },
    }

    warn!("Cancelling refreshes, in-flight results will be discarded");
}
