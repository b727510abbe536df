mod advisories;
mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;

use advisories::{Advisor, Advisory, PlannedRoute};
use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, Commands, HealthArgs};
use config::Config;
use db::Database;
use logic::random::{RandomSource, RngSource};
use logic::rules::{ObservedConditions, RuleTables};
use logic::WeatherSyncService;
use models::{AqiReading, CommuteMode, HealthProfile, SoilType};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Init) => {
            Config::setup_interactive()?;
            return Ok(());
        }
        Some(Commands::Check) => return run_check(&cli).await,
        _ => {}
    }

    let config = Config::load(cli.config.clone()).context("Configuration error")?;
    let now = chrono::Local::now().naive_local();

    let sync = WeatherSyncService::new(&config, open_cache(&cli, &config));
    if let Err(e) = sync.purge_cache(now) {
        warn!("Failed to purge expired cache rows: {}", e);
    }

    let rng: Box<dyn RandomSource> = match cli.seed.or(config.advisor.random_seed) {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_os()),
    };
    let mut advisor = Advisor::new(RuleTables::shared(), now, rng)
        .with_notification_cap(config.advisor.notification_cap);

    let default_command = Commands::Notifications {
        city: None,
        days: None,
        personalized: false,
        aqi: None,
    };
    let command = cli.command.unwrap_or(default_command);
    let city = command
        .city()
        .unwrap_or(config.advisor.default_city.as_str())
        .to_string();

    if let Commands::AirQuality { health } = &command {
        let (reading, profile) = health_inputs(health);
        return print_json(&advisor.air_quality(reading.as_ref(), &profile));
    }

    let weather = sync.snapshot(&city, now).await;
    if weather.simulated {
        tracing::info!("Using simulated weather for {}", city);
    }

    match command {
        Commands::Notifications {
            days,
            personalized,
            aqi,
            ..
        } => {
            let days = days.unwrap_or(config.advisor.forecast_days);
            let mut external = ObservedConditions::new(weather.latitude());
            if let Some(aqi) = aqi {
                external = external.with_aqi(now.date(), aqi);
            }
            let result = advisor.smart_notifications(&weather, days, &external);
            match result {
                Advisory::Ready(n) if personalized => {
                    print_json(&n.personalize(&config.notifications))
                }
                other => print_json(&other),
            }
        }
        Commands::Watering { soil, .. } => {
            let soil = soil_or_default(soil.as_deref(), &config);
            print_json(&advisor.watering(&weather, soil))
        }
        Commands::PlantCare { plant, .. } => print_json(&advisor.plant_care(&weather, &plant)),
        Commands::GrowingSeason { .. } => {
            let normals = match sync.climate_normals(&city, now) {
                Ok(n) => Some(n),
                Err(e) => {
                    warn!("Climate normals unavailable for {}: {}", city, e);
                    None
                }
            };
            print_json(&advisor.growing_season(&weather, normals.as_ref()))
        }
        Commands::SoilMoisture { soil, .. } => {
            let soil = soil_or_default(soil.as_deref(), &config);
            print_json(&advisor.soil_moisture_forecast(&weather, soil))
        }
        Commands::PestRisk { .. } => print_json(&advisor.pest_risk(&weather)),
        Commands::Pollen { .. } => print_json(&advisor.pollen(&weather)),
        Commands::Uv { .. } => print_json(&advisor.uv(&weather)),
        Commands::ColdFlu { .. } => print_json(&advisor.cold_flu(&weather)),
        Commands::Health { health, .. } => {
            let (reading, profile) = health_inputs(&health);
            print_json(&advisor.health_alerts(&weather, reading.as_ref(), &profile))
        }
        Commands::Commute {
            start,
            end,
            mode,
            minutes,
            ..
        } => {
            let mode = CommuteMode::parse_or_default(&mode);
            print_json(&advisor.commute(&weather, &start, &end, mode, minutes))
        }
        Commands::RouteOptions {
            from,
            to,
            departure,
            ..
        } => print_json(&advisor.route_options(&weather, &from, &to, &departure)),
        Commands::TravelForecast { days, .. } => {
            print_json(&advisor.travel_forecast(&weather, &PlannedRoute::defaults(), days))
        }
        Commands::Init | Commands::Check | Commands::AirQuality { .. } => Ok(()),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_cache(cli: &Cli, config: &Config) -> Option<Database> {
    if cli.no_cache || !config.cache.enabled {
        return None;
    }
    let opened = Config::db_path(cli.data_dir.as_ref()).and_then(|path| Database::open(&path));
    match opened {
        Ok(db) => Some(db),
        Err(e) => {
            warn!("Forecast cache unavailable: {}", e);
            None
        }
    }
}

fn soil_or_default(arg: Option<&str>, config: &Config) -> SoilType {
    match arg {
        Some(s) => SoilType::parse_or_default(s),
        None => config.advisor.soil(),
    }
}

fn health_inputs(args: &HealthArgs) -> (Option<AqiReading>, HealthProfile) {
    let reading = args
        .aqi
        .map(|aqi| AqiReading::new(aqi).with_pollutants(&args.pollutants));
    let profile = HealthProfile::from_inputs(
        &args.concerns,
        args.activity.as_deref(),
        args.age.as_deref(),
    );
    (reading, profile)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_check(cli: &Cli) -> anyhow::Result<()> {
    if !Config::exists(cli.config.as_ref()) {
        println!("No config file found; defaults will be used. Run `skywise init` to create one.");
    }
    let config = Config::load(cli.config.clone()).context("Configuration error")?;
    println!("Config OK (default city: {})", config.advisor.default_city);

    let sync = WeatherSyncService::new(&config, open_cache(cli, &config));
    let status = sync
        .check_connections(&config.advisor.default_city)
        .await;

    match status.openweathermap {
        Some(true) => println!("OpenWeatherMap: OK"),
        Some(false) => println!("OpenWeatherMap: FAILED (advisories will use simulated weather)"),
        None => println!("OpenWeatherMap: not configured (advisories will use simulated weather)"),
    }
    println!(
        "Forecast cache: {}",
        if status.cache { "enabled" } else { "disabled" }
    );

    if status.openweathermap.is_some() && !status.provider_connected() {
        bail!("OpenWeatherMap connection check failed");
    }
    Ok(())
}
