use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skywise",
    version,
    about = "Weather advisories: smart notifications, garden care, health and commute impact"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Fix the random seed so output is reproducible
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Skip the local forecast cache
    #[arg(long, global = true)]
    pub no_cache: bool,
}

/// Inputs for the air-quality and combined health advisories
#[derive(Args, Debug, Default)]
pub struct HealthArgs {
    /// Current air quality index, if known
    #[arg(long)]
    pub aqi: Option<f64>,

    /// Pollutant concentration as name=value (repeatable)
    #[arg(long = "pollutant")]
    pub pollutants: Vec<String>,

    /// Health concern: asthma, copd, heart_disease, allergies (repeatable)
    #[arg(long = "concern")]
    pub concerns: Vec<String>,

    /// Activity level: low, moderate, high
    #[arg(long)]
    pub activity: Option<String>,

    /// Age group: child, adult, senior
    #[arg(long)]
    pub age: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
    /// Smart notifications for the coming days (the default command)
    Notifications {
        /// City name; defaults to the configured city
        city: Option<String>,
        /// Days to look ahead (3-14)
        #[arg(long)]
        days: Option<usize>,
        /// Filter through the notification preferences in config
        #[arg(long)]
        personalized: bool,
        /// Today's air quality index, enables air-quality warnings
        #[arg(long)]
        aqi: Option<f64>,
    },
    /// When and how much to water the garden
    Watering {
        city: Option<String>,
        /// sandy, loamy, clay or silty
        #[arg(long)]
        soil: Option<String>,
    },
    /// Weather-aware care for a plant
    PlantCare {
        city: Option<String>,
        #[arg(long, default_value = "tomato")]
        plant: String,
    },
    /// Current season, planting plan and frost outlook
    GrowingSeason { city: Option<String> },
    /// Day-by-day soil moisture estimate
    SoilMoisture {
        city: Option<String>,
        #[arg(long)]
        soil: Option<String>,
    },
    /// Pest pressure over the forecast
    PestRisk { city: Option<String> },
    /// Pollen level and types
    Pollen { city: Option<String> },
    /// UV index and protection advice
    Uv { city: Option<String> },
    /// Cold and flu risk
    ColdFlu { city: Option<String> },
    /// Personalized air-quality risk
    AirQuality {
        #[command(flatten)]
        health: HealthArgs,
    },
    /// Combined health alerts
    Health {
        city: Option<String>,
        #[command(flatten)]
        health: HealthArgs,
    },
    /// Weather delay for a commute window
    Commute {
        city: Option<String>,
        /// Window start, HH:MM
        #[arg(long, default_value = "07:00")]
        start: String,
        /// Window end, HH:MM
        #[arg(long, default_value = "09:00")]
        end: String,
        /// drive, transit, bike or walk
        #[arg(long, default_value = "drive")]
        mode: String,
        /// Usual trip length in minutes
        #[arg(long, default_value_t = 30)]
        minutes: u32,
    },
    /// Compare candidate routes for one departure
    RouteOptions {
        city: Option<String>,
        #[arg(long, default_value = "Home")]
        from: String,
        #[arg(long, default_value = "Work")]
        to: String,
        /// Departure time, HH:MM
        #[arg(long, default_value = "08:00")]
        departure: String,
    },
    /// Morning, afternoon and evening delays for the home/work round trip
    TravelForecast {
        city: Option<String>,
        /// Days to cover (1-14)
        #[arg(long, default_value_t = 5)]
        days: usize,
    },
}

impl Commands {
    /// The city argument, for commands that take one
    pub fn city(&self) -> Option<&str> {
        match self {
            Commands::Notifications { city, .. }
            | Commands::Watering { city, .. }
            | Commands::PlantCare { city, .. }
            | Commands::GrowingSeason { city }
            | Commands::SoilMoisture { city, .. }
            | Commands::PestRisk { city }
            | Commands::Pollen { city }
            | Commands::Uv { city }
            | Commands::ColdFlu { city }
            | Commands::Health { city, .. }
            | Commands::Commute { city, .. }
            | Commands::RouteOptions { city, .. }
            | Commands::TravelForecast { city, .. } => city.as_deref(),
            Commands::Init | Commands::Check | Commands::AirQuality { .. } => None,
        }
    }
}
