pub mod calculations;
pub mod composer;
pub mod normalizer;
pub mod random;
pub mod rules;
pub mod scanner;
pub mod templates;
pub mod weather_sync;

pub use weather_sync::WeatherSyncService;
