pub mod openweathermap;
pub mod simulated;

pub use openweathermap::OpenWeatherMapClient;
pub use simulated::WeatherSimulator;
