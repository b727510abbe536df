use crate::config::{CacheConfig, Config};
use crate::datasources::{OpenWeatherMapClient, WeatherSimulator};
use crate::db::Database;
use crate::error::Result;
use crate::models::{ClimateNormals, WeatherSnapshot};
use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info, warn};

/// Resolves weather for a city: local cache first, then the provider, and
/// the simulator whenever neither can answer.
pub struct WeatherSyncService {
    db: Option<Database>,
    cache: CacheConfig,
    openweathermap_client: Option<OpenWeatherMapClient>,
}

impl WeatherSyncService {
    pub fn new(config: &Config, db: Option<Database>) -> Self {
        let openweathermap_client = config
            .openweathermap
            .as_ref()
            .filter(|c| c.is_usable())
            .and_then(|c| match OpenWeatherMapClient::new(c.clone()) {
                Ok(client) => {
                    info!("OpenWeatherMap client configured for forecast data");
                    Some(client)
                }
                Err(e) => {
                    warn!("Failed to build OpenWeatherMap client: {}", e);
                    None
                }
            });

        if openweathermap_client.is_none() {
            info!("OpenWeatherMap not configured - using simulated weather");
        }

        let db = db.filter(|_| config.cache.enabled);

        Self {
            db,
            cache: config.cache.clone(),
            openweathermap_client,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.openweathermap_client.is_some()
    }

    /// Never fails: any provider or cache problem degrades to simulated data
    pub async fn snapshot(&self, city: &str, now: NaiveDateTime) -> WeatherSnapshot {
        if let Some(db) = &self.db {
            match db.cached_snapshot(city, now) {
                Ok(Some(snapshot)) => return snapshot,
                Ok(None) => debug!("No cached forecast for {}", city),
                Err(e) => warn!("Forecast cache lookup failed: {}", e),
            }
        }

        if let Some(client) = &self.openweathermap_client {
            match client.fetch_snapshot(city, now).await {
                Ok(snapshot) => {
                    self.store_snapshot(city, &snapshot);
                    return snapshot;
                }
                Err(e) => warn!("Failed to fetch weather for {}: {} - simulating", city, e),
            }
        }

        WeatherSimulator::snapshot(city, now)
    }

    fn store_snapshot(&self, city: &str, snapshot: &WeatherSnapshot) {
        if let Some(db) = &self.db {
            let ttl = Duration::minutes(self.cache.forecast_ttl_minutes.max(0));
            if let Err(e) = db.cache_snapshot(city, snapshot, ttl) {
                warn!("Failed to cache forecast for {}: {}", city, e);
            }
        }
    }

    /// Monthly climate normals, cached per city
    pub fn climate_normals(&self, city: &str, now: NaiveDateTime) -> Result<ClimateNormals> {
        if let Some(db) = &self.db {
            match db.cached_climate(city, now) {
                Ok(Some(normals)) => return Ok(normals),
                Ok(None) => {}
                Err(e) => warn!("Climate cache lookup failed: {}", e),
            }
        }

        let normals = WeatherSimulator::climate_normals(city)?;
        if let Some(db) = &self.db {
            let ttl = Duration::hours(self.cache.climate_ttl_hours.max(0));
            if let Err(e) = db.cache_climate(city, &normals, now, ttl) {
                warn!("Failed to cache climate normals for {}: {}", city, e);
            }
        }
        Ok(normals)
    }

    /// Drop expired cache rows
    pub fn purge_cache(&self, now: NaiveDateTime) -> Result<usize> {
        match &self.db {
            Some(db) => db.purge_expired(now),
            None => Ok(0),
        }
    }

    pub async fn check_connections(&self, city: &str) -> ConnectionStatus {
        let mut status = ConnectionStatus {
            cache: self.db.is_some(),
            ..ConnectionStatus::default()
        };

        if let Some(ref client) = self.openweathermap_client {
            status.openweathermap = Some(client.test_connection(city).await.unwrap_or(false));
        }

        status
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus {
    /// None when no provider is configured
    pub openweathermap: Option<bool>,
    pub cache: bool,
}

impl ConnectionStatus {
    pub fn provider_connected(&self) -> bool {
        self.openweathermap == Some(true)
    }
}
