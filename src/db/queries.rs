use crate::db::Database;
use crate::error::Result;
use crate::models::{ClimateNormals, WeatherSnapshot};
use chrono::{Duration, NaiveDateTime};
use rusqlite::params;
use tracing::{debug, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn city_key(city: &str) -> String {
    city.trim().to_lowercase()
}

fn stamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

// Forecast Cache Queries

impl Database {
    pub fn cache_snapshot(&self, city: &str, snapshot: &WeatherSnapshot, ttl: Duration) -> Result<()> {
        let payload = serde_json::to_string(snapshot)?;
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT OR REPLACE INTO forecast_cache
                    (city_key, payload, simulated, fetched_at, expires_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    city_key(city),
                    payload,
                    snapshot.simulated,
                    stamp(snapshot.fetched_at),
                    stamp(snapshot.fetched_at + ttl),
                ],
            )?;
            Ok(())
        })
    }

    /// A cached snapshot that has not expired at `now`
    pub fn cached_snapshot(&self, city: &str, now: NaiveDateTime) -> Result<Option<WeatherSnapshot>> {
        let key = city_key(city);
        let payload: Option<String> = self.with_conn(|conn| {
            conn.query_row(
                "SELECT payload FROM forecast_cache WHERE city_key = ?1 AND expires_at > ?2",
                params![key, stamp(now)],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
        })?;

        Ok(payload.and_then(|p| match serde_json::from_str(&p) {
            Ok(snapshot) => {
                debug!(city = %key, "Forecast cache hit");
                Some(snapshot)
            }
            Err(e) => {
                warn!(city = %key, error = %e, "Unreadable forecast cache entry, ignoring");
                None
            }
        }))
    }
}

// Climate Cache Queries

impl Database {
    pub fn cache_climate(
        &self,
        city: &str,
        normals: &ClimateNormals,
        fetched_at: NaiveDateTime,
        ttl: Duration,
    ) -> Result<()> {
        let payload = serde_json::to_string(normals)?;
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT OR REPLACE INTO climate_cache (city_key, payload, fetched_at, expires_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![city_key(city), payload, stamp(fetched_at), stamp(fetched_at + ttl)],
            )?;
            Ok(())
        })
    }

    pub fn cached_climate(&self, city: &str, now: NaiveDateTime) -> Result<Option<ClimateNormals>> {
        let key = city_key(city);
        let payload: Option<String> = self.with_conn(|conn| {
            conn.query_row(
                "SELECT payload FROM climate_cache WHERE city_key = ?1 AND expires_at > ?2",
                params![key, stamp(now)],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
        })?;

        // re-validate through the constructor so a hand-edited row cannot
        // smuggle in the wrong number of months
        Ok(payload.and_then(|p| {
            match serde_json::from_str::<ClimateNormals>(&p).map(|n| ClimateNormals::new(n.monthly_temps)) {
                Ok(Ok(normals)) => Some(normals),
                Ok(Err(e)) => {
                    warn!(city = %key, error = %e, "Invalid climate cache entry, ignoring");
                    None
                }
                Err(e) => {
                    warn!(city = %key, error = %e, "Unreadable climate cache entry, ignoring");
                    None
                }
            }
        }))
    }

    /// Drop every expired row from both caches, returning how many went
    pub fn purge_expired(&self, now: NaiveDateTime) -> Result<usize> {
        self.with_conn(|conn| {
            let now = stamp(now);
            let forecasts = conn.execute("DELETE FROM forecast_cache WHERE expires_at <= ?1", [&now])?;
            let climate = conn.execute("DELETE FROM climate_cache WHERE expires_at <= ?1", [&now])?;
            Ok(forecasts + climate)
        })
    }
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::WeatherSimulator;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn snapshot_expires_after_ttl() {
        let db = Database::open_in_memory().unwrap();
        let snap = WeatherSimulator::snapshot("Berlin", at(9));
        db.cache_snapshot("Berlin", &snap, Duration::minutes(30)).unwrap();

        let hit = db.cached_snapshot("  berlin ", at(9)).unwrap().unwrap();
        assert_eq!(hit.periods.len(), snap.periods.len());
        assert!(hit.simulated);

        assert!(db.cached_snapshot("Berlin", at(10)).unwrap().is_none());
        assert!(db.cached_snapshot("Paris", at(9)).unwrap().is_none());
    }

    #[test]
    fn climate_round_trips_and_purges() {
        let db = Database::open_in_memory().unwrap();
        let normals = WeatherSimulator::climate_normals("Oslo").unwrap();
        db.cache_climate("Oslo", &normals, at(8), Duration::hours(1)).unwrap();

        assert_eq!(db.cached_climate("oslo", at(8)).unwrap(), Some(normals));
        assert_eq!(db.purge_expired(at(12)).unwrap(), 1);
        assert!(db.cached_climate("Oslo", at(8)).unwrap().is_none());
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO climate_cache VALUES ('rome', '{\"monthly_temps\":[1,2]}', ?1, ?2)",
                params![stamp(at(8)), stamp(at(20))],
            )?;
            Ok(())
        })
        .unwrap();
        assert!(db.cached_climate("Rome", at(9)).unwrap().is_none());
    }
}
