use crate::error::{Result, SkywiseError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    Northern,
    Southern,
}

/// Long-term mean temperature for each calendar month, January first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateNormals {
    pub monthly_temps: Vec<f64>, // °C
}

impl ClimateNormals {
    pub fn new(monthly_temps: Vec<f64>) -> Result<Self> {
        if monthly_temps.len() != 12 {
            return Err(SkywiseError::InvalidData(format!(
                "expected 12 monthly temperatures, got {}",
                monthly_temps.len()
            )));
        }
        Ok(Self { monthly_temps })
    }

    /// Mean over the given 1-based months
    pub fn mean_of(&self, months: &[u32]) -> Result<f64> {
        if months.is_empty() {
            return Err(SkywiseError::InvalidData("no months given".into()));
        }
        let mut sum = 0.0;
        for &m in months {
            let idx = (m as usize + 11) % 12;
            let temp = self.monthly_temps.get(idx).ok_or_else(|| {
                SkywiseError::InvalidData(format!("no normal for month {}", m))
            })?;
            sum += temp;
        }
        Ok(sum / months.len() as f64)
    }

    /// Whichever of Jun-Aug or Dec-Feb is warmer marks the summer side
    pub fn hemisphere(&self) -> Hemisphere {
        match (self.mean_of(&[6, 7, 8]), self.mean_of(&[12, 1, 2])) {
            (Ok(june_summer), Ok(december_summer)) if december_summer >= june_summer => {
                Hemisphere::Southern
            }
            _ => Hemisphere::Northern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hemisphere_from_warm_months() {
        let north = ClimateNormals::new(vec![
            0.0, 2.0, 6.0, 12.0, 17.0, 22.0, 25.0, 24.0, 20.0, 14.0, 8.0, 2.0,
        ])
        .unwrap();
        assert_eq!(north.hemisphere(), Hemisphere::Northern);
        assert_eq!(north.mean_of(&[12, 1, 2]).unwrap(), 4.0 / 3.0);

        let mut temps = north.monthly_temps.clone();
        temps.rotate_left(6);
        let south = ClimateNormals::new(temps).unwrap();
        assert_eq!(south.hemisphere(), Hemisphere::Southern);
    }

    #[test]
    fn short_series_is_rejected() {
        assert!(ClimateNormals::new(vec![10.0; 11]).is_err());
        let short = ClimateNormals {
            monthly_temps: vec![10.0; 3],
        };
        assert!(short.mean_of(&[6]).is_err());
        assert_eq!(short.hemisphere(), Hemisphere::Northern);
    }
}
