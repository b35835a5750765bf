// Mars weather record (synthetic stand-in for the retired InSight feed)
use chrono::NaiveDate;
use serde::Serialize;

use super::units::{celsius_to_fahrenheit, mps_to_mph, pascals_to_mmhg};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarsWeather {
    pub sol: u32,
    /// Degrees Celsius.
    pub temperature: TemperatureRange,
    /// Pascals.
    pub pressure: f64,
    /// Metres per second.
    pub wind_speed: f64,
    pub season: String,
    pub earth_date: NaiveDate,
}

impl MarsWeather {
    pub fn average_fahrenheit(&self) -> f64 {
        celsius_to_fahrenheit(self.temperature.average)
    }

    pub fn pressure_mmhg(&self) -> f64 {
        pascals_to_mmhg(self.pressure)
    }

    pub fn wind_speed_mph(&self) -> f64 {
        mps_to_mph(self.wind_speed)
    }
}
