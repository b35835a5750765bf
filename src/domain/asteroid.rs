// Near-earth object domain model and derived views
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::units::{format_distance_km, parse_or_zero};

/// Raw NEO feed response. Only the fields the dashboard reads are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct NeoFeedResponse {
    pub near_earth_objects: BTreeMap<String, Vec<Asteroid>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: String,
    pub name: String,
    pub estimated_diameter: EstimatedDiameter,
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedDiameter {
    pub meters: DiameterRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiameterRange {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseApproach {
    #[serde(default)]
    pub miss_distance: Option<MissDistance>,
    #[serde(default)]
    pub relative_velocity: Option<RelativeVelocity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissDistance {
    #[serde(default)]
    pub kilometers: Option<String>,
    #[serde(default)]
    pub lunar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeVelocity {
    #[serde(default)]
    pub kilometers_per_hour: Option<String>,
}

impl Asteroid {
    fn first_approach(&self) -> Option<&CloseApproach> {
        self.close_approach_data.first()
    }

    /// Miss distance of the first close approach. Missing or garbled values count as 0.
    pub fn miss_distance_km(&self) -> f64 {
        parse_or_zero(
            self.first_approach()
                .and_then(|a| a.miss_distance.as_ref())
                .and_then(|d| d.kilometers.as_deref()),
        )
    }

    pub fn miss_distance_lunar(&self) -> f64 {
        parse_or_zero(
            self.first_approach()
                .and_then(|a| a.miss_distance.as_ref())
                .and_then(|d| d.lunar.as_deref()),
        )
    }

    pub fn velocity_kmh(&self) -> f64 {
        parse_or_zero(
            self.first_approach()
                .and_then(|a| a.relative_velocity.as_ref())
                .and_then(|v| v.kilometers_per_hour.as_deref()),
        )
    }

    pub fn is_hazardous(&self) -> bool {
        self.is_potentially_hazardous_asteroid
    }

    pub fn distance_label(&self) -> String {
        format_distance_km(self.miss_distance_km())
    }

    pub fn lunar_label(&self) -> String {
        format!("{:.2} LD", self.miss_distance_lunar())
    }

    pub fn velocity_label(&self) -> String {
        format!("{:.0} km/h", self.velocity_kmh())
    }

    pub fn diameter_label(&self) -> String {
        let range = &self.estimated_diameter.meters;
        format!(
            "{:.0}-{:.0}m",
            range.estimated_diameter_min, range.estimated_diameter_max
        )
    }
}

/// Snapshot payload for the asteroids panel: every object seen on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsteroidFeed {
    pub observation_date: NaiveDate,
    pub asteroids: Vec<Asteroid>,
}

impl AsteroidFeed {
    pub fn from_response(observation_date: NaiveDate, response: NeoFeedResponse) -> Self {
        let asteroids = response
            .near_earth_objects
            .into_values()
            .flatten()
            .collect();
        Self {
            observation_date,
            asteroids,
        }
    }

    pub fn summary(&self) -> AsteroidSummary {
        let ranked = rank(&self.asteroids);
        AsteroidSummary {
            total: ranked.len(),
            hazardous: filter_hazardous(ranked.iter().copied()).len(),
            closest_approach: ranked
                .first()
                .map(|a| a.distance_label())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsteroidSummary {
    pub total: usize,
    pub hazardous: usize,
    pub closest_approach: String,
}

/// Closest first. Stable, so ties keep feed order.
pub fn rank(asteroids: &[Asteroid]) -> Vec<&Asteroid> {
    let mut ranked: Vec<&Asteroid> = asteroids.iter().collect();
    ranked.sort_by(|a, b| a.miss_distance_km().total_cmp(&b.miss_distance_km()));
    ranked
}

pub fn filter_hazardous<'a>(asteroids: impl IntoIterator<Item = &'a Asteroid>) -> Vec<&'a Asteroid> {
    asteroids.into_iter().filter(|a| a.is_hazardous()).collect()
}
