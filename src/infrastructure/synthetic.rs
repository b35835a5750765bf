// Synthetic panel sources - locally generated stand-ins for unavailable feeds
use crate::application::date_navigation::today;
use crate::application::panel_source::PanelSource;
use crate::domain::error::PanelError;
use crate::domain::mars_weather::{MarsWeather, TemperatureRange};
use crate::domain::snapshot::DataOrigin;
use crate::domain::telemetry::SystemMetrics;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

const SEASON: &str = "Late Northern Spring";

/// Fresh, independent Mars weather on every call. Nothing carries over
/// between readings.
pub struct MarsWeatherGenerator {
    rng: Mutex<StdRng>,
}

impl MarsWeatherGenerator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl Default for MarsWeatherGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_weather(rng: &mut impl Rng) -> MarsWeather {
    let mut band = |base: f64, width: f64| base + rng.random::<f64>() * width;
    let temperature = TemperatureRange {
        min: band(-85.0, 10.0),
        max: band(-15.0, 10.0),
        average: band(-50.0, 10.0),
    };
    let pressure = band(700.0, 100.0);
    let wind_speed = band(5.0, 15.0);
    MarsWeather {
        sol: 4000 + rng.random_range(0..100),
        temperature,
        pressure,
        wind_speed,
        season: SEASON.to_string(),
        earth_date: today(),
    }
}

#[async_trait]
impl PanelSource for MarsWeatherGenerator {
    type Param = ();
    type Payload = MarsWeather;

    fn name(&self) -> &'static str {
        "mars-weather"
    }

    fn origin(&self) -> DataOrigin {
        DataOrigin::Synthetic
    }

    async fn retrieve(&self, _: &()) -> Result<MarsWeather, PanelError> {
        let mut rng = self.rng.lock().await;
        Ok(generate_weather(&mut *rng))
    }
}

struct Walk {
    rng: StdRng,
    last: Option<SystemMetrics>,
}

/// Spacecraft system metrics as a bounded random walk. The first reading is
/// the nominal seed; the walk survives panel remounts.
pub struct TelemetryGenerator {
    walk: Mutex<Walk>,
}

impl TelemetryGenerator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            walk: Mutex::new(Walk { rng, last: None }),
        }
    }
}

impl Default for TelemetryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PanelSource for TelemetryGenerator {
    type Param = ();
    type Payload = SystemMetrics;

    fn name(&self) -> &'static str {
        "telemetry"
    }

    fn origin(&self) -> DataOrigin {
        DataOrigin::Synthetic
    }

    async fn retrieve(&self, _: &()) -> Result<SystemMetrics, PanelError> {
        let mut walk = self.walk.lock().await;
        let Walk { rng, last } = &mut *walk;
        let next = match last {
            Some(previous) => previous.drifted(|| rng.random::<f64>()),
            None => SystemMetrics::default(),
        };
        *last = Some(next);
        Ok(next)
    }
}
