// Spacecraft system telemetry domain model
use serde::Serialize;

/// One gauge's random-walk behaviour: maximum step and clamp band.
#[derive(Debug, Clone, Copy)]
struct Drift {
    span: f64,
    floor: f64,
    ceiling: f64,
}

impl Drift {
    const fn new(span: f64, floor: f64, ceiling: f64) -> Self {
        Self {
            span,
            floor,
            ceiling,
        }
    }

    fn apply(&self, value: f64, unit: f64) -> f64 {
        (value + (unit - 0.5) * self.span).clamp(self.floor, self.ceiling)
    }
}

const CPU: Drift = Drift::new(10.0, 0.0, 100.0);
const MEMORY: Drift = Drift::new(8.0, 0.0, 100.0);
const LATENCY: Drift = Drift::new(20.0, 10.0, 200.0);
const TEMPERATURE: Drift = Drift::new(4.0, 60.0, 80.0);
const BATTERY: Drift = Drift::new(2.0, 0.0, 100.0);
const SIGNAL: Drift = Drift::new(5.0, 0.0, 100.0);

pub const DEFAULT_THRESHOLD: f64 = 80.0;
pub const LATENCY_THRESHOLD: f64 = 100.0;
pub const TEMPERATURE_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemMetrics {
    /// Percent.
    pub cpu_usage: f64,
    /// Percent.
    pub memory_usage: f64,
    /// Milliseconds.
    pub network_latency: f64,
    /// Degrees Fahrenheit.
    pub temperature: f64,
    /// Percent.
    pub battery_level: f64,
    /// Percent.
    pub signal_strength: f64,
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self {
            cpu_usage: 75.0,
            memory_usage: 60.0,
            network_latency: 45.0,
            temperature: 68.0,
            battery_level: 85.0,
            signal_strength: 92.0,
        }
    }
}

impl SystemMetrics {
    /// Next reading of the random walk. `next_unit` must yield values in `[0, 1)`.
    pub fn drifted(&self, mut next_unit: impl FnMut() -> f64) -> Self {
        Self {
            cpu_usage: CPU.apply(self.cpu_usage, next_unit()),
            memory_usage: MEMORY.apply(self.memory_usage, next_unit()),
            network_latency: LATENCY.apply(self.network_latency, next_unit()),
            temperature: TEMPERATURE.apply(self.temperature, next_unit()),
            battery_level: BATTERY.apply(self.battery_level, next_unit()),
            signal_strength: SIGNAL.apply(self.signal_strength, next_unit()),
        }
    }

    /// Temperature mapped onto a 0-100 gauge over its 60-80 °F band.
    pub fn temperature_gauge(&self) -> f64 {
        (self.temperature - TEMPERATURE.floor) * 5.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Nominal,
    Warning,
    Critical,
}

impl StatusLevel {
    pub fn classify(value: f64, threshold: f64) -> Self {
        if value >= threshold {
            StatusLevel::Critical
        } else if value >= threshold * 0.7 {
            StatusLevel::Warning
        } else {
            StatusLevel::Nominal
        }
    }
}
