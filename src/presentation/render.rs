// Panel views - turns panel state into cards, badges and progress values
use crate::application::dashboard_service::Dashboard;
use crate::application::date_navigation::{can_go_forward, today};
use crate::application::panel_controller::PanelState;
use crate::domain::apod::{ApodEntry, MediaType};
use crate::domain::asteroid::{filter_hazardous, rank, Asteroid, AsteroidFeed};
use crate::domain::iss::{format_coordinate, Axis, IssPosition, ORBITAL_FACTS};
use crate::domain::mars_weather::MarsWeather;
use crate::domain::panel::PanelKey;
use crate::domain::snapshot::{DataOrigin, Snapshot, SnapshotStatus};
use crate::domain::telemetry::{
    StatusLevel, SystemMetrics, DEFAULT_THRESHOLD, LATENCY_THRESHOLD, TEMPERATURE_THRESHOLD,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub panel: PanelKey,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub status: SnapshotStatus,
    pub origin: DataOrigin,
    /// Loading text while loading, the failure message once failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateView>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateView {
    pub selected: NaiveDate,
    pub label: String,
    pub can_go_forward: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub cards: Vec<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl Section {
    fn new(title: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            title: title.into(),
            cards,
            empty_message: None,
        }
    }

    fn when_empty(mut self, empty_message: &'static str) -> Self {
        if self.cards.is_empty() {
            self.empty_message = Some(empty_message);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// 0-100, for cards drawn as a gauge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<StatusLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Card {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            detail: None,
            progress: None,
            level: None,
            link: None,
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn gauge(mut self, progress: f64, level: StatusLevel) -> Self {
        self.progress = Some(progress.clamp(0.0, 100.0));
        self.level = Some(level);
        self
    }

    fn level(mut self, level: StatusLevel) -> Self {
        self.level = Some(level);
        self
    }

    fn link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }
}

pub fn title(key: PanelKey) -> &'static str {
    match key {
        PanelKey::Telemetry => "System Telemetry",
        PanelKey::Iss => "ISS Live Tracker",
        PanelKey::MarsWeather => "Mars Weather Station",
        PanelKey::Apod => "Astronomy Picture of the Day",
        PanelKey::Asteroids => "Near-Earth Asteroids",
    }
}

fn loading_message(key: PanelKey) -> &'static str {
    match key {
        PanelKey::Telemetry => "Acquiring system telemetry...",
        PanelKey::Iss => "Loading position data...",
        PanelKey::MarsWeather => "Loading Mars weather data...",
        PanelKey::Apod => "Loading cosmic imagery...",
        PanelKey::Asteroids => "Scanning for near-Earth objects...",
    }
}

/// Common frame: title, status and message come from the snapshot, the
/// body only renders when a payload is present.
fn frame<T>(
    key: PanelKey,
    snapshot: &Snapshot<T>,
    badge: impl FnOnce(Option<&T>) -> Option<String>,
    body: impl FnOnce(&T) -> Vec<Section>,
) -> PanelView {
    let message = match snapshot.status() {
        SnapshotStatus::Loading => Some(loading_message(key).to_string()),
        SnapshotStatus::Failed => snapshot.error_message().map(str::to_string),
        SnapshotStatus::Ready => None,
    };
    PanelView {
        panel: key,
        title: title(key),
        badge: badge(snapshot.payload()),
        status: snapshot.status(),
        origin: snapshot.origin(),
        message,
        updated_at: snapshot.fetched_at(),
        date: None,
        sections: snapshot.payload().map(body).unwrap_or_default(),
    }
}

pub fn telemetry_view(state: &PanelState<(), SystemMetrics>) -> PanelView {
    frame(
        PanelKey::Telemetry,
        state.snapshot(),
        |_| Some("REAL-TIME DATA".to_string()),
        |m| {
            let gauges = vec![
                Card::new("CPU Usage", format!("{:.1}%", m.cpu_usage)).gauge(
                    m.cpu_usage,
                    StatusLevel::classify(m.cpu_usage, DEFAULT_THRESHOLD),
                ),
                Card::new("Memory Usage", format!("{:.1}%", m.memory_usage)).gauge(
                    m.memory_usage,
                    StatusLevel::classify(m.memory_usage, DEFAULT_THRESHOLD),
                ),
                Card::new("Network Latency", format!("{:.0}ms", m.network_latency)).gauge(
                    (m.network_latency / 2.0).min(100.0),
                    StatusLevel::classify(m.network_latency, LATENCY_THRESHOLD),
                ),
                Card::new("Temperature", format!("{:.1}°F", m.temperature)).gauge(
                    m.temperature_gauge(),
                    StatusLevel::classify(m.temperature, TEMPERATURE_THRESHOLD),
                ),
            ];
            let health = vec![
                Card::new("Battery Level", format!("{:.0}%", m.battery_level)).gauge(
                    m.battery_level,
                    StatusLevel::Nominal,
                ),
                Card::new("Signal Strength", format!("{:.0}%", m.signal_strength)).gauge(
                    m.signal_strength,
                    StatusLevel::Nominal,
                ),
            ];
            vec![
                Section::new("Systems", gauges),
                Section::new("System Health Overview", health),
            ]
        },
    )
}

pub fn iss_view(state: &PanelState<(), IssPosition>) -> PanelView {
    frame(
        PanelKey::Iss,
        state.snapshot(),
        |_| Some("ORBITAL TRACKING".to_string()),
        |p| {
            let mut position = vec![
                Card::new("Latitude", format_coordinate(p.latitude, Axis::Latitude)),
                Card::new("Longitude", format_coordinate(p.longitude, Axis::Longitude)),
            ];
            if let Some(at) = p.observed_at() {
                position.push(Card::new("Last Updated", at.format("%H:%M:%S UTC").to_string()));
            }
            let track = p.ground_track();
            vec![
                Section::new("Current Position", position),
                Section::new(
                    "Orbital Data",
                    ORBITAL_FACTS
                        .iter()
                        .map(|(label, value)| Card::new(*label, *value))
                        .collect(),
                ),
                Section::new(
                    "Ground Track",
                    vec![Card::new(
                        "Map Position",
                        format!("{:.1}%, {:.1}%", track.x_percent, track.y_percent),
                    )],
                ),
            ]
        },
    )
}

pub fn mars_weather_view(state: &PanelState<(), MarsWeather>) -> PanelView {
    frame(
        PanelKey::MarsWeather,
        state.snapshot(),
        |w| w.map(|w| format!("SOL {}", w.sol)),
        |w| {
            let t = &w.temperature;
            vec![Section::new(
                "Current Conditions",
                vec![
                    Card::new("Temperature", format!("{:.1}°C", t.average)).detail(format!(
                        "{:.1}°F, High {:.1}°C, Low {:.1}°C",
                        w.average_fahrenheit(),
                        t.max,
                        t.min
                    )),
                    Card::new("Pressure", format!("{:.0} Pa", w.pressure))
                        .detail(format!("~{:.2} mmHg", w.pressure_mmhg())),
                    Card::new("Wind Speed", format!("{:.1} m/s", w.wind_speed))
                        .detail(format!("~{:.1} mph", w.wind_speed_mph())),
                    Card::new("Season", w.season.clone())
                        .detail(format!("Earth Date: {}", w.earth_date)),
                ],
            )]
        },
    )
}

pub fn apod_view(state: &PanelState<NaiveDate, ApodEntry>, today: NaiveDate) -> PanelView {
    let mut view = frame(
        PanelKey::Apod,
        state.snapshot(),
        |_| Some("NASA APOD".to_string()),
        |entry| {
            let media_label = match entry.media_type {
                MediaType::Video => "Video",
                _ => "Image",
            };
            let mut details = vec![
                Card::new("Date", entry.long_date()),
                Card::new("Media Type", entry.media_type.label()),
            ];
            if let Some(copyright) = &entry.copyright {
                details.push(Card::new("Copyright", format!("© {}", copyright.trim())));
            }
            vec![
                Section::new(
                    entry.title.clone(),
                    vec![Card::new(media_label, entry.url.clone()).link(entry.hdurl.clone())],
                ),
                Section::new(
                    "Description",
                    vec![Card::new("Explanation", entry.explanation.clone())],
                ),
                Section::new("Details", details),
            ]
        },
    );
    view.date = state.param().map(|selected| DateView {
        selected: *selected,
        label: selected.format("%A, %B %-d, %Y").to_string(),
        can_go_forward: can_go_forward(*selected, today),
    });
    view
}

fn asteroid_card(asteroid: &Asteroid) -> Card {
    let card = Card::new(asteroid.name.clone(), asteroid.distance_label()).detail(format!(
        "{}, {}, {}",
        asteroid.lunar_label(),
        asteroid.diameter_label(),
        asteroid.velocity_label()
    ));
    if asteroid.is_hazardous() {
        card.level(StatusLevel::Critical)
    } else {
        card
    }
}

pub fn asteroids_view(state: &PanelState<NaiveDate, AsteroidFeed>) -> PanelView {
    let mut view = frame(
        PanelKey::Asteroids,
        state.snapshot(),
        |feed| feed.map(|f| format!("{} DETECTED", f.asteroids.len())),
        |feed| {
            let summary = feed.summary();
            let ranked = rank(&feed.asteroids);
            let hazardous = filter_hazardous(ranked.iter().copied());
            vec![
                Section::new(
                    "Summary",
                    vec![
                        Card::new("Total Objects", summary.total.to_string()),
                        Card::new("Potentially Hazardous", summary.hazardous.to_string())
                            .level(if summary.hazardous > 0 {
                                StatusLevel::Critical
                            } else {
                                StatusLevel::Nominal
                            }),
                        Card::new("Closest Approach", summary.closest_approach),
                        Card::new(
                            "Observation Date",
                            feed.observation_date.format("%Y-%m-%d").to_string(),
                        ),
                    ],
                ),
                Section::new(
                    "All Near-Earth Objects",
                    ranked.iter().map(|a| asteroid_card(a)).collect(),
                )
                .when_empty("No asteroids detected for this date"),
                Section::new(
                    "Potentially Hazardous Objects",
                    hazardous.iter().map(|a| asteroid_card(a)).collect(),
                )
                .when_empty("All Clear"),
            ]
        },
    );
    view.date = state.param().map(|selected| DateView {
        selected: *selected,
        label: selected.format("%Y-%m-%d").to_string(),
        can_go_forward: true,
    });
    view
}

/// Render whichever panel `key` names from its current state.
pub fn render_panel(dashboard: &Dashboard, key: PanelKey) -> PanelView {
    match key {
        PanelKey::Telemetry => telemetry_view(&dashboard.telemetry.state()),
        PanelKey::Iss => iss_view(&dashboard.iss.state()),
        PanelKey::MarsWeather => mars_weather_view(&dashboard.mars_weather.state()),
        PanelKey::Apod => apod_view(&dashboard.apod.state(), today()),
        PanelKey::Asteroids => asteroids_view(&dashboard.asteroids.state()),
    }
}
