// Shared fixtures for unit tests
use crate::application::dashboard_service::{Dashboard, PanelSources, RefreshIntervals};
use crate::application::panel_source::PanelSource;
use crate::domain::apod::{ApodEntry, MediaType};
use crate::domain::asteroid::AsteroidFeed;
use crate::domain::error::PanelError;
use crate::domain::iss::IssPosition;
use crate::domain::mars_weather::{MarsWeather, TemperatureRange};
use crate::domain::snapshot::DataOrigin;
use crate::domain::telemetry::SystemMetrics;
use async_trait::async_trait;
use axum::Router;
use chrono::NaiveDate;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Source that builds its payload from the parameter and counts calls.
pub struct FnSource<P, T> {
    make: fn(&P) -> T,
    calls: AtomicUsize,
    _param: PhantomData<fn(P)>,
}

impl<P, T> FnSource<P, T> {
    pub fn new(make: fn(&P) -> T) -> Arc<Self> {
        Arc::new(Self {
            make,
            calls: AtomicUsize::new(0),
            _param: PhantomData,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P, T> PanelSource for FnSource<P, T>
where
    P: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    type Param = P;
    type Payload = T;

    fn name(&self) -> &'static str {
        "fixture"
    }

    fn origin(&self) -> DataOrigin {
        DataOrigin::Remote
    }

    async fn retrieve(&self, param: &P) -> Result<T, PanelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((self.make)(param))
    }
}

pub fn apod_entry(date: &NaiveDate) -> ApodEntry {
    ApodEntry {
        date: *date,
        title: format!("Sky on {}", date),
        explanation: "Stars.".to_string(),
        url: "https://apod.example/image.jpg".to_string(),
        hdurl: Some("https://apod.example/image_hd.jpg".to_string()),
        media_type: MediaType::Image,
        copyright: Some("A. Astronomer".to_string()),
    }
}

pub fn asteroid_feed(date: &NaiveDate) -> AsteroidFeed {
    use crate::domain::asteroid::tests::asteroid;
    AsteroidFeed {
        observation_date: *date,
        asteroids: vec![
            asteroid("3542519", Some("2500000"), false),
            asteroid("2465633", Some("500000"), true),
        ],
    }
}

pub fn iss_position(_: &()) -> IssPosition {
    IssPosition {
        latitude: 51.5074,
        longitude: -0.1278,
        timestamp: 1_700_000_000,
    }
}

pub fn mars_weather(_: &()) -> MarsWeather {
    MarsWeather {
        sol: 4042,
        temperature: TemperatureRange {
            min: -80.0,
            max: -10.0,
            average: -45.0,
        },
        pressure: 750.0,
        wind_speed: 10.0,
        season: "Late Northern Spring".to_string(),
        earth_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    }
}

pub struct Fixture {
    pub dashboard: Arc<Dashboard>,
    pub telemetry: Arc<FnSource<(), SystemMetrics>>,
    pub iss: Arc<FnSource<(), IssPosition>>,
    pub apod: Arc<FnSource<NaiveDate, ApodEntry>>,
    pub asteroids: Arc<FnSource<NaiveDate, AsteroidFeed>>,
}

pub fn fixture() -> Fixture {
    let telemetry = FnSource::new(|_: &()| SystemMetrics::default());
    let iss = FnSource::new(iss_position);
    let apod = FnSource::new(apod_entry);
    let asteroids = FnSource::new(asteroid_feed);
    let sources = PanelSources {
        telemetry: telemetry.clone(),
        iss: iss.clone(),
        mars_weather: FnSource::new(mars_weather),
        apod: apod.clone(),
        asteroids: asteroids.clone(),
    };
    Fixture {
        dashboard: Arc::new(Dashboard::new(sources, RefreshIntervals::default())),
        telemetry,
        iss,
        apod,
        asteroids,
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

/// Wait until `check` holds, polling every few milliseconds.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}
