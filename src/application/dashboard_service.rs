// Dashboard service - owns every panel controller and the shell
use crate::application::date_navigation::{self, DateStep};
use crate::application::panel_controller::{PanelController, RefreshOutcome};
use crate::application::panel_source::PanelSource;
use crate::application::shell::Shell;
use crate::domain::apod::ApodEntry;
use crate::domain::asteroid::AsteroidFeed;
use crate::domain::error::PanelError;
use crate::domain::iss::IssPosition;
use crate::domain::mars_weather::MarsWeather;
use crate::domain::panel::{PanelKey, Theme};
use crate::domain::telemetry::SystemMetrics;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub type TelemetryPanel = PanelController<(), SystemMetrics>;
pub type IssPanel = PanelController<(), IssPosition>;
pub type MarsWeatherPanel = PanelController<(), MarsWeather>;
pub type ApodPanel = PanelController<NaiveDate, ApodEntry>;
pub type AsteroidsPanel = PanelController<NaiveDate, AsteroidFeed>;

/// Data sources for every panel, remote or synthetic.
pub struct PanelSources {
    pub telemetry: Arc<dyn PanelSource<Param = (), Payload = SystemMetrics>>,
    pub iss: Arc<dyn PanelSource<Param = (), Payload = IssPosition>>,
    pub mars_weather: Arc<dyn PanelSource<Param = (), Payload = MarsWeather>>,
    pub apod: Arc<dyn PanelSource<Param = NaiveDate, Payload = ApodEntry>>,
    pub asteroids: Arc<dyn PanelSource<Param = NaiveDate, Payload = AsteroidFeed>>,
}

/// Polling periods for the self-refreshing panels. `None` disables the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshIntervals {
    pub telemetry: Option<Duration>,
    pub iss: Option<Duration>,
    pub mars_weather: Option<Duration>,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self {
            telemetry: Some(Duration::from_secs(2)),
            iss: Some(Duration::from_secs(10)),
            mars_weather: Some(Duration::from_secs(30)),
        }
    }
}

/// Outcome of a date navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateChange {
    pub date: NaiveDate,
    pub moved: bool,
}

/// Only the active panel is mounted: selecting a panel starts its controller
/// and stops the one it replaces. Switching away and back is therefore also
/// a way to retry a failed panel.
pub struct Dashboard {
    pub telemetry: TelemetryPanel,
    pub iss: IssPanel,
    pub mars_weather: MarsWeatherPanel,
    pub apod: ApodPanel,
    pub asteroids: AsteroidsPanel,
    shell: Mutex<Shell>,
}

impl Dashboard {
    pub fn new(sources: PanelSources, intervals: RefreshIntervals) -> Self {
        Self {
            telemetry: PanelController::new(sources.telemetry, intervals.telemetry),
            iss: PanelController::new(sources.iss, intervals.iss),
            mars_weather: PanelController::new(sources.mars_weather, intervals.mars_weather),
            apod: PanelController::new(sources.apod, None),
            asteroids: PanelController::new(sources.asteroids, None),
            shell: Mutex::new(Shell::default()),
        }
    }

    /// Mount whichever panel the shell starts on.
    pub async fn start(&self) {
        let active = self.shell.lock().await.active();
        self.mount(active).await;
    }

    pub async fn shell(&self) -> Shell {
        *self.shell.lock().await
    }

    /// Select a panel by navigation key; unknown keys fall back to the default panel.
    pub async fn select(&self, raw_key: &str) -> PanelKey {
        let key = PanelKey::resolve(raw_key);
        let mut shell = self.shell.lock().await;
        self.switch_to(&mut shell, key).await;
        key
    }

    pub async fn toggle_theme(&self) -> Theme {
        let theme = self.shell.lock().await.toggle_theme();
        tracing::info!(?theme, "theme toggled");
        theme
    }

    /// Manual refresh of one panel.
    pub async fn refresh(&self, key: PanelKey) -> RefreshOutcome {
        match key {
            PanelKey::Telemetry => self.telemetry.tick().await,
            PanelKey::Iss => self.iss.tick().await,
            PanelKey::MarsWeather => self.mars_weather.tick().await,
            PanelKey::Apod => self.apod.tick().await,
            PanelKey::Asteroids => self.asteroids.tick().await,
        }
    }

    pub async fn step_apod_date(&self, step: DateStep) -> Result<DateChange, PanelError> {
        self.change_date(PanelKey::Apod, &self.apod, |current| {
            date_navigation::resolve(current, step, date_navigation::today(), &mut rand::rng())
        })
        .await
    }

    pub async fn set_apod_date(&self, date: NaiveDate) -> Result<DateChange, PanelError> {
        self.change_date(PanelKey::Apod, &self.apod, |_| {
            date_navigation::not_after_today(date, date_navigation::today())
        })
        .await
    }

    pub async fn set_asteroid_date(&self, date: NaiveDate) -> Result<DateChange, PanelError> {
        self.change_date(PanelKey::Asteroids, &self.asteroids, |_| Ok(date))
            .await
    }

    /// Stop every panel's polling task.
    pub async fn shutdown(&self) {
        for key in PanelKey::ALL {
            self.unmount(key).await;
        }
    }

    /// Move a date-keyed panel to the date `pick` derives from its current one.
    /// A rejected pick leaves both the panel and the shell untouched.
    async fn change_date<T>(
        &self,
        key: PanelKey,
        controller: &PanelController<NaiveDate, T>,
        pick: impl FnOnce(NaiveDate) -> Result<NaiveDate, PanelError> + Send,
    ) -> Result<DateChange, PanelError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut shell = self.shell.lock().await;
        let today = date_navigation::today();
        // An unmounted panel comes back on today's date.
        let mounted = shell.active() == key && controller.is_running().await;
        let current = match controller.param() {
            Some(param) if mounted => param,
            _ => today,
        };
        let target = pick(current)?;

        if shell.active() != key {
            let previous = shell.activate(key);
            self.unmount(previous).await;
        }
        if target != current || !mounted {
            controller.on_parameter_change(target).await;
        }

        Ok(DateChange {
            date: target,
            moved: target != current,
        })
    }

    async fn switch_to(&self, shell: &mut Shell, key: PanelKey) {
        let previous = shell.activate(key);
        if previous == key && self.is_mounted(key).await {
            return;
        }
        if previous != key {
            self.unmount(previous).await;
            tracing::info!(from = previous.as_str(), to = key.as_str(), "panel selected");
        }
        self.mount(key).await;
    }

    async fn is_mounted(&self, key: PanelKey) -> bool {
        match key {
            PanelKey::Telemetry => self.telemetry.is_running().await,
            PanelKey::Iss => self.iss.is_running().await,
            PanelKey::MarsWeather => self.mars_weather.is_running().await,
            PanelKey::Apod => self.apod.is_running().await,
            PanelKey::Asteroids => self.asteroids.is_running().await,
        }
    }

    async fn mount(&self, key: PanelKey) {
        let today = date_navigation::today();
        match key {
            PanelKey::Telemetry => self.telemetry.start(()).await,
            PanelKey::Iss => self.iss.start(()).await,
            PanelKey::MarsWeather => self.mars_weather.start(()).await,
            PanelKey::Apod => self.apod.start(today).await,
            PanelKey::Asteroids => self.asteroids.start(today).await,
        };
    }

    async fn unmount(&self, key: PanelKey) {
        match key {
            PanelKey::Telemetry => self.telemetry.stop().await,
            PanelKey::Iss => self.iss.stop().await,
            PanelKey::MarsWeather => self.mars_weather.stop().await,
            PanelKey::Apod => self.apod.stop().await,
            PanelKey::Asteroids => self.asteroids.stop().await,
        }
    }
}
