// Shell - active panel and theme selection
use crate::domain::panel::{PanelKey, Theme};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Shell {
    active: PanelKey,
    theme: Theme,
}

impl Shell {
    pub fn active(&self) -> PanelKey {
        self.active
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Make `key` the active panel and return the one it replaced.
    pub fn activate(&mut self, key: PanelKey) -> PanelKey {
        std::mem::replace(&mut self.active, key)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Shell state plus the mission clock as of `now`.
    pub fn view(&self, now: DateTime<Utc>) -> ShellView {
        ShellView {
            active: self.active(),
            theme: self.theme(),
            mission_time: mission_time(now),
            mission_day: mission_day(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellView {
    pub active: PanelKey,
    pub theme: Theme,
    pub mission_time: String,
    pub mission_day: i64,
}

/// UTC wall clock as `HH:MM:SS`.
pub fn mission_time(now: DateTime<Utc>) -> String {
    now.format("%H:%M:%S").to_string()
}

/// Days since the mission epoch (2024-01-01 UTC), rounded up. Any part of a
/// day counts, so the epoch itself is day 0 and one second later is day 1.
pub fn mission_day(now: DateTime<Utc>) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::UNIX_EPOCH);
    let elapsed = (now - epoch).num_milliseconds();
    -(-elapsed).div_euclid(DAY_MS)
}
