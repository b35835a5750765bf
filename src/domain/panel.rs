// Panel identifiers and shell theme
use serde::{Deserialize, Serialize};

/// The closed set of panels the dashboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelKey {
    Telemetry,
    Iss,
    MarsWeather,
    Apod,
    Asteroids,
}

impl PanelKey {
    pub const ALL: [PanelKey; 5] = [
        PanelKey::Telemetry,
        PanelKey::Iss,
        PanelKey::MarsWeather,
        PanelKey::Apod,
        PanelKey::Asteroids,
    ];

    /// Resolve a navigation key. Unknown keys land on the telemetry panel.
    pub fn resolve(key: &str) -> Self {
        match key {
            "telemetry" => PanelKey::Telemetry,
            "iss" => PanelKey::Iss,
            "mars-weather" => PanelKey::MarsWeather,
            "apod" => PanelKey::Apod,
            "asteroids" => PanelKey::Asteroids,
            _ => PanelKey::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKey::Telemetry => "telemetry",
            PanelKey::Iss => "iss",
            PanelKey::MarsWeather => "mars-weather",
            PanelKey::Apod => "apod",
            PanelKey::Asteroids => "asteroids",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PanelKey::Telemetry => "Telemetry",
            PanelKey::Iss => "ISS Tracker",
            PanelKey::MarsWeather => "Mars Weather",
            PanelKey::Apod => "APOD Viewer",
            PanelKey::Asteroids => "Asteroids",
        }
    }
}

impl Default for PanelKey {
    fn default() -> Self {
        PanelKey::Telemetry
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Cosmic,
    Solar,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Cosmic => Theme::Solar,
            Theme::Solar => Theme::Cosmic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_keys() {
        for key in PanelKey::ALL {
            assert_eq!(PanelKey::resolve(key.as_str()), key);
        }
    }

    #[test]
    fn test_resolve_unknown_key_falls_back_to_telemetry() {
        assert_eq!(PanelKey::resolve("weather"), PanelKey::Telemetry);
        assert_eq!(PanelKey::resolve(""), PanelKey::Telemetry);
        assert_eq!(PanelKey::resolve("APOD"), PanelKey::Telemetry);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Cosmic.toggled(), Theme::Solar);
        assert_eq!(Theme::Solar.toggled().toggled(), Theme::Solar);
    }
}
