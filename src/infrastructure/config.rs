use crate::application::dashboard_service::RefreshIntervals;
use anyhow::Context;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

const CONFIG_FILE: &str = "config/mission_control";
const ENV_PREFIX: &str = "MISSION_CONTROL";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub nasa: NasaSettings,
    pub iss: IssSettings,
    pub refresh: RefreshSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Deserialize, Clone)]
pub struct NasaSettings {
    pub base_url: String,
    pub api_key: String,
}

// The key must never reach logs.
impl fmt::Debug for NasaSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NasaSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IssSettings {
    pub url: String,
}

/// Seconds between background refreshes; 0 turns the timer off.
#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    pub iss_secs: u64,
    pub mars_weather_secs: u64,
    pub telemetry_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn period(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl From<&RefreshSettings> for RefreshIntervals {
    fn from(settings: &RefreshSettings) -> Self {
        Self {
            telemetry: period(settings.telemetry_secs),
            iss: period(settings.iss_secs),
            mars_weather: period(settings.mars_weather_secs),
        }
    }
}

/// Defaults, then `config/mission_control.*` if present, then
/// `MISSION_CONTROL__SECTION__KEY` environment variables.
pub fn load_config() -> anyhow::Result<AppConfig> {
    build(config::File::with_name(CONFIG_FILE).required(false))
}

fn build<S>(file: S) -> anyhow::Result<AppConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("nasa.base_url", "https://api.nasa.gov")?
        .set_default("nasa.api_key", "DEMO_KEY")?
        .set_default("iss.url", "https://api.open-notify.org/iss-now.json")?
        .set_default("refresh.iss_secs", 10)?
        .set_default("refresh.mars_weather_secs", 30)?
        .set_default("refresh.telemetry_secs", 2)?
        .set_default("http.timeout_secs", 10)?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to assemble configuration")?;

    let config: AppConfig = settings
        .try_deserialize()
        .context("configuration has missing or mistyped keys")?;

    if config.nasa.api_key.trim().is_empty() {
        anyhow::bail!("nasa.api_key must not be empty");
    }
    if config.http.timeout_secs == 0 {
        anyhow::bail!("http.timeout_secs must be positive");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn test_defaults() {
        let config = build(File::from_str("", FileFormat::Toml)).unwrap();
        assert_eq!(config.nasa.base_url, "https://api.nasa.gov");
        assert_eq!(config.refresh.iss_secs, 10);
        assert_eq!(config.http.timeout(), Duration::from_secs(10));

        let intervals = RefreshIntervals::from(&config.refresh);
        assert_eq!(intervals, RefreshIntervals::default());
    }

    #[test]
    fn test_file_overrides_and_zero_disables_timer() {
        let toml = r#"
            [nasa]
            api_key = "abc123"

            [refresh]
            mars_weather_secs = 0
        "#;
        let config = build(File::from_str(toml, FileFormat::Toml)).unwrap();
        assert_eq!(config.nasa.api_key, "abc123");

        let intervals = RefreshIntervals::from(&config.refresh);
        assert_eq!(intervals.mars_weather, None);
        assert_eq!(intervals.iss, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = NasaSettings {
            base_url: "https://api.nasa.gov".to_string(),
            api_key: "super-secret".to_string(),
        };
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        let toml = "[nasa]\napi_key = \"  \"\n";
        assert!(build(File::from_str(toml, FileFormat::Toml)).is_err());
    }
}
