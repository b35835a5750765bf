// HTTP request handlers
use crate::application::date_navigation::{parse_date, today, DateStep};
use crate::application::panel_controller::{PanelState, RefreshOutcome};
use crate::application::streaming_service::state_stream;
use crate::domain::error::PanelError;
use crate::domain::panel::{PanelKey, Theme};
use crate::domain::snapshot::Snapshot;
use crate::infrastructure::chunked_json::into_ndjson_response;
use crate::infrastructure::http_response::{accepts_brotli, json_response, json_response_with_status};
use crate::presentation::app_state::AppState;
use crate::presentation::render::{
    apod_view, asteroids_view, iss_view, mars_weather_view, render_panel, telemetry_view, PanelView,
};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Response, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct DateQuery {
    pub date: String,
}

#[derive(Serialize)]
struct PanelEntry {
    key: PanelKey,
    label: &'static str,
    active: bool,
}

#[derive(Serialize)]
struct SnapshotBody<'a, P, T> {
    panel: PanelKey,
    generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    param: Option<&'a P>,
    snapshot: &'a Snapshot<T>,
}

#[derive(Serialize)]
struct RefreshBody {
    panel: PanelKey,
    outcome: RefreshOutcome,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/panels", get(list_panels))
        .route("/shell", get(get_shell))
        .route("/shell/panel/:key", put(select_panel))
        .route("/shell/theme", post(toggle_theme))
        .route("/panels/:key", get(get_panel))
        .route("/panels/:key/snapshot", get(get_snapshot))
        .route("/panels/:key/stream", get(stream_panel))
        .route("/panels/:key/refresh", post(refresh_panel))
        .route("/panels/:key/date", put(set_date))
        .route("/panels/:key/date/:step", post(step_date))
        .with_state(state)
}

fn respond(result: Result<Response<Body>, StatusCode>) -> axum::response::Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Resource paths name panels exactly; only shell navigation falls back.
fn lookup(raw: &str) -> Result<PanelKey, StatusCode> {
    PanelKey::ALL
        .into_iter()
        .find(|key| key.as_str() == raw)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn error_response(error: PanelError, compress: bool) -> axum::response::Response {
    let status = match error {
        PanelError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_GATEWAY,
    };
    tracing::debug!(error = %error, "request rejected");
    respond(json_response_with_status(status, &json!({ "error": error.to_string() }), compress).await)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Navigation entries with the active one marked
pub async fn list_panels(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let active = state.dashboard.shell().await.active();
    let panels: Vec<PanelEntry> = PanelKey::ALL
        .into_iter()
        .map(|key| PanelEntry {
            key,
            label: key.label(),
            active: key == active,
        })
        .collect();
    respond(json_response(&panels, accepts_brotli(&headers)).await)
}

pub async fn get_shell(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let shell = state.dashboard.shell().await.view(Utc::now());
    respond(json_response(&shell, accepts_brotli(&headers)).await)
}

/// Select a panel. Unknown keys land on the default panel rather than 404.
pub async fn select_panel(
    Path(key): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    state.dashboard.select(&key).await;
    let shell = state.dashboard.shell().await.view(Utc::now());
    respond(json_response(&shell, accepts_brotli(&headers)).await)
}

pub async fn toggle_theme(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let theme: Theme = state.dashboard.toggle_theme().await;
    respond(json_response(&json!({ "theme": theme }), accepts_brotli(&headers)).await)
}

pub async fn get_panel(
    Path(key): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let key = match lookup(&key) {
        Ok(key) => key,
        Err(status) => return status.into_response(),
    };
    let view = render_panel(&state.dashboard, key);
    respond(json_response(&view, accepts_brotli(&headers)).await)
}

async fn snapshot_response<P: Serialize, T: Serialize>(
    panel: PanelKey,
    state: &PanelState<P, T>,
    compress: bool,
) -> axum::response::Response {
    let body = SnapshotBody {
        panel,
        generation: state.generation(),
        param: state.param(),
        snapshot: state.snapshot(),
    };
    respond(json_response(&body, compress).await)
}

/// Raw snapshot of a panel, payload included
pub async fn get_snapshot(
    Path(key): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let dashboard = &state.dashboard;
    match lookup(&key) {
        Ok(PanelKey::Telemetry) => {
            snapshot_response(PanelKey::Telemetry, &dashboard.telemetry.state(), compress).await
        }
        Ok(PanelKey::Iss) => snapshot_response(PanelKey::Iss, &dashboard.iss.state(), compress).await,
        Ok(PanelKey::MarsWeather) => {
            snapshot_response(PanelKey::MarsWeather, &dashboard.mars_weather.state(), compress).await
        }
        Ok(PanelKey::Apod) => snapshot_response(PanelKey::Apod, &dashboard.apod.state(), compress).await,
        Ok(PanelKey::Asteroids) => {
            snapshot_response(PanelKey::Asteroids, &dashboard.asteroids.state(), compress).await
        }
        Err(status) => status.into_response(),
    }
}

/// Stream rendered views of a panel, one JSON line per change
pub async fn stream_panel(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let dashboard = &state.dashboard;
    let views: BoxStream<'static, PanelView> = match lookup(&key) {
        Ok(PanelKey::Telemetry) => state_stream(dashboard.telemetry.subscribe())
            .map(|s| telemetry_view(&s))
            .boxed(),
        Ok(PanelKey::Iss) => state_stream(dashboard.iss.subscribe())
            .map(|s| iss_view(&s))
            .boxed(),
        Ok(PanelKey::MarsWeather) => state_stream(dashboard.mars_weather.subscribe())
            .map(|s| mars_weather_view(&s))
            .boxed(),
        Ok(PanelKey::Apod) => state_stream(dashboard.apod.subscribe())
            .map(|s| apod_view(&s, today()))
            .boxed(),
        Ok(PanelKey::Asteroids) => state_stream(dashboard.asteroids.subscribe())
            .map(|s| asteroids_view(&s))
            .boxed(),
        Err(status) => return status.into_response(),
    };
    into_ndjson_response(views)
}

/// Manual refresh; never shows a loading state
pub async fn refresh_panel(
    Path(key): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let key = match lookup(&key) {
        Ok(key) => key,
        Err(status) => return status.into_response(),
    };
    let outcome = state.dashboard.refresh(key).await;
    let body = RefreshBody { panel: key, outcome };
    respond(json_response(&body, accepts_brotli(&headers)).await)
}

/// Jump a date-keyed panel to `?date=YYYY-MM-DD`
pub async fn set_date(
    Path(key): Path<String>,
    Query(query): Query<DateQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let key = match lookup(&key) {
        Ok(key) => key,
        Err(status) => return status.into_response(),
    };
    let date = match parse_date(&query.date) {
        Ok(date) => date,
        Err(e) => return error_response(e, compress).await,
    };
    let change = match key {
        PanelKey::Apod => state.dashboard.set_apod_date(date).await,
        PanelKey::Asteroids => state.dashboard.set_asteroid_date(date).await,
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    match change {
        Ok(change) => respond(json_response(&change, compress).await),
        Err(e) => error_response(e, compress).await,
    }
}

/// Picture-of-the-day paging: previous, next, today, random
pub async fn step_date(
    Path((key, step)): Path<(String, DateStep)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    if lookup(&key) != Ok(PanelKey::Apod) {
        return StatusCode::NOT_FOUND.into_response();
    }
    match state.dashboard.step_apod_date(step).await {
        Ok(change) => respond(json_response(&change, compress).await),
        Err(e) => error_response(e, compress).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{eventually, fixture, serve, Fixture};
    use chrono::{Days, NaiveDate};
    use serde_json::Value;

    async fn start() -> (Fixture, String) {
        let fx = fixture();
        fx.dashboard.start().await;
        let router = routes(Arc::new(AppState {
            dashboard: fx.dashboard.clone(),
        }));
        let base = serve(router).await;
        (fx, base)
    }

    #[tokio::test]
    async fn test_health_and_panel_listing() {
        let (fx, base) = start().await;
        let client = reqwest::Client::new();

        let health = client.get(format!("{}/healthz", base)).send().await.unwrap();
        assert_eq!(health.text().await.unwrap(), "ok");

        let panels: Value = client
            .get(format!("{}/panels", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let panels = panels.as_array().unwrap();
        assert_eq!(panels.len(), 5);
        assert_eq!(panels[0]["key"], "telemetry");
        assert_eq!(panels[0]["active"], true);
        assert_eq!(panels[2]["key"], "mars-weather");
        fx.dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_select_unknown_panel_falls_back() {
        let (fx, base) = start().await;
        let client = reqwest::Client::new();

        let shell: Value = client
            .put(format!("{}/shell/panel/iss", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(shell["active"], "iss");

        let shell: Value = client
            .put(format!("{}/shell/panel/saturn", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(shell["active"], "telemetry");
        assert_eq!(shell["theme"], "cosmic");

        let theme: Value = client
            .post(format!("{}/shell/theme", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(theme["theme"], "solar");
        fx.dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_shell_reports_mission_clock() {
        let (fx, base) = start().await;
        let before = crate::application::shell::mission_day(Utc::now());

        let shell: Value = reqwest::get(format!("{}/shell", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let clock = shell["mission_time"].as_str().unwrap();
        assert_eq!(clock.len(), 8);
        assert!(clock
            .split(':')
            .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_digit())));
        let day = shell["mission_day"].as_i64().unwrap();
        assert!(day >= before && day <= before + 1, "mission day {}", day);
        assert_eq!(shell["active"], "telemetry");
        fx.dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_panel_resource_is_not_found() {
        let (fx, base) = start().await;
        let response = reqwest::get(format!("{}/panels/saturn", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        fx.dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_panel_view_and_snapshot() {
        let (fx, base) = start().await;
        let dashboard = fx.dashboard.clone();
        eventually(|| dashboard.telemetry.snapshot().is_ready()).await;

        let view: Value = reqwest::get(format!("{}/panels/telemetry", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["title"], "System Telemetry");
        assert_eq!(view["status"], "ready");
        assert_eq!(view["origin"], "remote");
        assert_eq!(view["badge"], "REAL-TIME DATA");

        let snapshot: Value = reqwest::get(format!("{}/panels/telemetry/snapshot", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(snapshot["snapshot"]["payload"]["cpu_usage"], 75.0);
        assert!(snapshot.get("param").is_none() || snapshot["param"].is_null());
        fx.dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_apod_navigation_rejects_future() {
        let (fx, base) = start().await;
        let client = reqwest::Client::new();

        let change: Value = client
            .post(format!("{}/panels/apod/date/previous", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
        assert_eq!(change["date"], yesterday.to_string());
        assert_eq!(change["moved"], true);
        assert_eq!(fx.dashboard.shell().await.active(), PanelKey::Apod);

        let response = client
            .post(format!("{}/panels/apod/date/today", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let response = client
            .post(format!("{}/panels/apod/date/next", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(fx.dashboard.apod.param(), Some(today()));

        let response = client
            .put(format!("{}/panels/apod/date?date=not-a-date", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);

        let response = client
            .post(format!("{}/panels/iss/date/next", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        fx.dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_asteroid_date_and_refresh() {
        let (fx, base) = start().await;
        let client = reqwest::Client::new();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let change: Value = client
            .put(format!("{}/panels/asteroids/date?date=2024-06-01", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(change["date"], "2024-06-01");

        let dashboard = fx.dashboard.clone();
        eventually(|| dashboard.asteroids.snapshot().is_ready()).await;
        assert_eq!(fx.dashboard.asteroids.param(), Some(date));

        let refresh: Value = client
            .post(format!("{}/panels/asteroids/refresh", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(refresh["outcome"], "applied");
        assert_eq!(fx.asteroids.calls(), 2);
        fx.dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_brotli_negotiation() {
        let (fx, base) = start().await;
        let response = reqwest::Client::new()
            .get(format!("{}/shell", base))
            .header("accept-encoding", "br")
            .send()
            .await
            .unwrap();
        assert_eq!(response.headers()["content-encoding"], "br");
        fx.dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_stream_emits_current_view_first() {
        let (fx, base) = start().await;
        let mut response = reqwest::get(format!("{}/panels/telemetry/stream", base))
            .await
            .unwrap();
        assert_eq!(response.headers()["content-type"], "application/x-ndjson");

        let mut buffered = Vec::new();
        while !buffered.contains(&b'\n') {
            let chunk = response.chunk().await.unwrap().unwrap();
            buffered.extend_from_slice(&chunk);
        }
        let line_end = buffered.iter().position(|b| *b == b'\n').unwrap();
        let first: Value = serde_json::from_slice(&buffered[..line_end]).unwrap();
        assert_eq!(first["panel"], "telemetry");
        fx.dashboard.shutdown().await;
    }
}
