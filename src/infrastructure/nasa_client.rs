// NASA open APIs - picture of the day and near-Earth object feed
use crate::application::panel_source::PanelSource;
use crate::domain::apod::ApodEntry;
use crate::domain::asteroid::{AsteroidFeed, NeoFeedResponse};
use crate::domain::error::PanelError;
use crate::domain::snapshot::DataOrigin;
use crate::infrastructure::http_client::JsonClient;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

const APOD_PATH: &str = "/planetary/apod";
const NEO_FEED_PATH: &str = "/neo/rest/v1/feed";

#[derive(Clone)]
pub struct NasaClient {
    http: JsonClient,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for NasaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NasaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl NasaClient {
    pub fn new(http: JsonClient, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        );
        for (name, value) in query {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    pub async fn apod(&self, date: NaiveDate) -> Result<ApodEntry, PanelError> {
        let url = self.url(APOD_PATH, &[("date", iso(date))]);
        self.http.get_json("APOD", &url, APOD_PATH).await
    }

    /// Objects with a close approach on `date` (start and end of the window).
    pub async fn neo_feed(&self, date: NaiveDate) -> Result<AsteroidFeed, PanelError> {
        let day = iso(date);
        let url = self.url(
            NEO_FEED_PATH,
            &[("start_date", day.clone()), ("end_date", day)],
        );
        let response: NeoFeedResponse = self.http.get_json("NEO feed", &url, NEO_FEED_PATH).await?;
        Ok(AsteroidFeed::from_response(date, response))
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone)]
pub struct ApodSource {
    client: NasaClient,
}

impl ApodSource {
    pub fn new(client: NasaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PanelSource for ApodSource {
    type Param = NaiveDate;
    type Payload = ApodEntry;

    fn name(&self) -> &'static str {
        "apod"
    }

    fn origin(&self) -> DataOrigin {
        DataOrigin::Remote
    }

    async fn retrieve(&self, date: &NaiveDate) -> Result<ApodEntry, PanelError> {
        self.client.apod(*date).await
    }
}

#[derive(Debug, Clone)]
pub struct NeoFeedSource {
    client: NasaClient,
}

impl NeoFeedSource {
    pub fn new(client: NasaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PanelSource for NeoFeedSource {
    type Param = NaiveDate;
    type Payload = AsteroidFeed;

    fn name(&self) -> &'static str {
        "asteroids"
    }

    fn origin(&self) -> DataOrigin {
        DataOrigin::Remote
    }

    async fn retrieve(&self, date: &NaiveDate) -> Result<AsteroidFeed, PanelError> {
        self.client.neo_feed(*date).await
    }
}
