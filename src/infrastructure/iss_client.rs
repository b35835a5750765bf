// ISS position feed
use crate::application::panel_source::PanelSource;
use crate::domain::error::PanelError;
use crate::domain::iss::{IssNowResponse, IssPosition};
use crate::domain::snapshot::DataOrigin;
use crate::infrastructure::http_client::JsonClient;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct IssSource {
    http: JsonClient,
    url: String,
}

impl IssSource {
    pub fn new(http: JsonClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PanelSource for IssSource {
    type Param = ();
    type Payload = IssPosition;

    fn name(&self) -> &'static str {
        "iss"
    }

    fn origin(&self) -> DataOrigin {
        DataOrigin::Remote
    }

    async fn retrieve(&self, _: &()) -> Result<IssPosition, PanelError> {
        let raw: IssNowResponse = self.http.get_json("ISS position", &self.url, &self.url).await?;
        IssPosition::try_from(raw)
    }
}
