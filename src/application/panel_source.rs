// Source trait for panel data (remote providers and synthetic generators)
use crate::domain::error::PanelError;
use crate::domain::snapshot::DataOrigin;
use async_trait::async_trait;

#[async_trait]
pub trait PanelSource: Send + Sync {
    /// Query parameter the source is keyed on (a date, or `()` for none).
    type Param: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static;
    type Payload: Clone + Send + Sync + 'static;

    /// Short provider name for logs and error messages
    fn name(&self) -> &'static str;

    fn origin(&self) -> DataOrigin;

    /// Perform exactly one request or generation cycle
    async fn retrieve(&self, param: &Self::Param) -> Result<Self::Payload, PanelError>;
}
