// Panel error taxonomy
use thiserror::Error;

/// Everything that can go wrong while a panel refreshes or navigates.
///
/// Messages are rendered inline in the panel, so they stay short and never
/// carry request URLs (the NASA key travels in the query string).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("{provider} is unreachable: {detail}")]
    Transport { provider: &'static str, detail: String },

    #[error("{provider} responded with status {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("malformed {provider} payload: {detail}")]
    Parse { provider: &'static str, detail: String },

    #[error("{0}")]
    Validation(String),
}

impl PanelError {
    pub fn parse(provider: &'static str, detail: impl Into<String>) -> Self {
        Self::Parse {
            provider,
            detail: detail.into(),
        }
    }
}
