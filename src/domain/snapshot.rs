// Snapshot domain model - the latest result of a panel refresh
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::PanelError;

/// Where a snapshot's payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Remote,
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    Loading,
    Ready,
    Failed,
}

/// Immutable record of one fetch/generation cycle.
///
/// `payload` is present only when Ready and `error_message` only when
/// Failed. Snapshots are always replaced whole, never merged.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<T> {
    status: SnapshotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    origin: DataOrigin,
    fetched_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    pub fn loading(origin: DataOrigin) -> Self {
        Self {
            status: SnapshotStatus::Loading,
            payload: None,
            error_message: None,
            origin,
            fetched_at: Utc::now(),
        }
    }

    pub fn ready(payload: T, origin: DataOrigin) -> Self {
        Self {
            status: SnapshotStatus::Ready,
            payload: Some(payload),
            error_message: None,
            origin,
            fetched_at: Utc::now(),
        }
    }

    pub fn failed(message: impl Into<String>, origin: DataOrigin) -> Self {
        Self {
            status: SnapshotStatus::Failed,
            payload: None,
            error_message: Some(message.into()),
            origin,
            fetched_at: Utc::now(),
        }
    }

    pub fn from_result(result: Result<T, PanelError>, origin: DataOrigin) -> Self {
        match result {
            Ok(payload) => Self::ready(payload, origin),
            Err(e) => Self::failed(e.to_string(), origin),
        }
    }

    pub fn status(&self) -> SnapshotStatus {
        self.status
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.status == SnapshotStatus::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.status == SnapshotStatus::Ready
    }

    #[cfg(test)]
    pub fn is_failed(&self) -> bool {
        self.status == SnapshotStatus::Failed
    }
}
