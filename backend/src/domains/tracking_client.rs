use crate::models::publish::PublishRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Tracking request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("Unexpected tracking response: {0}")]
    Response(String),
    #[error("Unknown published file type: {0}")]
    UnknownPublishType(String),
    #[error("No tracking site configured, cannot {0}")]
    Offline(String),
}

/// Link to a tracking entity, e.g. the shot a scene belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLink {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
}

/// Who is submitting and for which project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingContext {
    pub user_display_name: String,
    pub user: Option<EntityLink>,
    pub project_name: String,
    pub project: Option<EntityLink>,
    pub entity: Option<EntityLink>,
}

/// A publish already known to the tracking system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishHandle {
    pub id: i64,
    pub path: PathBuf,
}

pub trait TrackingClient {
    fn context(&self) -> Result<TrackingContext, TrackingError>;

    /// Publish registered for this exact path, if any.
    fn find_publish(&self, path: &Path) -> Result<Option<PublishHandle>, TrackingError>;

    fn register_publish(&self, record: &PublishRecord) -> Result<PublishHandle, TrackingError>;
}
