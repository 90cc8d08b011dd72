use crate::domains::tracking_client::TrackingContext;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Type tag of every publish this tool registers.
pub const RENDERED_IMAGE: &str = "Rendered Image";

/// Entry asserting a rendered output at a path and version is a deliverable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRecord {
    pub context: TrackingContext,
    pub path: PathBuf,
    pub name: String,
    pub created_by: String,
    pub version_number: u32,
    pub published_file_type: String,
}
