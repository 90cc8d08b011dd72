use crate::models::job::FarmJob;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum FarmError {
    #[error("Unable to reach the farm engine at {url}: {reason}")]
    Unreachable { url: String, reason: String },
    #[error("Farm engine rejected the job: {0}")]
    Rejected(String),
    #[error("Invalid engine address: {0}")]
    InvalidAddress(String),
}

/// Where a job gets spooled and who owns it on the farm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpoolTarget {
    pub host: String,
    pub port: u16,
    pub owner: String,
}

/// Receipt for a spooled job. Kept so callers can log it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionHandle {
    pub id: Uuid,
    pub title: String,
    /// Job id assigned by the engine, when its reply carried one.
    pub jid: Option<u64>,
    pub response: String,
}

pub trait FarmClient {
    /// Hand a fully formed job to the scheduler. Called exactly once per job.
    fn spool(&self, job: &FarmJob, target: &SpoolTarget) -> Result<SubmissionHandle, FarmError>;
}
