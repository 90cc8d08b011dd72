pub mod error;
pub mod job;
pub mod publish;
pub mod task;
