// error raised by every fallible call in this crate
pub mod error;

// node graph access and the selection changed notification
pub mod host;

// terminal launcher for interactive renders
pub mod katana;

// data handed around between the host and the command line
pub mod models;

pub use error::KatanaError;
