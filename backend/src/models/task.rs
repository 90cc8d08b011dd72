use katana::models::args::Args;
use katana::models::frame_range::Frame;
use serde::{Deserialize, Serialize};

/// Single frame unit of work inside a farm job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmTask {
    /// Frame number as text, this is what the farm monitor shows.
    pub title: String,
    pub frame: Frame,
    pub command: Args,
}

impl FarmTask {
    /// Scope the aggregate command line down to `frame`.
    pub fn for_frame(command: &Args, frame: Frame) -> Self {
        Self {
            title: frame.to_string(),
            frame,
            command: command.for_frame(frame),
        }
    }

    pub fn argv(&self) -> Vec<String> {
        self.command.create_arg_list()
    }
}
