use crate::KatanaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub type Frame = i32;

/// Inclusive range of frames to render. Start is never greater than end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRange {
    start: Frame,
    end: Frame,
}

impl FrameRange {
    pub fn new(start: Frame, end: Frame) -> Result<Self, KatanaError> {
        if start > end {
            return Err(KatanaError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one frame.
    pub fn single(frame: Frame) -> Self {
        Self {
            start: frame,
            end: frame,
        }
    }

    /// Parse the range from the two text fields the artist can edit.
    /// No correction is attempted, anything that isn't an integer is rejected.
    pub fn parse(start: &str, end: &str) -> Result<Self, KatanaError> {
        let start = parse_frame(start)?;
        let end = parse_frame(end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> Frame {
        self.start
    }

    pub fn end(&self) -> Frame {
        self.end
    }

    pub fn frames(&self) -> RangeInclusive<Frame> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start) + 1) as usize
    }

    // never empty, a range holds at least one frame
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value of katana's `--t=` flag.
    pub fn to_flag(&self) -> String {
        format!("--t={}-{}", self.start, self.end)
    }
}

// python's int() tolerates surrounding whitespace, so do we.
fn parse_frame(text: &str) -> Result<Frame, KatanaError> {
    text.trim()
        .parse::<Frame>()
        .map_err(|_| KatanaError::Parse(text.to_owned()))
}

// used as the last segment of the farm job title
impl fmt::Display for FrameRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
