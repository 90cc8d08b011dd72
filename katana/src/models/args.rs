use crate::models::{frame_range::FrameRange, toolchain::Toolchain};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// katana --batch --katana-file=<file> --render-node=<node> --t=<start>-<end>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Args {
    toolchain: Toolchain,
    file: PathBuf,        // the staged scene, never the live one
    render_node: String,
    range: FrameRange,
}

impl Args {
    pub fn new(
        toolchain: &Toolchain,
        file: impl AsRef<Path>,
        render_node: impl Into<String>,
        range: FrameRange,
    ) -> Self {
        Self {
            toolchain: toolchain.clone(),
            file: file.as_ref().to_path_buf(),
            render_node: render_node.into(),
            range,
        }
    }

    /// Same invocation scoped to a single frame. Farm tasks only differ in this flag.
    pub fn for_frame(&self, frame: i32) -> Self {
        Self {
            range: FrameRange::single(frame),
            ..self.clone()
        }
    }

    pub fn range(&self) -> &FrameRange {
        &self.range
    }

    pub fn render_node(&self) -> &str {
        &self.render_node
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn create_arg_list(&self) -> Vec<String> {
        let mut col = self.toolchain.prefix();
        col.push("--batch".to_owned());
        col.push(format!("--katana-file={}", self.file.display()));
        col.push(format!("--render-node={}", self.render_node));
        // frame range goes last
        col.push(self.range.to_flag());
        col
    }
}
