use crate::models::args::Args;
use crate::KatanaError;
use serde::{Deserialize, Serialize};
use std::process::Command;
use tracing::info;
use uuid::Uuid;

/// Opens a terminal running a batch render so the artist can watch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Launcher {
    /// Terminal wrapper put in front of the toolchain prefix.
    pub terminal: String,
}

impl Default for Launcher {
    fn default() -> Self {
        Self {
            terminal: "mate-terminal".to_owned(),
        }
    }
}

/// Returned once the child process exists. The render itself is never awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchHandle {
    pub id: Uuid,
    pub pid: u32,
}

impl Launcher {
    pub fn new(terminal: impl Into<String>) -> Self {
        Self {
            terminal: terminal.into(),
        }
    }

    pub fn create_arg_list(&self, args: &Args) -> Vec<String> {
        let mut col = vec![self.terminal.clone()];
        col.extend(args.create_arg_list());
        col
    }

    /// Spawn the render and return right away. Exit status is not observed.
    pub fn launch(&self, args: &Args) -> Result<LaunchHandle, KatanaError> {
        let col = self.create_arg_list(args);
        let child = Command::new(&col[0])
            .args(&col[1..])
            .spawn()
            .map_err(|source| KatanaError::Spawn {
                program: self.terminal.clone(),
                source,
            })?;

        let handle = LaunchHandle {
            id: Uuid::new_v4(),
            pid: child.id(),
        };
        info!(
            pid = handle.pid,
            node = args.render_node(),
            range = %args.range(),
            "Launched local render"
        );
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{frame_range::FrameRange, toolchain::ToolchainConfig};

    fn args() -> Args {
        let toolchain = ToolchainConfig::default().resolve(None);
        Args::new(
            &toolchain,
            "/proj/.shot010.katana",
            "render_bty",
            FrameRange::new(1, 24).unwrap(),
        )
    }

    #[test]
    fn terminal_wraps_command_line() {
        let col = Launcher::default().create_arg_list(&args());
        assert_eq!(col[0], "mate-terminal");
        assert_eq!(col[1], "rez-env");
        assert_eq!(col[2], "katana-3.1v2");
        assert_eq!(col.last().unwrap(), "--t=1-24");
    }

    #[test]
    fn missing_terminal_is_spawn_error() {
        let launcher = Launcher::new("definitely-not-a-terminal-binary");
        assert!(matches!(
            launcher.launch(&args()),
            Err(KatanaError::Spawn { program, .. }) if program == "definitely-not-a-terminal-binary"
        ));
    }

    #[test]
    fn launch_returns_without_waiting() {
        let handle = Launcher::new("true").launch(&args()).unwrap();
        assert!(handle.pid > 0);
    }
}
