use super::task::FarmTask;
use katana::models::{args::Args, frame_range::FrameRange};
use serde::{Deserialize, Serialize};

/// Farm service key every job is routed to.
pub const SERVICE: &str = "Linux64";
pub const PRIORITY: u32 = 50;

/// One farm submission: a render node across the whole frame range, one task per frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmJob {
    pub title: String,
    pub service: String,
    pub priority: u32,
    tasks: Vec<FarmTask>,
}

impl FarmJob {
    /// Split `command` into one task per frame of `range`, ascending.
    pub fn new(title: impl Into<String>, command: &Args, range: &FrameRange) -> Self {
        let tasks = range
            .frames()
            .map(|frame| FarmTask::for_frame(command, frame))
            .collect();

        Self {
            title: title.into(),
            service: SERVICE.to_owned(),
            priority: PRIORITY,
            tasks,
        }
    }

    pub fn tasks(&self) -> &[FarmTask] {
        &self.tasks
    }
}

/// `[user] [project] [scene] [node] [start - end]`
pub fn job_title(
    user: &str,
    project: &str,
    scene: &str,
    render_node: &str,
    range: &FrameRange,
) -> String {
    let range = range.to_string();
    format!("[{}]", [user, project, scene, render_node, &range].join("] ["))
}

#[cfg(test)]
mod tests {
    use super::*;
    use katana::models::toolchain::ToolchainConfig;

    #[test]
    fn title_layout() {
        let range = FrameRange::new(1001, 1010).unwrap();
        assert_eq!(
            job_title("west", "showA", "shot010", "render_bty", &range),
            "[west] [showA] [shot010] [render_bty] [1001 - 1010]"
        );
    }

    #[test]
    fn one_task_per_frame() {
        let toolchain = ToolchainConfig::default().resolve(None);
        let range = FrameRange::new(1001, 1010).unwrap();
        let command = Args::new(&toolchain, "/proj/.shot010.katana", "render_bty", range);
        let job = FarmJob::new("title", &command, &range);
        assert_eq!(job.service, "Linux64");
        assert_eq!(job.priority, 50);

        assert_eq!(job.tasks().len(), 10);
        let titles = job.tasks().iter().map(|t| t.title.as_str()).collect::<Vec<_>>();
        assert_eq!(
            titles,
            vec!["1001", "1002", "1003", "1004", "1005", "1006", "1007", "1008", "1009", "1010"]
        );

        let aggregate = command.create_arg_list();
        for task in job.tasks() {
            let argv = task.argv();
            assert_eq!(argv[..argv.len() - 1], aggregate[..aggregate.len() - 1]);
            assert_eq!(
                argv.last().unwrap(),
                &format!("--t={0}-{0}", task.frame)
            );
        }
    }

    #[test]
    fn single_frame_job() {
        let toolchain = ToolchainConfig::default().resolve(None);
        let range = FrameRange::single(7);
        let command = Args::new(&toolchain, "/proj/.a.katana", "render_bty", range);
        let job = FarmJob::new("t", &command, &range);
        assert_eq!(job.tasks().len(), 1);
        assert_eq!(job.tasks()[0].title, "7");
    }
}
