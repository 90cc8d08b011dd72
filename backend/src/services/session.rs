/*
    The output dialog without its widgets. It keeps the two frame text fields and the
    render nodes picked in the node graph, and follows the selection until it is closed.
    Every action consumes the session: once the render or submission is dispatched the
    dialog is gone, whether or not anything downstream later fails.
*/
use super::assembler::JobAssembler;
use super::publisher::{PublishOutcome, Publisher};
use crate::domains::farm_client::{FarmClient, SpoolTarget, SubmissionHandle};
use crate::domains::tracking_client::TrackingClient;
use crate::models::error::OutputError;
use katana::host::{Host, SelectionEvents, SubscriptionId};
use katana::katana::{LaunchHandle, Launcher};
use katana::models::frame_range::FrameRange;
use katana::models::render_target::{eligible_targets, NodeInfo, RenderTarget};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};

/// Collaborators needed by a farm submission.
pub struct FarmSubmit<'a> {
    pub farm: &'a dyn FarmClient,
    pub spool: &'a SpoolTarget,
    pub tracking: &'a dyn TrackingClient,
    pub publisher: &'a Publisher,
}

#[derive(Debug, Default)]
pub struct SubmitReport {
    pub submissions: Vec<SubmissionHandle>,
    pub publishes: Vec<PublishOutcome>,
}

pub struct OutputSession {
    start_frame: String,
    end_frame: String,
    publish: bool,
    targets: Rc<RefCell<Vec<RenderTarget>>>,
    subscription: SubscriptionId,
}

impl OutputSession {
    /// Fill the frame fields from the working range and start following the selection.
    pub fn open(host: &dyn Host, events: &mut SelectionEvents) -> Self {
        let (start, end) = host.working_range();
        let targets = Rc::new(RefCell::new(eligible_targets(&host.selected_nodes())));

        let shared = targets.clone();
        let subscription = events.subscribe(Box::new(move |nodes: &[NodeInfo]| {
            let eligible = eligible_targets(nodes);
            debug!(count = eligible.len(), "Selection changed");
            *shared.borrow_mut() = eligible;
        }));

        Self {
            start_frame: start.to_string(),
            end_frame: end.to_string(),
            publish: false,
            targets,
            subscription,
        }
    }

    pub fn start_frame(&self) -> &str {
        &self.start_frame
    }

    pub fn end_frame(&self) -> &str {
        &self.end_frame
    }

    pub fn set_start_frame(&mut self, text: impl Into<String>) {
        self.start_frame = text.into();
    }

    pub fn set_end_frame(&mut self, text: impl Into<String>) {
        self.end_frame = text.into();
    }

    /// Toggle registering rendered outputs with the tracking system after a farm submit.
    pub fn set_publish(&mut self, publish: bool) {
        self.publish = publish;
    }

    pub fn targets(&self) -> Vec<RenderTarget> {
        self.targets.borrow().clone()
    }

    pub fn frame_range(&self) -> Result<FrameRange, OutputError> {
        Ok(FrameRange::parse(&self.start_frame, &self.end_frame)?)
    }

    /// Stop following the selection.
    pub fn close(self, events: &mut SelectionEvents) {
        events.unsubscribe(self.subscription);
    }

    pub fn render_local(
        self,
        host: &dyn Host,
        events: &mut SelectionEvents,
        assembler: &JobAssembler,
        launcher: &Launcher,
    ) -> Result<Vec<LaunchHandle>, OutputError> {
        let targets = self.targets();
        let result = match self.frame_range() {
            Ok(_) if targets.is_empty() => {
                info!("No render node selected, nothing to render");
                Ok(Vec::new())
            }
            Ok(range) => assembler.render_local(launcher, &host.scene_file(), &targets, range),
            Err(e) => Err(e),
        };
        self.close(events);
        result
    }

    pub fn submit_to_farm(
        self,
        host: &dyn Host,
        events: &mut SelectionEvents,
        assembler: &JobAssembler,
        submit: &FarmSubmit<'_>,
    ) -> Result<SubmitReport, OutputError> {
        let result = self.dispatch(host, assembler, submit);
        self.close(events);
        result
    }

    fn dispatch(
        &self,
        host: &dyn Host,
        assembler: &JobAssembler,
        submit: &FarmSubmit<'_>,
    ) -> Result<SubmitReport, OutputError> {
        let range = self.frame_range()?;
        let targets = self.targets();
        if targets.is_empty() {
            info!("No render node selected, nothing to submit");
            return Ok(SubmitReport::default());
        }

        let scene_file = host.scene_file();
        let context = submit.tracking.context()?;
        let submissions = assembler.submit(
            submit.farm,
            submit.spool,
            &context,
            &scene_file,
            &targets,
            range,
        )?;

        let publishes = if self.publish {
            submit
                .publisher
                .publish(submit.tracking, &context, &scene_file, &targets)?
        } else {
            Vec::new()
        };

        Ok(SubmitReport {
            submissions,
            publishes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PublishSettings;
    use crate::domains::farm_client::FarmError;
    use crate::domains::tracking_client::{PublishHandle, TrackingContext, TrackingError};
    use crate::models::job::FarmJob;
    use crate::models::publish::PublishRecord;
    use katana::host::StaticHost;
    use katana::models::outputs::RenderOutputs;
    use katana::models::toolchain::ToolchainConfig;
    use std::fs;
    use std::path::{Path, PathBuf};
    use uuid::Uuid;

    #[derive(Default)]
    struct CountingFarm {
        frames: RefCell<Vec<usize>>,
    }

    impl FarmClient for CountingFarm {
        fn spool(&self, job: &FarmJob, _: &SpoolTarget) -> Result<SubmissionHandle, FarmError> {
            self.frames.borrow_mut().push(job.tasks().len());
            Ok(SubmissionHandle {
                id: Uuid::new_v4(),
                title: job.title.clone(),
                jid: Some(1),
                response: String::new(),
            })
        }
    }

    #[derive(Default)]
    struct CountingTracking {
        registered: RefCell<Vec<PathBuf>>,
    }

    impl TrackingClient for CountingTracking {
        fn context(&self) -> Result<TrackingContext, TrackingError> {
            Ok(TrackingContext {
                user_display_name: "west".to_owned(),
                user: None,
                project_name: "showA".to_owned(),
                project: None,
                entity: None,
            })
        }

        fn find_publish(&self, path: &Path) -> Result<Option<PublishHandle>, TrackingError> {
            Ok(self
                .registered
                .borrow()
                .iter()
                .any(|p| p == path)
                .then(|| PublishHandle {
                    id: 1,
                    path: path.to_path_buf(),
                }))
        }

        fn register_publish(&self, record: &PublishRecord) -> Result<PublishHandle, TrackingError> {
            self.registered.borrow_mut().push(record.path.clone());
            Ok(PublishHandle {
                id: 1,
                path: record.path.clone(),
            })
        }
    }

    fn host() -> StaticHost {
        let dir = std::env::temp_dir().join(format!("katana-session-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let scene = dir.join("shot010.v003.katana");
        fs::write(&scene, "scene").unwrap();

        let outputs = RenderOutputs::from_declared(["primary"], ["/out/bty.####.exr"]);
        StaticHost {
            nodes: vec![
                NodeInfo::new("render_bty", "Render").with_outputs(outputs),
                NodeInfo::new("merge1", "Merge"),
            ],
            range: (1001, 1004),
            scene,
        }
    }

    fn assembler() -> JobAssembler {
        JobAssembler::new(ToolchainConfig::default().resolve(None))
    }

    fn spool() -> SpoolTarget {
        SpoolTarget {
            host: "10.0.0.80".to_owned(),
            port: 80,
            owner: "west".to_owned(),
        }
    }

    #[test]
    fn open_reads_host_state() {
        let mut events = SelectionEvents::new();
        let session = OutputSession::open(&host(), &mut events);
        assert_eq!(session.start_frame(), "1001");
        assert_eq!(session.end_frame(), "1004");
        assert_eq!(session.targets().len(), 1);
        assert_eq!(events.len(), 1);

        session.close(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn selection_change_replaces_targets() {
        let mut events = SelectionEvents::new();
        let session = OutputSession::open(&host(), &mut events);

        events.notify(&[
            NodeInfo::new("render_a", "Render"),
            NodeInfo::new("dot", "Dot"),
            NodeInfo::new("render_b", "Render"),
        ]);
        let names = session
            .targets()
            .iter()
            .map(|t| t.name().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["render_a", "render_b"]);

        events.notify(&[]);
        assert!(session.targets().is_empty());
    }

    #[test]
    fn bad_frame_text_still_closes() {
        let host = host();
        let mut events = SelectionEvents::new();
        let mut session = OutputSession::open(&host, &mut events);
        session.set_start_frame("abc");

        let farm = CountingFarm::default();
        let tracking = CountingTracking::default();
        let publisher = Publisher::new(PublishSettings::default());
        let spool = spool();
        let submit = FarmSubmit {
            farm: &farm,
            spool: &spool,
            tracking: &tracking,
            publisher: &publisher,
        };

        let err = session
            .submit_to_farm(&host, &mut events, &assembler(), &submit)
            .unwrap_err();
        assert!(matches!(err, OutputError::Parse(_)));
        assert!(events.is_empty());
        assert!(farm.frames.borrow().is_empty());
    }

    #[test]
    fn submit_and_publish() {
        let host = host();
        let mut events = SelectionEvents::new();
        let mut session = OutputSession::open(&host, &mut events);
        session.set_end_frame("1010");
        session.set_publish(true);

        let farm = CountingFarm::default();
        let tracking = CountingTracking::default();
        let publisher = Publisher::new(PublishSettings::default());
        let spool = spool();
        let submit = FarmSubmit {
            farm: &farm,
            spool: &spool,
            tracking: &tracking,
            publisher: &publisher,
        };

        let report = session
            .submit_to_farm(&host, &mut events, &assembler(), &submit)
            .unwrap();
        assert_eq!(report.submissions.len(), 1);
        assert_eq!(*farm.frames.borrow(), vec![10]);
        assert_eq!(
            *tracking.registered.borrow(),
            vec![PathBuf::from("/out/bty.####.exr")]
        );
        assert!(events.is_empty());
    }

    #[test]
    fn nothing_selected_is_a_no_op() {
        let mut host = host();
        host.nodes = vec![NodeInfo::new("merge1", "Merge")];
        let mut events = SelectionEvents::new();
        let session = OutputSession::open(&host, &mut events);

        let farm = CountingFarm::default();
        let tracking = CountingTracking::default();
        let publisher = Publisher::new(PublishSettings::default());
        let spool = spool();
        let submit = FarmSubmit {
            farm: &farm,
            spool: &spool,
            tracking: &tracking,
            publisher: &publisher,
        };

        let report = session
            .submit_to_farm(&host, &mut events, &assembler(), &submit)
            .unwrap();
        assert!(report.submissions.is_empty());
        assert!(farm.frames.borrow().is_empty());
    }

    #[test]
    fn local_render_launches_each_target() {
        let mut host = host();
        host.nodes.push(NodeInfo::new("render_deep", "Render"));
        let mut events = SelectionEvents::new();
        let session = OutputSession::open(&host, &mut events);

        let handles = session
            .render_local(&host, &mut events, &assembler(), &Launcher::new("true"))
            .unwrap();
        assert_eq!(handles.len(), 2);
        assert_ne!(handles[0].id, handles[1].id);
        assert!(events.is_empty());
        assert!(host.scene.with_file_name(".shot010.v003.katana").exists());
    }

    #[test]
    fn local_render_bad_frame_text_still_closes() {
        let host = host();
        let mut events = SelectionEvents::new();
        let mut session = OutputSession::open(&host, &mut events);
        session.set_end_frame("10o4");

        let err = session
            .render_local(&host, &mut events, &assembler(), &Launcher::new("true"))
            .unwrap_err();
        assert!(matches!(err, OutputError::Parse(_)));
        assert!(events.is_empty());
        assert!(!host.scene.with_file_name(".shot010.v003.katana").exists());
    }
}
