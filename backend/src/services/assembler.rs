use crate::domains::farm_client::{FarmClient, SpoolTarget, SubmissionHandle};
use crate::domains::tracking_client::TrackingContext;
use crate::models::error::OutputError;
use crate::models::job::{job_title, FarmJob};
use katana::katana::{LaunchHandle, Launcher};
use katana::models::{
    args::Args, frame_range::FrameRange, render_target::RenderTarget, scene, scene::StagedScene,
    toolchain::Toolchain,
};
use std::path::Path;
use tracing::{debug, info};

/// Turns the selected render nodes and a frame range into command lines and farm jobs.
#[derive(Debug, Clone)]
pub struct JobAssembler {
    toolchain: Toolchain,
}

impl JobAssembler {
    pub fn new(toolchain: Toolchain) -> Self {
        Self { toolchain }
    }

    pub fn command_line(
        &self,
        target: &RenderTarget,
        range: FrameRange,
        scene: &StagedScene,
    ) -> Args {
        Args::new(&self.toolchain, scene.staged(), target.name(), range)
    }

    /// Job title uses the working file name, not the staged copy.
    pub fn build_job(
        &self,
        context: &TrackingContext,
        scene: &StagedScene,
        target: &RenderTarget,
        range: FrameRange,
    ) -> FarmJob {
        let title = job_title(
            &context.user_display_name,
            &context.project_name,
            &scene::base_name(scene.source()),
            target.name(),
            &range,
        );
        let command = self.command_line(target, range, scene);
        FarmJob::new(title, &command, &range)
    }

    /// Stage the scene and build one job per target without spooling anything.
    pub fn assemble(
        &self,
        context: &TrackingContext,
        scene_file: &Path,
        targets: &[RenderTarget],
        range: FrameRange,
    ) -> Result<(StagedScene, Vec<FarmJob>), OutputError> {
        let scene = StagedScene::create(scene_file)?;
        let jobs = targets
            .iter()
            .map(|target| self.build_job(context, &scene, target, range))
            .collect();
        Ok((scene, jobs))
    }

    /// Spool one job per target. The farm's reply is returned but never acted on.
    pub fn submit(
        &self,
        farm: &dyn FarmClient,
        spool: &SpoolTarget,
        context: &TrackingContext,
        scene_file: &Path,
        targets: &[RenderTarget],
        range: FrameRange,
    ) -> Result<Vec<SubmissionHandle>, OutputError> {
        let (_, jobs) = self.assemble(context, scene_file, targets, range)?;

        let mut handles = Vec::with_capacity(jobs.len());
        for job in &jobs {
            debug!(title = %job.title, tasks = job.tasks().len(), "Spooling job");
            let handle = farm.spool(job, spool)?;
            info!(
                title = %handle.title,
                jid = ?handle.jid,
                host = %spool.host,
                owner = %spool.owner,
                "Spooled job"
            );
            handles.push(handle);
        }
        Ok(handles)
    }

    /// Launch one terminal per target, each rendering the whole range in a single process.
    pub fn render_local(
        &self,
        launcher: &Launcher,
        scene_file: &Path,
        targets: &[RenderTarget],
        range: FrameRange,
    ) -> Result<Vec<LaunchHandle>, OutputError> {
        let scene = StagedScene::create(scene_file)?;
        targets
            .iter()
            .map(|target| {
                let args = self.command_line(target, range, &scene);
                launcher.launch(&args).map_err(OutputError::from)
            })
            .collect()
    }
}
