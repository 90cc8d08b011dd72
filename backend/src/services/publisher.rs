use crate::config::PublishSettings;
use crate::domains::tracking_client::{PublishHandle, TrackingClient, TrackingContext};
use crate::models::error::OutputError;
use crate::models::publish::PublishRecord;
use katana::models::{render_target::RenderTarget, scene, version::version_from_file_name};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Registered(PublishHandle),
    AlreadyPublished(PublishHandle),
}

/// Registers the primary output of beauty render nodes with the tracking system.
#[derive(Debug, Clone)]
pub struct Publisher {
    settings: PublishSettings,
}

impl Publisher {
    pub fn new(settings: PublishSettings) -> Self {
        Self { settings }
    }

    pub fn wants(&self, target: &RenderTarget) -> bool {
        target.name().contains(&self.settings.marker)
    }

    pub fn publish(
        &self,
        tracking: &dyn TrackingClient,
        context: &TrackingContext,
        scene_file: &Path,
        targets: &[RenderTarget],
    ) -> Result<Vec<PublishOutcome>, OutputError> {
        let file_name = scene_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base_name = scene::base_name(scene_file);

        let mut outcomes = Vec::new();
        for target in targets.iter().filter(|t| self.wants(t)) {
            let path = target.primary_output()?;
            let version_number = version_from_file_name(&file_name)?;

            if let Some(existing) = tracking.find_publish(path)? {
                info!(path = %path.display(), id = existing.id, "Already published, skipping");
                outcomes.push(PublishOutcome::AlreadyPublished(existing));
                continue;
            }

            let record = PublishRecord {
                context: context.clone(),
                path: path.to_path_buf(),
                name: format!("{base_name}_{}", target.name()),
                created_by: context.user_display_name.clone(),
                version_number,
                published_file_type: self.settings.file_type.clone(),
            };
            let handle = tracking.register_publish(&record)?;
            info!(
                path = %path.display(),
                name = %record.name,
                version = version_number,
                id = handle.id,
                "Registered publish"
            );
            outcomes.push(PublishOutcome::Registered(handle));
        }
        Ok(outcomes)
    }
}
