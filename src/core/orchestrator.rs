use crate::core::archive::ArchiveBuilder;
use crate::domain::model::{
    FailedItem, FailurePolicy, JobOutcome, JobRequest, LoadedImage, PlatformFamily, ResizedAsset,
    SizePreset,
};
use crate::domain::ports::{ConfigProvider, Resizer, Storage};
use crate::utils::error::{PackError, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Drives the (family x preset x image) cross-product through the resizer
/// and assembles the results into a single zip archive on storage.
///
/// Each `run` is an independent unit of work; no state is carried across
/// invocations.
pub struct PackOrchestrator<R, S, C> {
    resizer: Arc<R>,
    storage: S,
    config: C,
}

struct ResizeTask {
    family: PlatformFamily,
    preset: SizePreset,
    image: LoadedImage,
}

impl<R, S, C> PackOrchestrator<R, S, C>
where
    R: Resizer + 'static,
    S: Storage,
    C: ConfigProvider,
{
    pub fn new(resizer: R, storage: S, config: C) -> Self {
        Self {
            resizer: Arc::new(resizer),
            storage,
            config,
        }
    }

    pub async fn run(&self, request: JobRequest) -> Result<JobOutcome> {
        self.run_with_cancellation(request, CancellationToken::new())
            .await
    }

    pub async fn run_with_cancellation(
        &self,
        request: JobRequest,
        cancel: CancellationToken,
    ) -> Result<JobOutcome> {
        if cancel.is_cancelled() {
            return Err(PackError::Cancelled);
        }

        let families = request.enabled_families();
        tracing::info!(
            "Starting resize-and-package job: {} image(s), {} platform(s)",
            request.images.len(),
            families.len()
        );

        let images = self.load_sources(&request).await?;

        // Folder skeleton first: preset folders exist even when the image
        // list is empty.
        let mut archive = ArchiveBuilder::new();
        for family in &families {
            archive.create_folder(&[family.dir_name()])?;
            for preset in family.presets() {
                archive.create_folder(&[family.dir_name(), &preset.label()])?;
            }
        }

        let tasks = plan_tasks(&families, &images);
        tracing::info!("Dispatching {} resize operation(s)", tasks.len());

        let (assets, failures) = self.execute(&tasks, &cancel).await?;
        if cancel.is_cancelled() {
            return Err(PackError::Cancelled);
        }

        // Single writer: the tree is only mutated here, in task order, so
        // placement is deterministic regardless of completion order.
        let mut packaged = 0;
        for (task, asset) in tasks.iter().zip(assets) {
            if let Some(asset) = asset {
                let folder =
                    archive.create_folder(&[task.family.dir_name(), &asset.preset.label()])?;
                archive.add_file(&folder, &asset.name, asset.bytes)?;
                packaged += 1;
            }
        }

        if !failures.is_empty() {
            tracing::warn!(
                "{} resize operation(s) failed; adding failures.json to the archive",
                failures.len()
            );
            let report = serde_json::to_vec_pretty(&failures)?;
            let root = archive.root();
            archive.add_file(&root, "failures.json", report)?;
        }

        tracing::info!("Packaging {} file(s)", archive.file_count());
        let data = archive.serialize()?;

        let file_name = self.destination_name().await?;
        self.storage.write_file(&file_name, &data).await?;

        let output_path = format!("{}/{}", self.config.output_path(), file_name);
        tracing::info!("Archive written to {}", output_path);

        Ok(JobOutcome {
            output_path,
            file_count: packaged,
            failures,
        })
    }

    /// Read every source once; the bytes are shared read-only across all
    /// resize tasks for that image. An unreadable source fails the job.
    async fn load_sources(&self, request: &JobRequest) -> Result<Vec<LoadedImage>> {
        let mut images = Vec::with_capacity(request.images.len());
        for source in &request.images {
            let name = source.display_name();
            let path = source.path.to_string_lossy();
            let bytes =
                self.storage
                    .read_file(&path)
                    .await
                    .map_err(|e| PackError::OrchestratorError {
                        stage: "load".to_string(),
                        image: name.clone(),
                        preset: "-".to_string(),
                        source: Box::new(e),
                    })?;
            tracing::debug!("Loaded {} ({} bytes)", name, bytes.len());
            images.push(LoadedImage {
                name,
                bytes: Arc::new(bytes),
            });
        }
        Ok(images)
    }

    async fn execute(
        &self,
        tasks: &[ResizeTask],
        cancel: &CancellationToken,
    ) -> Result<(Vec<Option<ResizedAsset>>, Vec<FailedItem>)> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency().max(1)));
        let mut join_set = JoinSet::new();
        for (idx, task) in tasks.iter().enumerate() {
            let resizer = Arc::clone(&self.resizer);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let image = task.image.clone();
            let preset = task.preset;
            join_set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (idx, Err(PackError::Cancelled)),
                };
                if cancel.is_cancelled() {
                    return (idx, Err(PackError::Cancelled));
                }
                let result = resizer.resize(&image, preset).await;
                let result = result.map(|bytes| ResizedAsset {
                    name: image.name,
                    preset,
                    bytes,
                });
                (idx, result)
            });
        }

        let policy = self.config.failure_policy();
        let mut slots: Vec<Option<ResizedAsset>> = vec![None; tasks.len()];
        let mut failures = Vec::new();
        let mut fatal: Option<PackError> = None;

        while let Some(joined) = join_set.join_next().await {
            let (idx, outcome) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    if fatal.is_none() {
                        cancel.cancel();
                        fatal = Some(PackError::ProcessingError {
                            message: format!("resize worker crashed: {}", e),
                        });
                    }
                    continue;
                }
            };
            match outcome {
                Ok(asset) => slots[idx] = Some(asset),
                // A task skipped by the cancellation token; not an item failure.
                Err(PackError::Cancelled) => {}
                Err(err) => {
                    let task = &tasks[idx];
                    tracing::warn!(
                        "Resize failed for {} at {}: {}",
                        task.image.name,
                        task.preset.label(),
                        err
                    );
                    match policy {
                        FailurePolicy::Abort => {
                            if fatal.is_none() {
                                cancel.cancel();
                                fatal = Some(PackError::OrchestratorError {
                                    stage: "resize".to_string(),
                                    image: task.image.name.clone(),
                                    preset: task.preset.label(),
                                    source: Box::new(err),
                                });
                            }
                        }
                        FailurePolicy::CollectAndContinue => failures.push(FailedItem {
                            image: task.image.name.clone(),
                            preset: task.preset.label(),
                            reason: err.to_string(),
                        }),
                    }
                }
            }
        }

        if let Some(err) = fatal {
            return Err(err);
        }
        Ok((slots, failures))
    }

    /// Timestamped destination name; a counter suffix keeps back-to-back
    /// runs within the same millisecond from overwriting each other.
    async fn destination_name(&self) -> Result<String> {
        let millis = Utc::now().timestamp_millis();
        let base = format!("resized-images-{}", millis);
        let mut name = format!("{}.zip", base);
        let mut attempt = 1;
        while self.storage.exists(&name).await? {
            name = format!("{}-{}.zip", base, attempt);
            attempt += 1;
        }
        Ok(name)
    }
}

fn plan_tasks(families: &[PlatformFamily], images: &[LoadedImage]) -> Vec<ResizeTask> {
    let mut tasks = Vec::with_capacity(families.len() * 3 * images.len());
    for family in families {
        for preset in family.presets() {
            for image in images {
                tasks.push(ResizeTask {
                    family: *family,
                    preset: *preset,
                    image: image.clone(),
                });
            }
        }
    }
    tasks
}
