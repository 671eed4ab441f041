//! Pull Use Case
//!
//! Fetches the images that no catalog target builds straight from their
//! upstream registries with the unprivileged runtime, then points their
//! registry keys at the pulled files.
//!
//! References are lowercased before pulling (the runtime rejects upper
//! case) and keys that differ only in case share one download.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::outcome::{stage_exit_code, ItemFailure};
use crate::application::pool::{run_bounded, CancelToken};
use crate::config::PullConfig;
use crate::domain::entities::{collect_entries, Catalog, EntrySource, MergeReport};
use crate::domain::ports::{CommandError, ContainerRuntime, RegistryRepository};
use crate::domain::services::select_pulls;
use crate::domain::value_objects::{ArchiveName, ImageReference, LocatorStyle, LogicalImageKey};
use crate::error::{SifterError, SifterResult};
use crate::infrastructure::fs::{absolute, non_empty_len, StagedFile};

#[derive(Debug, Clone)]
pub struct PullOptions {
    pub out_dir: PathBuf,
    pub locator: LocatorStyle,
    pub jobs: usize,
    pub timeout: Duration,
    pub dry_run: bool,
}

impl PullOptions {
    pub fn from_config(config: &PullConfig, locator: LocatorStyle) -> Self {
        Self {
            out_dir: config.out_dir.clone(),
            locator,
            jobs: config.jobs,
            timeout: config.timeout(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulledImage {
    /// Lowercased reference that was (or would be) pulled
    pub reference: ImageReference,
    pub image: PathBuf,
    pub locator: String,
    /// Registry keys resolved by this image
    pub keys: Vec<LogicalImageKey>,
}

#[derive(Debug, Clone, Default)]
pub struct PullResult {
    pub pulled: Vec<PulledImage>,
    /// Images already present in the output directory
    pub skipped: Vec<PulledImage>,
    pub failed: Vec<ItemFailure>,
    /// Unbuilt keys whose locator is neither a file nor an image reference
    pub unresolvable: Vec<LogicalImageKey>,
    pub registry: MergeReport,
    pub dry_run: bool,
}

impl PullResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        stage_exit_code(&self.failed)
    }
}

pub struct PullUseCase<C, R>
where
    C: ContainerRuntime,
    R: RegistryRepository,
{
    runtime: C,
    registry: R,
}

impl<C, R> PullUseCase<C, R>
where
    C: ContainerRuntime,
    R: RegistryRepository,
{
    pub fn new(runtime: C, registry: R) -> Self {
        Self { runtime, registry }
    }

    pub fn execute(
        &self,
        catalog: &Catalog,
        options: &PullOptions,
        cancel: &CancelToken,
    ) -> SifterResult<PullResult> {
        let base = self.registry.load()?;
        let selection = select_pulls(catalog, &base, |locator| Path::new(locator).is_file());
        for key in &selection.unresolvable {
            tracing::warn!(key = %key.as_str(), "locator is neither a file nor an image reference");
        }

        let out_dir = absolute(&options.out_dir)?;
        let mut images: Vec<PulledImage> = Vec::new();
        let mut by_reference: HashMap<ImageReference, usize> = HashMap::new();

        for candidate in selection.candidates {
            let reference = candidate.reference.to_lowercase();
            if let Some(&index) = by_reference.get(&reference) {
                images[index].keys.push(candidate.key);
                continue;
            }
            let image = out_dir.join(ArchiveName::for_reference(&reference).sif_file());
            by_reference.insert(reference.clone(), images.len());
            images.push(PulledImage {
                locator: options.locator.locator_for(&image),
                reference,
                image,
                keys: vec![candidate.key],
            });
        }

        let mut result = PullResult {
            unresolvable: selection.unresolvable,
            dry_run: options.dry_run,
            ..PullResult::default()
        };

        let (present, pending): (Vec<PulledImage>, Vec<PulledImage>) = images
            .into_iter()
            .partition(|image| non_empty_len(&image.image).is_some());

        if !pending.is_empty() && !options.dry_run && !self.runtime.is_available() {
            return Err(SifterError::ToolUnavailable {
                program: self.runtime.program().to_string(),
                setting: "convert.runtime",
            });
        }

        let outcomes: Vec<Option<Result<(), CommandError>>> = if options.dry_run {
            pending.iter().map(|_| Some(Ok(()))).collect()
        } else {
            run_bounded(&pending, options.jobs, cancel, |image| {
                self.pull_one(image, options.timeout)
            })
        };

        let mut sources = Vec::new();
        let mut record = |image: &PulledImage| {
            for key in &image.keys {
                sources.push(EntrySource::Pull {
                    key: key.clone(),
                    locator: image.locator.clone(),
                });
            }
        };

        for image in present {
            tracing::info!(image = %image.image.display(), "image already pulled");
            record(&image);
            result.skipped.push(image);
        }

        for (image, outcome) in pending.into_iter().zip(outcomes) {
            match outcome {
                Some(Ok(())) => {
                    record(&image);
                    result.pulled.push(image);
                }
                Some(Err(err)) => {
                    tracing::warn!(reference = %image.reference, error = %err, "pull failed");
                    result.failed.push(ItemFailure::new(
                        image.reference.to_string(),
                        format!("pull failed: {err}"),
                    ));
                }
                None => result
                    .failed
                    .push(ItemFailure::cancelled(image.reference.to_string())),
            }
        }

        let batch = collect_entries(sources);
        result.registry = if options.dry_run {
            base.clone().apply(&batch)
        } else if batch.is_empty() {
            MergeReport::default()
        } else {
            self.registry.merge(&base, &batch)?
        };

        Ok(result)
    }

    fn pull_one(&self, image: &PulledImage, timeout: Duration) -> Result<(), CommandError> {
        let staged = StagedFile::for_destination(&image.image)?;
        self.runtime.pull(&image.reference, staged.path(), timeout)?;
        if staged.staged_len().is_none() {
            return Err(CommandError::EmptyOutput {
                program: self.runtime.program().to_string(),
                path: image.image.clone(),
            });
        }
        staged.commit()?;
        tracing::info!(reference = %image.reference, image = %image.image.display(), "pulled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CatalogTarget, EntryKind, RegistryEntry};
    use crate::infrastructure::JsonRegistryRepository;
    use std::collections::BTreeMap;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct FakeRuntime {
        failing: Vec<String>,
        pulled: Mutex<Vec<String>>,
        interrupt: Option<CancelToken>,
    }

    impl ContainerRuntime for FakeRuntime {
        fn program(&self) -> &str {
            "fake-apptainer"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn build_from_archive(&self, _: &Path, _: &Path, _: Duration) -> Result<(), CommandError> {
            unreachable!("pulling never builds")
        }

        fn pull(
            &self,
            reference: &ImageReference,
            dest: &Path,
            _timeout: Duration,
        ) -> Result<(), CommandError> {
            let name = reference.to_string();
            self.pulled.lock().unwrap().push(name.clone());
            if self.failing.contains(&name) {
                return Err(CommandError::TimedOut {
                    program: "fake-apptainer".into(),
                    after: Duration::from_secs(1),
                });
            }
            fs::write(dest, name)?;
            if let Some(cancel) = &self.interrupt {
                cancel.cancel();
            }
            Ok(())
        }
    }

    fn catalog() -> Catalog {
        let mut targets = BTreeMap::new();
        targets.insert(
            "gatk".to_string(),
            CatalogTarget {
                dependencies: vec!["samtools".into()],
            },
        );
        Catalog::new(Some("lab".into()), targets).unwrap()
    }

    fn key(k: &str) -> LogicalImageKey {
        LogicalImageKey::new(k).unwrap()
    }

    fn setup(registry: &str) -> (tempfile::TempDir, JsonRegistryRepository, PullOptions) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dockers.json");
        fs::write(&path, registry).unwrap();
        let mut options = PullOptions::from_config(&PullConfig::default(), LocatorStyle::Path);
        options.out_dir = dir.path().join("docker_images");
        (dir, JsonRegistryRepository::with_path(path), options)
    }

    #[test]
    fn pulls_unbuilt_images_only() {
        let (_dir, registry, options) = setup(
            r#"{"name": "wgs",
                "gatk_docker": "lab/gatk:1",
                "samtools_docker": "biocontainers/samtools:1.19",
                "ubuntu_docker": "Ubuntu:22.04"}"#,
        );
        let runtime = FakeRuntime::default();

        let result = PullUseCase::new(&runtime, &registry)
            .execute(&catalog(), &options, &CancelToken::new())
            .unwrap();

        assert_eq!(*runtime.pulled.lock().unwrap(), vec!["ubuntu:22.04"]);
        assert_eq!(result.pulled.len(), 1);
        let doc = registry.load().unwrap();
        let entry = doc.get(&key("ubuntu_docker")).unwrap();
        assert_eq!(entry.kind, EntryKind::Pulled);
        assert!(entry.locator.ends_with("docker_images/ubuntu_22.04.sif"));
        assert_eq!(
            doc.get(&key("gatk_docker")),
            Some(&RegistryEntry::local("lab/gatk:1"))
        );
    }

    #[test]
    fn case_variants_share_one_pull() {
        let (_dir, registry, options) =
            setup(r#"{"a_docker": "Python:3.12", "b_docker": "python:3.12"}"#);
        let runtime = FakeRuntime::default();

        let result = PullUseCase::new(&runtime, &registry)
            .execute(&catalog(), &options, &CancelToken::new())
            .unwrap();

        assert_eq!(runtime.pulled.lock().unwrap().len(), 1);
        assert_eq!(result.pulled[0].keys, vec![key("a_docker"), key("b_docker")]);
        let doc = registry.load().unwrap();
        assert_eq!(
            doc.get(&key("a_docker")).unwrap().locator,
            doc.get(&key("b_docker")).unwrap().locator
        );
    }

    #[test]
    fn existing_images_are_reused() {
        let (dir, registry, options) = setup(r#"{"ubuntu_docker": "ubuntu:22.04"}"#);
        fs::create_dir_all(dir.path().join("docker_images")).unwrap();
        fs::write(dir.path().join("docker_images/ubuntu_22.04.sif"), "sif").unwrap();
        let runtime = FakeRuntime::default();

        let result = PullUseCase::new(&runtime, &registry)
            .execute(&catalog(), &options, &CancelToken::new())
            .unwrap();

        assert!(runtime.pulled.lock().unwrap().is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(
            registry.load().unwrap().get(&key("ubuntu_docker")).unwrap().kind,
            EntryKind::Pulled
        );
    }

    #[test]
    fn failures_are_item_errors() {
        let (_dir, registry, options) =
            setup(r#"{"a_docker": "alpine:3", "b_docker": "busybox:1"}"#);
        let runtime = FakeRuntime {
            failing: vec!["busybox:1".into()],
            ..FakeRuntime::default()
        };

        let result = PullUseCase::new(&runtime, &registry)
            .execute(&catalog(), &options, &CancelToken::new())
            .unwrap();

        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.exit_code(), crate::error::exit_code::PARTIAL_FAILURE);
        let doc = registry.load().unwrap();
        assert_eq!(doc.get(&key("a_docker")).unwrap().kind, EntryKind::Pulled);
        assert_eq!(doc.get(&key("b_docker")).unwrap().kind, EntryKind::Local);
    }

    #[test]
    fn interrupt_records_finished_pulls_only() {
        let (_dir, registry, mut options) = setup(
            r#"{"a_docker": "alpine:3", "b_docker": "busybox:1", "c_docker": "debian:12"}"#,
        );
        options.jobs = 1;
        let cancel = CancelToken::new();
        let runtime = FakeRuntime {
            interrupt: Some(cancel.clone()),
            ..FakeRuntime::default()
        };

        let result = PullUseCase::new(&runtime, &registry)
            .execute(&catalog(), &options, &cancel)
            .unwrap();

        assert_eq!(*runtime.pulled.lock().unwrap(), vec!["alpine:3"]);
        let subjects: Vec<&str> = result.failed.iter().map(|f| f.subject.as_str()).collect();
        assert_eq!(subjects, vec!["busybox:1", "debian:12"]);
        assert!(result.failed.iter().all(|f| f.message == "interrupted"));
        assert_eq!(result.exit_code(), crate::error::exit_code::PARTIAL_FAILURE);

        let doc = registry.load().unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get(&key("a_docker")).unwrap().kind, EntryKind::Pulled);
        assert_eq!(
            doc.get(&key("b_docker")),
            Some(&RegistryEntry::local("busybox:1"))
        );
        assert_eq!(
            doc.get(&key("c_docker")),
            Some(&RegistryEntry::local("debian:12"))
        );
    }

    #[test]
    fn dry_run_touches_nothing() {
        let (dir, registry, mut options) = setup(r#"{"a_docker": "alpine:3"}"#);
        options.dry_run = true;
        let before = fs::read_to_string(registry.path()).unwrap();
        let runtime = FakeRuntime::default();

        let result = PullUseCase::new(&runtime, &registry)
            .execute(&catalog(), &options, &CancelToken::new())
            .unwrap();

        assert_eq!(result.pulled.len(), 1);
        assert_eq!(result.registry.updated, vec![key("a_docker")]);
        assert!(runtime.pulled.lock().unwrap().is_empty());
        assert_eq!(fs::read_to_string(registry.path()).unwrap(), before);
        assert!(!dir.path().join("docker_images").exists());
    }

    #[test]
    fn junk_locators_are_reported() {
        let (_dir, registry, options) = setup(r#"{"odd_docker": "not a reference"}"#);
        let result = PullUseCase::new(FakeRuntime::default(), &registry)
            .execute(&catalog(), &options, &CancelToken::new())
            .unwrap();
        assert_eq!(result.unresolvable, vec![key("odd_docker")]);
        assert!(result.pulled.is_empty());
    }
}
