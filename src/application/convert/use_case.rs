//! Convert Use Case
//!
//! 1. List `*.tar` in the archive directory, sorted by file name
//! 2. Recover each archive's reference from `manifest.json`
//! 3. Skip archives whose image is present and not older than the archive
//! 4. Build the rest on the worker pool through staging files
//! 5. Merge one entry per image, plus rebound aliases, into the registry

use std::fs;
use std::path::{Path, PathBuf};

use crate::application::outcome::ItemFailure;
use crate::application::pool::{run_bounded, CancelToken};
use crate::domain::entities::{collect_entries, EntrySource, MergeReport, RegistryDocument};
use crate::domain::ports::{
    CommandError, ContainerRuntime, ManifestRepository, RegistryRepository, MANIFEST_FILE,
};
use crate::domain::services::aliases_for;
use crate::domain::value_objects::{
    ArchiveName, ImageReference, LogicalImageKey, ARCHIVE_EXTENSION,
};
use crate::error::{SifterError, SifterResult};
use crate::infrastructure::fs::{absolute, is_fresh, StagedFile};

use super::options::ConvertOptions;
use super::result::{ConvertResult, ConvertedImage};

#[derive(Debug, Clone)]
struct ConvertItem {
    archive: PathBuf,
    reference: ImageReference,
    image: PathBuf,
}

pub struct ConvertUseCase<C, M, R>
where
    C: ContainerRuntime,
    M: ManifestRepository,
    R: RegistryRepository,
{
    runtime: C,
    manifests: M,
    registry: R,
}

impl<C, M, R> ConvertUseCase<C, M, R>
where
    C: ContainerRuntime,
    M: ManifestRepository,
    R: RegistryRepository,
{
    pub fn new(runtime: C, manifests: M, registry: R) -> Self {
        Self {
            runtime,
            manifests,
            registry,
        }
    }

    pub fn execute(&self, options: &ConvertOptions, cancel: &CancelToken) -> SifterResult<ConvertResult> {
        let archive_dir = &options.archive_dir;
        if !archive_dir.is_dir() {
            return Err(SifterError::MissingInput {
                what: "archive directory",
                path: archive_dir.clone(),
            });
        }

        let files = list_archives(archive_dir)?;
        let manifest = self.manifests.load(archive_dir)?;
        let image_dir = absolute(options.image_dir.as_deref().unwrap_or(archive_dir))?;
        let base = self.registry.load()?;

        let mut result = ConvertResult {
            dry_run: options.dry_run,
            ..ConvertResult::default()
        };
        let mut fresh = Vec::new();
        let mut pending = Vec::new();

        for file_name in files {
            let resolved = ArchiveName::from_archive_file(&file_name).and_then(|archive| {
                manifest
                    .claimant(&archive)
                    .map(|reference| (reference.clone(), archive))
            });
            let Some((reference, archive)) = resolved else {
                result.failed.push(ItemFailure::new(
                    file_name.as_str(),
                    format!("no entry in {MANIFEST_FILE}; the image reference cannot be recovered"),
                ));
                continue;
            };

            let item = ConvertItem {
                archive: archive_dir.join(&file_name),
                reference,
                image: image_dir.join(archive.sif_file()),
            };
            if is_fresh(&item.image, &item.archive) {
                fresh.push(item);
            } else {
                pending.push(item);
            }
        }

        if !pending.is_empty() && !options.dry_run && !self.runtime.is_available() {
            return Err(SifterError::ToolUnavailable {
                program: self.runtime.program().to_string(),
                setting: "convert.runtime",
            });
        }

        let mut sources = Vec::new();

        for item in &fresh {
            tracing::info!(image = %item.image.display(), "image up to date");
            let image = converted(item, options, &base);
            push_sources(&mut sources, &image);
            result.skipped.push(image);
        }

        let outcomes: Vec<Option<Result<(), CommandError>>> = if options.dry_run {
            pending.iter().map(|_| Some(Ok(()))).collect()
        } else {
            run_bounded(&pending, options.jobs, cancel, |item| {
                self.convert_one(item, options)
            })
        };

        for (item, outcome) in pending.iter().zip(outcomes) {
            match outcome {
                Some(Ok(())) => {
                    let image = converted(item, options, &base);
                    if !options.dry_run {
                        tracing::info!(reference = %item.reference, image = %item.image.display(), "converted");
                    }
                    push_sources(&mut sources, &image);
                    result.converted.push(image);
                }
                Some(Err(err)) => {
                    tracing::warn!(archive = %item.archive.display(), error = %err, "conversion failed");
                    result.failed.push(ItemFailure::new(
                        item.reference.to_string(),
                        format!("conversion failed: {err}"),
                    ));
                }
                None => result
                    .failed
                    .push(ItemFailure::cancelled(item.reference.to_string())),
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

    fn convert_one(&self, item: &ConvertItem, options: &ConvertOptions) -> Result<(), CommandError> {
        let staged = StagedFile::for_destination(&item.image)?;

        self.runtime
            .build_from_archive(&item.archive, staged.path(), options.timeout)?;

        if staged.staged_len().is_none() {
            return Err(CommandError::EmptyOutput {
                program: self.runtime.program().to_string(),
                path: item.image.clone(),
            });
        }
        staged.commit()?;
        Ok(())
    }
}

fn converted(item: &ConvertItem, options: &ConvertOptions, base: &RegistryDocument) -> ConvertedImage {
    ConvertedImage {
        reference: item.reference.clone(),
        image: item.image.clone(),
        locator: options.locator.locator_for(&item.image),
        rebound: aliases_for(base, &item.reference),
    }
}

fn push_sources(sources: &mut Vec<EntrySource>, image: &ConvertedImage) {
    let own = LogicalImageKey::from(&image.reference);
    for key in std::iter::once(own).chain(image.rebound.iter().cloned()) {
        sources.push(EntrySource::Conversion {
            key,
            locator: image.locator.clone(),
        });
    }
}

/// Visible `*.tar` files, sorted by name.
fn list_archives(dir: &Path) -> SifterResult<Vec<String>> {
    let suffix = format!(".{ARCHIVE_EXTENSION}");
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !name.ends_with(&suffix) || !entry.path().is_file() {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}
