//! Export Use Case
//!
//! 1. Read and parse the tags file
//! 2. Load the archive manifest of the output directory
//! 3. Plan: export, skip (fingerprint matches) or refuse (name collision)
//! 4. Save the images on the worker pool through staging files
//! 5. Rewrite the manifest once with every archive now on disk

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::application::outcome::ItemFailure;
use crate::application::pool::{run_bounded, CancelToken};
use crate::domain::entities::{ArchiveRecord, TagsFile};
use crate::domain::ports::{CommandError, ImageBackend, ManifestRepository};
use crate::domain::services::{ArchiveState, ExportAction, ExportPlanner, PlannedExport};
use crate::domain::value_objects::ArchiveName;
use crate::error::{SifterError, SifterResult};
use crate::infrastructure::fs::{fingerprint, StagedFile};

use super::options::ExportOptions;
use super::result::{ExportResult, ExportedArchive};

pub struct ExportUseCase<B, M>
where
    B: ImageBackend,
    M: ManifestRepository,
{
    backend: B,
    manifests: M,
}

impl<B, M> ExportUseCase<B, M>
where
    B: ImageBackend,
    M: ManifestRepository,
{
    pub fn new(backend: B, manifests: M) -> Self {
        Self { backend, manifests }
    }

    pub fn execute(&self, options: &ExportOptions, cancel: &CancelToken) -> SifterResult<ExportResult> {
        let content = read_tags_file(&options.tags_file)?;
        let parsed = TagsFile::parse(&content);
        for bad in &parsed.malformed {
            tracing::debug!(line = bad.line, content = %bad.content, error = %bad.error, "ignoring malformed tags line");
        }

        let mut manifest = self.manifests.load(&options.out_dir)?;
        let plan = ExportPlanner::plan(&parsed.references, &manifest, |name| {
            archive_state(&options.out_dir.join(name.archive_file()))
        });

        let mut result = ExportResult {
            dry_run: options.dry_run,
            ..ExportResult::default()
        };
        result.skipped.extend(parsed.duplicates.iter().cloned());

        for item in &plan.items {
            match &item.action {
                ExportAction::Skip => {
                    tracing::info!(reference = %item.reference, "archive up to date");
                    result.skipped.push(item.reference.clone());
                }
                ExportAction::Collision { claimed_by } => {
                    result.failed.push(ItemFailure::new(
                        item.reference.to_string(),
                        format!(
                            "archive name '{}' is already used by '{}'",
                            item.archive.archive_file(),
                            claimed_by
                        ),
                    ));
                }
                ExportAction::Export => {}
            }
        }

        let pending: Vec<&PlannedExport> = plan.to_export().collect();
        if pending.is_empty() {
            return Ok(result);
        }

        if options.dry_run {
            result.exported = pending
                .iter()
                .map(|item| ExportedArchive {
                    reference: item.reference.clone(),
                    path: archive_path(&options.out_dir, &item.archive),
                    size: 0,
                })
                .collect();
            return Ok(result);
        }

        if !self.backend.is_available() {
            return Err(SifterError::ToolUnavailable {
                program: self.backend.program().to_string(),
                setting: "export.backend",
            });
        }

        let outcomes = run_bounded(&pending, options.jobs, cancel, |item| {
            self.export_one(item, options)
        });

        for (item, outcome) in pending.iter().zip(outcomes) {
            match outcome {
                Some(Ok((exported, record))) => {
                    tracing::info!(reference = %item.reference, size = exported.size, "exported");
                    manifest.record(item.reference.clone(), record);
                    result.exported.push(exported);
                }
                Some(Err(err)) => {
                    tracing::warn!(reference = %item.reference, error = %err, "export failed");
                    result.failed.push(ItemFailure::new(
                        item.reference.to_string(),
                        format!("export failed: {err}"),
                    ));
                }
                None => result
                    .failed
                    .push(ItemFailure::cancelled(item.reference.to_string())),
            }
        }

        if !result.exported.is_empty() {
            self.manifests.save(&options.out_dir, &manifest)?;
            result.manifest = Some(options.out_dir.join(crate::domain::ports::MANIFEST_FILE));
        }

        Ok(result)
    }

    fn export_one(
        &self,
        item: &PlannedExport,
        options: &ExportOptions,
    ) -> Result<(ExportedArchive, ArchiveRecord), CommandError> {
        let dest = archive_path(&options.out_dir, &item.archive);
        let staged = StagedFile::for_destination(&dest)?;

        self.backend
            .save(&item.reference, staged.path(), options.timeout)?;

        if staged.staged_len().is_none() {
            return Err(CommandError::EmptyOutput {
                program: self.backend.program().to_string(),
                path: dest,
            });
        }
        let (size, sha256) = fingerprint(staged.path())?;
        let path = staged.commit()?;

        Ok((
            ExportedArchive {
                reference: item.reference.clone(),
                path,
                size,
            },
            ArchiveRecord {
                archive: item.archive.clone(),
                size,
                sha256,
                exported_at: Utc::now(),
            },
        ))
    }
}

fn read_tags_file(path: &Path) -> SifterResult<String> {
    if !path.is_file() {
        return Err(SifterError::MissingInput {
            what: "tags file",
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

fn archive_path(out_dir: &Path, archive: &ArchiveName) -> PathBuf {
    out_dir.join(archive.archive_file())
}

fn archive_state(path: &Path) -> ArchiveState {
    match fingerprint(path) {
        Ok((size, sha256)) => ArchiveState::Present { size, sha256 },
        Err(_) => ArchiveState::Missing,
    }
}
