//! Export planning service
//!
//! Decides, per tags-file reference, whether its archive must be written,
//! can be skipped as up to date, or must be refused because another
//! reference already owns the archive name. The caller supplies on-disk
//! state; nothing here touches the file system.

use std::collections::HashMap;

use crate::domain::entities::ArchiveManifest;
use crate::domain::value_objects::{ArchiveName, ContentHash, ImageReference};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportAction {
    /// Save the image (new archive or stale fingerprint)
    Export,
    /// Archive on disk matches the manifest fingerprint
    Skip,
    /// Another reference sanitizes to the same archive name
    Collision { claimed_by: ImageReference },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedExport {
    pub reference: ImageReference,
    pub archive: ArchiveName,
    pub action: ExportAction,
}

#[derive(Debug, Clone, Default)]
pub struct ExportPlan {
    pub items: Vec<PlannedExport>,
}

impl ExportPlan {
    pub fn to_export(&self) -> impl Iterator<Item = &PlannedExport> {
        self.items
            .iter()
            .filter(|p| matches!(p.action, ExportAction::Export))
    }

    pub fn export_count(&self) -> usize {
        self.to_export().count()
    }

    pub fn skip_count(&self) -> usize {
        self.items
            .iter()
            .filter(|p| matches!(p.action, ExportAction::Skip))
            .count()
    }

    pub fn collisions(&self) -> impl Iterator<Item = &PlannedExport> {
        self.items
            .iter()
            .filter(|p| matches!(p.action, ExportAction::Collision { .. }))
    }
}

/// Current state of an archive file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveState {
    Missing,
    Present { size: u64, sha256: ContentHash },
}

pub struct ExportPlanner;

impl ExportPlanner {
    /// Plan every reference in order. `state_of` is only consulted for
    /// references the manifest already knows, so unchanged runs hash each
    /// archive once and new references are never hashed.
    pub fn plan(
        references: &[ImageReference],
        manifest: &ArchiveManifest,
        mut state_of: impl FnMut(&ArchiveName) -> ArchiveState,
    ) -> ExportPlan {
        let mut claimed: HashMap<ArchiveName, &ImageReference> = HashMap::new();
        let mut plan = ExportPlan::default();

        for reference in references {
            let archive = ArchiveName::for_reference(reference);

            let action = if let Some(owner) = claimed.get(&archive) {
                ExportAction::Collision {
                    claimed_by: (*owner).clone(),
                }
            } else if let Some(owner) = manifest
                .claimant(&archive)
                .filter(|owner| *owner != reference)
            {
                ExportAction::Collision {
                    claimed_by: owner.clone(),
                }
            } else {
                claimed.insert(archive.clone(), reference);
                Self::plan_item(reference, &archive, manifest, &mut state_of)
            };

            plan.items.push(PlannedExport {
                reference: reference.clone(),
                archive,
                action,
            });
        }

        plan
    }

    fn plan_item(
        reference: &ImageReference,
        archive: &ArchiveName,
        manifest: &ArchiveManifest,
        state_of: &mut impl FnMut(&ArchiveName) -> ArchiveState,
    ) -> ExportAction {
        let Some(record) = manifest.get(reference) else {
            return ExportAction::Export;
        };
        if &record.archive != archive {
            return ExportAction::Export;
        }
        match state_of(archive) {
            ArchiveState::Present { size, sha256 } if record.same_fingerprint(size, &sha256) => {
                ExportAction::Skip
            }
            _ => ExportAction::Export,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ArchiveRecord;
    use chrono::Utc;

    fn r(s: &str) -> ImageReference {
        ImageReference::parse(s).unwrap()
    }

    fn manifest_with(reference: &ImageReference, payload: &[u8]) -> ArchiveManifest {
        let mut m = ArchiveManifest::new();
        m.record(
            reference.clone(),
            ArchiveRecord {
                archive: ArchiveName::for_reference(reference),
                size: payload.len() as u64,
                sha256: ContentHash::from_bytes(payload),
                exported_at: Utc::now(),
            },
        );
        m
    }

    #[test]
    fn new_references_are_exported_without_hashing() {
        let refs = vec![r("repo/a:1"), r("repo/b:1")];
        let plan = ExportPlanner::plan(&refs, &ArchiveManifest::new(), |_| {
            panic!("state should not be consulted")
        });
        assert_eq!(plan.export_count(), 2);
    }

    #[test]
    fn matching_fingerprint_is_skipped() {
        let a = r("repo/a:1");
        let manifest = manifest_with(&a, b"tar bytes");
        let plan = ExportPlanner::plan(&[a], &manifest, |_| ArchiveState::Present {
            size: 9,
            sha256: ContentHash::from_bytes(b"tar bytes"),
        });
        assert_eq!(plan.skip_count(), 1);
    }

    #[test]
    fn changed_or_missing_archive_is_re_exported() {
        let a = r("repo/a:1");
        let manifest = manifest_with(&a, b"tar bytes");

        let changed = ExportPlanner::plan(&[a.clone()], &manifest, |_| ArchiveState::Present {
            size: 9,
            sha256: ContentHash::from_bytes(b"tar bytez"),
        });
        assert_eq!(changed.export_count(), 1);

        let missing = ExportPlanner::plan(&[a], &manifest, |_| ArchiveState::Missing);
        assert_eq!(missing.export_count(), 1);
    }

    #[test]
    fn collision_within_run_refuses_second_reference() {
        let refs = vec![r("a/b:c"), r("a_b:c")];
        let plan = ExportPlanner::plan(&refs, &ArchiveManifest::new(), |_| ArchiveState::Missing);

        assert_eq!(plan.export_count(), 1);
        let collisions: Vec<_> = plan.collisions().collect();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].reference, r("a_b:c"));
        assert_eq!(
            collisions[0].action,
            ExportAction::Collision {
                claimed_by: r("a/b:c")
            }
        );
    }

    #[test]
    fn collision_with_earlier_export_is_refused() {
        let earlier = r("a/b:c");
        let manifest = manifest_with(&earlier, b"x");
        let plan = ExportPlanner::plan(&[r("a_b:c")], &manifest, |_| ArchiveState::Missing);
        assert_eq!(plan.collisions().count(), 1);
    }
}
