//! Plan Use Case
//!
//! Resolves the requested targets into image references, writes the tags
//! file for the build, and optionally records the references in the
//! registry so development-host workflows resolve before conversion.

use std::path::PathBuf;

use crate::domain::entities::{collect_entries, Catalog, EntrySource, MergeReport, TagsFile};
use crate::domain::ports::RegistryRepository;
use crate::domain::services;
use crate::domain::value_objects::{ImageReference, ReleaseVersion};
use crate::error::SifterResult;
use crate::infrastructure::fs::write_atomic;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Target names, possibly including `all`
    pub targets: Vec<String>,
    /// `<date>-<release>`
    pub version: String,
    pub short_sha: String,
    pub out: PathBuf,
    /// Record every planned reference as a local-build registry entry
    pub register: bool,
}

#[derive(Debug, Clone)]
pub struct PlanResult {
    pub version: ReleaseVersion,
    pub references: Vec<ImageReference>,
    pub tags_file: PathBuf,
    pub registered: Option<MergeReport>,
}

pub struct PlanUseCase<R: RegistryRepository> {
    registry: R,
}

impl<R: RegistryRepository> PlanUseCase<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn execute(&self, catalog: &Catalog, options: &PlanOptions) -> SifterResult<PlanResult> {
        let version = ReleaseVersion::from_version_string(&options.version, &options.short_sha)?;
        let references = services::plan(catalog, &options.targets, &version)?;

        // Read before anything is written so a corrupt registry leaves no tags file behind.
        let base = if options.register {
            Some(self.registry.load()?)
        } else {
            None
        };

        let tags = TagsFile::new(references);
        write_atomic(&options.out, tags.render().as_bytes())?;
        tracing::info!(
            tags_file = %options.out.display(),
            count = tags.references().len(),
            "wrote tags file"
        );

        let registered = match base {
            Some(base) => {
                let batch = collect_entries(tags.references().iter().map(|reference| {
                    EntrySource::LocalBuild {
                        reference: reference.clone(),
                    }
                }));
                Some(self.registry.merge(&base, &batch)?)
            }
            None => None,
        };

        Ok(PlanResult {
            version,
            references: tags.references().to_vec(),
            tags_file: options.out.clone(),
            registered,
        })
    }
}
