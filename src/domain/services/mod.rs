//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod export_planner;
mod pull_selection;
mod rebinder;
mod tag_planner;

pub use export_planner::{ArchiveState, ExportAction, ExportPlan, ExportPlanner, PlannedExport};
pub use pull_selection::{select_pulls, unbuilt_keys, PullCandidate, PullSelection};
pub use rebinder::aliases_for;
pub use tag_planner::{plan, resolve_targets, PlanError};
