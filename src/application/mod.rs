//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `PlanUseCase` - Resolves targets into a tags file
//! - `ExportUseCase` - Saves images into archives plus a manifest
//! - `ConvertUseCase` - Rebuilds archives into runtime images
//! - `PullUseCase` - Fetches images no target builds
//! - `RegistryUseCase` - Lists, merges and verifies the registry
//!
//! Export, convert and pull share the worker pool in `pool` and the item
//! bookkeeping in `outcome`.

pub mod convert;
pub mod export;
pub mod outcome;
pub mod plan;
pub mod pool;
pub mod pull;
pub mod registry;

pub use convert::{ConvertOptions, ConvertResult, ConvertUseCase, ConvertedImage};
pub use export::{ExportOptions, ExportResult, ExportUseCase, ExportedArchive};
pub use outcome::ItemFailure;
pub use plan::{PlanOptions, PlanResult, PlanUseCase};
pub use pool::{run_bounded, CancelToken};
pub use pull::{PullOptions, PullResult, PullUseCase, PulledImage};
pub use registry::{RegistryUseCase, VerifyReport, Violation};
