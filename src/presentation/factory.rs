//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::{ConvertUseCase, ExportUseCase, PlanUseCase, PullUseCase, RegistryUseCase};
use crate::config::Config;
use crate::infrastructure::{ApptainerCli, DockerCli, JsonManifestRepository, JsonRegistryRepository};

/// Type alias for the concrete PlanUseCase with all dependencies
pub type ConcretePlanUseCase = PlanUseCase<JsonRegistryRepository>;

/// Type alias for the concrete ExportUseCase with all dependencies
pub type ConcreteExportUseCase = ExportUseCase<DockerCli, JsonManifestRepository>;

/// Type alias for the concrete ConvertUseCase with all dependencies
pub type ConcreteConvertUseCase =
    ConvertUseCase<ApptainerCli, JsonManifestRepository, JsonRegistryRepository>;

/// Type alias for the concrete PullUseCase with all dependencies
pub type ConcretePullUseCase = PullUseCase<ApptainerCli, JsonRegistryRepository>;

/// Registry document to use: `--registry` wins over the configuration.
pub fn registry_path(config: &Config, flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .unwrap_or_else(|| config.registry.path.clone())
}

fn registry_repository(config: &Config, flag: Option<&Path>) -> JsonRegistryRepository {
    JsonRegistryRepository::with_path(registry_path(config, flag))
}

pub fn create_plan_use_case(config: &Config, registry: Option<&Path>) -> ConcretePlanUseCase {
    PlanUseCase::new(registry_repository(config, registry))
}

pub fn create_export_use_case(config: &Config) -> ConcreteExportUseCase {
    ExportUseCase::new(
        DockerCli::new(config.export.backend.clone()),
        JsonManifestRepository::new(),
    )
}

pub fn create_convert_use_case(
    config: &Config,
    registry: Option<&Path>,
) -> ConcreteConvertUseCase {
    ConvertUseCase::new(
        ApptainerCli::new(config.convert.runtime.clone()),
        JsonManifestRepository::new(),
        registry_repository(config, registry),
    )
}

pub fn create_pull_use_case(config: &Config, registry: Option<&Path>) -> ConcretePullUseCase {
    PullUseCase::new(
        ApptainerCli::new(config.convert.runtime.clone()),
        registry_repository(config, registry),
    )
}

pub fn create_registry_use_case(config: &Config, registry: Option<&Path>) -> RegistryUseCase {
    RegistryUseCase::new(Arc::new(registry_repository(config, registry)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_flag_overrides_config() {
        let config = Config::default();
        assert_eq!(
            registry_path(&config, None),
            PathBuf::from("inputs/values/dockers.json")
        );
        assert_eq!(
            registry_path(&config, Some(Path::new("/tmp/r.json"))),
            PathBuf::from("/tmp/r.json")
        );
    }

    #[test]
    fn registry_use_case_points_at_resolved_path() {
        let config = Config::default();
        let use_case = create_registry_use_case(&config, Some(Path::new("x/dockers.json")));
        assert_eq!(use_case.location(), Path::new("x/dockers.json"));
    }

    #[test]
    fn factories_wire_configured_tools() {
        let mut config = Config::default();
        config.export.backend = "podman".into();
        let _export = create_export_use_case(&config);
        let _convert = create_convert_use_case(&config, None);
        let _pull = create_pull_use_case(&config, None);
        let _plan = create_plan_use_case(&config, None);
        // If this compiles, the factory is correctly wiring dependencies
    }
}
