//! Registry command handlers

use anyhow::Result;

use sifter::domain::value_objects::LogicalImageKey;
use sifter::error::{exit_code, SifterError};
use sifter::presentation::{factory, RegistryAction};

use super::Context;

pub fn cmd_registry(ctx: &Context, action: RegistryAction) -> Result<i32> {
    let registry = factory::create_registry_use_case(&ctx.config, ctx.registry_flag());
    let location = registry.location().to_path_buf();

    match action {
        RegistryAction::List => {
            let document = registry.list().map_err(SifterError::from)?;
            ctx.emit(ctx.renderer.registry_list(&document, &location));
            Ok(exit_code::SUCCESS)
        }
        RegistryAction::Merge { file } => {
            let report = registry.merge_file(&file)?;
            ctx.emit(ctx.renderer.registry_merge(&report, &location));
            Ok(exit_code::SUCCESS)
        }
        RegistryAction::Verify { require } => {
            let required = require
                .iter()
                .map(|key| {
                    LogicalImageKey::new(key.as_str())
                        .map_err(|e| SifterError::Usage(format!("--require {key}: {e}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let report = registry.verify(&required).map_err(SifterError::from)?;
            ctx.emit(ctx.renderer.registry_verify(&report, &location));
            Ok(report.exit_code())
        }
    }
}
