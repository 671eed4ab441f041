//! Pull command handler

use std::path::PathBuf;

use anyhow::Result;

use sifter::application::PullOptions;
use sifter::domain::value_objects::LocatorStyle;
use sifter::error::SifterError;
use sifter::presentation::factory;

use super::Context;

pub fn cmd_pull(
    ctx: &Context,
    out_dir: Option<PathBuf>,
    locator: Option<LocatorStyle>,
    dry_run: bool,
) -> Result<i32> {
    let catalog = ctx.config.catalog().map_err(|e| SifterError::Config(e.into()))?;

    let mut options = PullOptions::from_config(
        &ctx.config.pull,
        locator.unwrap_or(ctx.config.convert.locator),
    );
    if let Some(out_dir) = out_dir {
        options.out_dir = out_dir;
    }
    options.dry_run = dry_run;

    let use_case = factory::create_pull_use_case(&ctx.config, ctx.registry_flag());
    let result = use_case.execute(&catalog, &options, &ctx.cancel)?;

    ctx.emit(ctx.renderer.pull(&result));
    Ok(result.exit_code())
}
