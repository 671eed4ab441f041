//! Convert command handler

use std::path::PathBuf;

use anyhow::Result;

use sifter::application::ConvertOptions;
use sifter::domain::value_objects::LocatorStyle;
use sifter::presentation::factory;

use super::Context;

pub fn cmd_convert(
    ctx: &Context,
    archive_dir: PathBuf,
    image_dir: Option<PathBuf>,
    locator: Option<LocatorStyle>,
    dry_run: bool,
) -> Result<i32> {
    let mut options = ConvertOptions::from_config(archive_dir, &ctx.config.convert);
    if image_dir.is_some() {
        options.image_dir = image_dir;
    }
    if let Some(locator) = locator {
        options.locator = locator;
    }
    options.dry_run = dry_run;

    let use_case = factory::create_convert_use_case(&ctx.config, ctx.registry_flag());
    let result = use_case.execute(&options, &ctx.cancel)?;

    ctx.emit(ctx.renderer.convert(&result));
    Ok(result.exit_code())
}
