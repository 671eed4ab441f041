//! Export command handler

use std::path::PathBuf;

use anyhow::Result;

use sifter::application::ExportOptions;
use sifter::presentation::factory;

use super::Context;

pub fn cmd_export(ctx: &Context, tags_file: PathBuf, out_dir: PathBuf, dry_run: bool) -> Result<i32> {
    let mut options = ExportOptions::from_config(tags_file, out_dir, &ctx.config.export);
    options.dry_run = dry_run;

    let use_case = factory::create_export_use_case(&ctx.config);
    let result = use_case.execute(&options, &ctx.cancel)?;

    ctx.emit(ctx.renderer.export(&result));
    Ok(result.exit_code())
}
