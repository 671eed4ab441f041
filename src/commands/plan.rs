//! Plan command handler

use std::path::PathBuf;

use anyhow::Result;

use sifter::application::PlanOptions;
use sifter::error::{exit_code, SifterError};
use sifter::infrastructure::tools::head_short_sha;
use sifter::presentation::factory;

use super::Context;

pub fn cmd_plan(
    ctx: &Context,
    targets: Vec<String>,
    tag: String,
    sha: Option<String>,
    out: PathBuf,
    register: bool,
) -> Result<i32> {
    let catalog = ctx.config.catalog().map_err(|e| SifterError::Config(e.into()))?;

    let short_sha = match sha {
        Some(sha) => sha,
        None => head_short_sha(&ctx.cwd).map_err(|e| {
            SifterError::Usage(format!("cannot read the commit sha ({e}); pass --sha"))
        })?,
    };

    let options = PlanOptions {
        targets,
        version: tag,
        short_sha,
        out,
        register,
    };
    let use_case = factory::create_plan_use_case(&ctx.config, ctx.registry_flag());
    let result = use_case.execute(&catalog, &options)?;

    ctx.emit(ctx.renderer.plan(&result));
    Ok(exit_code::SUCCESS)
}
