//! One-shot build command: resolve the environment, run the pipeline once,
//! report the archive.

use tracing::info;
use wext_config::{BuildEnvironment, ProjectConfig};
use wext_pipeline::Pipeline;

use crate::cli::BuildArgs;
use crate::error::Result;

pub async fn execute(args: BuildArgs) -> Result<()> {
    let env = BuildEnvironment::resolve(args.mode.as_deref(), args.browser.as_deref())?;
    let project = ProjectConfig::load(&args.root)?;

    info!(mode = %env.mode, browser = %env.browser, "building extension");

    let pipeline = Pipeline::new(env, project)?;
    let report = pipeline.run().await?;

    info!(
        archive = %report.archive.display(),
        bundles = report.bundles,
        pages = report.pages,
        assets = report.assets,
        duration = ?report.duration,
        "packaged extension"
    );
    Ok(())
}
