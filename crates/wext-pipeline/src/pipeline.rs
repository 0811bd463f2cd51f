//! Pipeline orchestration.
//!
//! One [`Pipeline`] run walks the state machine
//! `Configured -> Cleaning -> Building -> PagesGenerated -> Packaged`. The
//! four Building stages (scripts, styles, static assets, manifest) have no
//! data dependency on one another and run as concurrent blocking tasks; all
//! of them join before page generation, because page templates need the
//! already-emitted bundle and stylesheet names. No stage retries; a failure
//! halts the run and leaves partial output in place for inspection, since the
//! next invocation's clean stage removes it.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};
use wext_config::{BuildEnvironment, EntryGraph, OutputLayout, ProjectConfig};

use crate::assets;
use crate::clean;
use crate::error::{PipelineError, Result, Stage, StageError};
use crate::manifest;
use crate::package;
use crate::pages;
use crate::transform::{PassthroughTransformer, ScriptTransformer, StyleTransformer};

/// Observable pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Configured,
    Cleaning,
    Building,
    PagesGenerated,
    Packaged,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Configured => "configured",
            PipelineState::Cleaning => "cleaning",
            PipelineState::Building => "building",
            PipelineState::PagesGenerated => "pages-generated",
            PipelineState::Packaged => "packaged",
        };
        f.write_str(name)
    }
}

/// Summary of a successful build.
#[derive(Debug)]
pub struct BuildReport {
    pub archive: std::path::PathBuf,
    pub bundles: usize,
    pub pages: usize,
    pub assets: usize,
    pub duration: Duration,
}

/// A configured build pipeline for one (mode, browser) invocation.
pub struct Pipeline {
    env: BuildEnvironment,
    project: ProjectConfig,
    graph: EntryGraph,
    scripts: Arc<dyn ScriptTransformer>,
    styles: Arc<dyn StyleTransformer>,
}

impl Pipeline {
    /// Construct the pipeline, validating the entry graph eagerly. No
    /// filesystem write happens here: a configuration error surfaces before
    /// any output directory exists.
    pub fn new(env: BuildEnvironment, project: ProjectConfig) -> wext_config::Result<Self> {
        let graph = project.entry_graph()?;
        Ok(Self {
            env,
            project,
            graph,
            scripts: Arc::new(PassthroughTransformer),
            styles: Arc::new(PassthroughTransformer),
        })
    }

    /// Swap in real transform collaborators.
    pub fn with_transformers(
        mut self,
        scripts: Arc<dyn ScriptTransformer>,
        styles: Arc<dyn StyleTransformer>,
    ) -> Self {
        self.scripts = scripts;
        self.styles = styles;
        self
    }

    pub fn env(&self) -> &BuildEnvironment {
        &self.env
    }

    pub fn graph(&self) -> &EntryGraph {
        &self.graph
    }

    pub fn layout(&self) -> OutputLayout {
        self.env.layout_under(&self.project.root)
    }

    /// Run the whole pipeline once.
    pub async fn run(&self) -> Result<BuildReport> {
        let started = Instant::now();
        let layout = self.layout();
        let mode = self.env.mode;

        let mut state = PipelineState::Configured;
        advance(&mut state, PipelineState::Cleaning);
        clean::clean(&layout).map_err(|err| err.at(Stage::Clean))?;
        std::fs::create_dir_all(layout.root())
            .map_err(|err| StageError::Io(err).at(Stage::Clean))?;

        advance(&mut state, PipelineState::Building);
        let scripts_task = {
            let (graph, project, layout) = (self.graph.clone(), self.project.clone(), layout.clone());
            let transformer = Arc::clone(&self.scripts);
            tokio::task::spawn_blocking(move || {
                assets::bundle_scripts(&graph, &project, &layout, transformer.as_ref(), mode)
                    .map_err(|err| err.at(Stage::Scripts))
            })
        };
        let styles_task = {
            let (graph, project, layout) = (self.graph.clone(), self.project.clone(), layout.clone());
            let transformer = Arc::clone(&self.styles);
            tokio::task::spawn_blocking(move || {
                assets::bundle_styles(&graph, &project, &layout, transformer.as_ref(), mode)
                    .map_err(|err| err.at(Stage::Styles))
            })
        };
        let assets_task = {
            let (project, layout) = (self.project.clone(), layout.clone());
            tokio::task::spawn_blocking(move || {
                assets::copy_static_assets(&project, &layout).map_err(|err| err.at(Stage::Assets))
            })
        };
        let manifest_task = {
            let (project, layout) = (self.project.clone(), layout.clone());
            tokio::task::spawn_blocking(move || {
                manifest::write_manifest(&project, &layout).map_err(|err| err.at(Stage::Manifest))
            })
        };

        // Await every task before surfacing any error: a task left running
        // past this function would keep writing into the output root and race
        // the next invocation's clean stage.
        let bundles = join(scripts_task, Stage::Scripts).await;
        let styled = join(styles_task, Stage::Styles).await;
        let copied = join(assets_task, Stage::Assets).await;
        let manifest_result = join(manifest_task, Stage::Manifest).await;

        let bundles = bundles?;
        let styled = styled?;
        let copied = copied?;
        manifest_result?;

        advance(&mut state, PipelineState::PagesGenerated);
        let page_count = pages::generate_pages(&self.graph, &self.project, &layout, &styled)
            .map_err(|err| err.at(Stage::Pages))?;

        advance(&mut state, PipelineState::Packaged);
        let archive = package::archive(&layout, self.env.compression_level)
            .map_err(|err| err.at(Stage::Package))?;

        let duration = started.elapsed();
        info!(
            mode = %self.env.mode,
            browser = %self.env.browser,
            bundles,
            pages = page_count,
            archive = %archive.display(),
            ?duration,
            "build succeeded"
        );

        Ok(BuildReport {
            archive,
            bundles,
            pages: page_count,
            assets: copied,
            duration,
        })
    }
}

fn advance(state: &mut PipelineState, next: PipelineState) {
    debug!(from = %state, to = %next, "pipeline transition");
    *state = next;
}

async fn join<T>(
    handle: tokio::task::JoinHandle<Result<T>>,
    stage: Stage,
) -> Result<T> {
    match handle.await {
        Ok(result) => result,
        Err(err) => Err(PipelineError {
            stage,
            source: StageError::Join(err),
        }),
    }
}
