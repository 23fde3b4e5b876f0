use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use ecochart_data::FilterSpec;
use ecochart_data::source::Source;
use ecochart_pipeline::Pipeline;
use ecochart_pipeline::ScenarioConfig;
use ecochart_pipeline::UiState;
use ecochart_vis::render::OutputStream;
use ecochart_vis::render::Render;
use ecochart_vis::render::error::RenderError;
use ecochart_vis::render::output::OutputFile;
use ecochart_vis::render::output::PAGE_FILE_NAME;
use ecochart_vis::render::output::SVG_FILE_NAME;
use ecochart_vis::render::page::Page;
use ecochart_vis::render::surface::Surface;
use tracing::info;

use crate::cli::PathExt;
use crate::cli::ScenarioArgs;
use crate::error::CliError;

/// A scenario resolved from the command line, ready to run.
pub(crate) struct Prepared {
    pub(crate) scenario: ScenarioConfig,
    pub(crate) pipeline: Pipeline,
    pub(crate) controls: FilterSpec,
    pub(crate) writer: PageWriter,
}

pub(crate) fn prepare(args: ScenarioArgs) -> Result<Prepared, CliError> {
    let data_path = args.data_path.or_current_dir()?;
    let output_path = args.output_path.or_current_dir()?;

    let scenario = ScenarioConfig::load(&args.scenario)?;
    let controls = scenario.controls_with(&args.controls.into_filter());
    let pipeline = Pipeline::from_scenario(&scenario, Arc::new(Source::new(data_path)));
    let writer = PageWriter::new(output_path, &scenario.title);

    Ok(Prepared {
        scenario,
        pipeline,
        controls,
        writer,
    })
}

pub(crate) fn render(args: ScenarioArgs) -> Result<(), CliError> {
    let Prepared {
        scenario,
        pipeline,
        controls,
        writer,
    } = prepare(args)?;

    println!(
        "ecochart renders the `{}` scenario into: `{}`",
        scenario.name,
        writer.dir().display()
    );

    let mut surface = Surface::new(&scenario.target);

    match pipeline.render_cycle(&UiState::new(controls.clone())) {
        Ok(scene) => {
            surface.draw(&scene)?;
            let path = writer.write(&surface, &controls, None)?;
            println!("wrote `{}`", path.display());
            Ok(())
        }
        Err(error) => {
            writer.write(&surface, &controls, Some(&error.alert_message()))?;
            Err(error.into())
        }
    }
}

/// Writes the page, and the bare chart when one is drawn, into a directory.
pub(crate) struct PageWriter {
    dir: PathBuf,
    title: String,
}

impl PageWriter {
    pub(crate) fn new(dir: impl Into<PathBuf>, title: &str) -> PageWriter {
        Self {
            dir: dir.into(),
            title: title.to_owned(),
        }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn write(
        &self,
        surface: &Surface,
        controls: &FilterSpec,
        alert: Option<&str>,
    ) -> Result<PathBuf, CliError> {
        let mut page = Page::new(&self.title, surface);
        let summary = describe(controls);
        if !summary.is_empty() {
            page = page.controls(summary);
        }
        if let Some(alert) = alert {
            page = page.alert(alert);
        }

        let mut file = OutputFile::new(&self.dir, PAGE_FILE_NAME)?;
        page.render(&mut file)?;
        let path = file.finish()?;

        match surface.svg() {
            Some(svg) => {
                let mut file = OutputFile::new(&self.dir, SVG_FILE_NAME)?;
                file.write(svg)?;
                file.finish()?;
            }
            None => remove_stale(&self.dir.join(SVG_FILE_NAME))?,
        }

        info!(path = %path.display(), alert = alert.is_some(), "page written");
        Ok(path)
    }
}

fn remove_stale(path: &Path) -> Result<(), CliError> {
    match fs::remove_file(path) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => Err(RenderError::from(error).into()),
        _ => Ok(()),
    }
}

/// A one-line summary of the control values.
pub(crate) fn describe(controls: &FilterSpec) -> String {
    let mut parts = Vec::new();

    if let Some(ref bucket) = controls.bucket {
        parts.push(format!("bucket: {bucket}"));
    }
    if !controls.combination.is_empty() {
        parts.push(format!("apps: {}", controls.combination.join(", ")));
    }
    if let Some(ref highlight) = controls.highlight {
        parts.push(format!("highlight: {highlight}"));
    }

    parts.join(" | ")
}
