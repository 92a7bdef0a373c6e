#![forbid(unsafe_code)]

//! cpviz demo binary: JSON in, SVG out.

mod cli;

use cli::{Hover, Opts};
use cpviz::data::{observations_from_json, profiles_from_json};
use cpviz::prelude::*;
use cpviz::{LayerKind, OptionsError};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug)]
enum DemoError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    Options(OptionsError),
    Plot(PlotError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Options(err) => write!(f, "{err}"),
            Self::Plot(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Options(err) => Some(err),
            Self::Plot(err) => Some(err),
        }
    }
}

impl From<PlotError> for DemoError {
    fn from(err: PlotError) -> Self {
        Self::Plot(err)
    }
}

fn read(path: &Path) -> std::result::Result<String, DemoError> {
    fs::read_to_string(path).map_err(|source| DemoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json(path: &Path) -> std::result::Result<serde_json::Value, DemoError> {
    serde_json::from_str(&read(path)?).map_err(|source| DemoError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn render(opts: &Opts) -> std::result::Result<String, DemoError> {
    let profiles = match &opts.profiles {
        Some(path) => profiles_from_json(&read_json(path)?)?,
        None => Vec::new(),
    };
    let observations = match &opts.observations {
        Some(path) => observations_from_json(&read_json(path)?)?,
        None => Vec::new(),
    };
    let mut options = match &opts.options {
        Some(path) => PlotOptions::from_json(&read(path)?).map_err(DemoError::Options)?,
        None => PlotOptions::default(),
    };
    if let Some(variables) = &opts.variables {
        options.variables = Some(variables.clone());
    }
    tracing::debug!(
        profiles = profiles.len(),
        observations = observations.len(),
        "inputs loaded"
    );

    let width = options.width.unwrap_or(600.0);
    let height = options.height.unwrap_or(400.0);
    let container = Container::new(width, height);
    let mut plot = create_plot(Some(&container), profiles, observations, &options)?;
    for err in plot.cell_errors() {
        eprintln!("warning: {err}");
    }

    if let Some((w, h)) = opts.resize {
        container.resize(w, h);
        plot.poll_viewport();
    }
    match &opts.hover {
        Some(Hover::Profile { id, model }) => {
            plot.hover_enter(
                HighlightTarget::Entity(JoinKey::new(id.as_str(), model.as_str())),
                HoverSource::Layer(LayerKind::Profiles),
            );
        }
        Some(Hover::TableRow { id, model }) => {
            plot.handle_table_event(TableEvent::RowEnter(JoinKey::new(
                id.as_str(),
                model.as_str(),
            )));
        }
        None => {}
    }

    let svg = plot.to_svg();
    plot.teardown();
    Ok(svg)
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let opts = Opts::parse();
    let svg = match render(&opts) {
        Ok(svg) => svg,
        Err(err) => {
            eprintln!("cpviz-demo: {err}");
            std::process::exit(1);
        }
    };
    let written = match &opts.out {
        Some(path) => fs::write(path, svg.as_bytes()),
        None => io::stdout().lock().write_all(svg.as_bytes()),
    };
    if let Err(err) = written {
        eprintln!("cpviz-demo: failed to write output: {err}");
        std::process::exit(1);
    }
}
