use std::env;
use std::path::PathBuf;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use ecochart_data::FilterSpec;

use crate::error::CliError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Increase the log verbosity: `-v` for debug, `-vv` for trace.
    /// `RUST_LOG` takes precedence when it is set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub(crate) verbose: u8,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run one cycle of a scenario and write the chart page.
    Render(ScenarioArgs),
    /// List the built-in scenarios.
    Scenarios,
    /// Read control changes from the standard input and redraw the chart
    /// page after every cycle.
    Session(ScenarioArgs),
}

#[derive(Args)]
pub(crate) struct ScenarioArgs {
    /// The name of a built-in scenario or the path to a scenario file.
    pub(crate) scenario: String,

    /// Specify the directory that relative data and icon locations are
    /// read from. If it is not specified then the current working
    /// directory is used.
    #[arg(short, long, value_parser(parse_path))]
    pub(crate) data_path: Option<PathBuf>,

    /// Specify the path where the page will be created.
    /// If the output path is not specified then the current working
    /// directory is used.
    #[arg(short, long, value_parser(parse_path))]
    pub(crate) output_path: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) controls: ControlArgs,
}

#[derive(Args)]
pub(crate) struct ControlArgs {
    /// The selected bucket, e.g. `less3`.
    #[arg(short, long)]
    pub(crate) bucket: Option<String>,

    /// A selected app. Repeat it to select a combination.
    #[arg(short, long = "app")]
    pub(crate) apps: Vec<String>,

    /// The highlighted category, e.g. `banana`.
    #[arg(long)]
    pub(crate) highlight: Option<String>,
}

impl ControlArgs {
    pub(crate) fn into_filter(self) -> FilterSpec {
        FilterSpec::new(self.bucket, self.apps, self.highlight)
    }
}

fn parse_path(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);

    if !path.exists() {
        return Err(format!("The `{}` path does not exist.", path.display()));
    }

    if !path.is_dir() {
        return Err(format!(
            "The `{}` path must point to a directory.",
            path.display()
        ));
    }

    Ok(path)
}

pub(crate) trait PathExt {
    fn or_current_dir(self) -> Result<PathBuf, CliError>;
}

impl PathExt for Option<PathBuf> {
    fn or_current_dir(self) -> Result<PathBuf, CliError> {
        if let Some(path) = self {
            Ok(path)
        } else {
            env::current_dir().map_err(|e| CliError::Path(e.to_string()))
        }
    }
}
