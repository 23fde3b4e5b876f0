//! Scenario configuration: which data, transformer and layout make up one
//! chart.

use std::fs;
use std::path::Path;

use ecochart_data::FilterSpec;
use ecochart_data::transform::TransformSpec;
use ecochart_vis::LayoutSpec;
use ecochart_vis::icon::IconTable;
use serde::Deserialize;
use serde::Serialize;

use crate::error::PipelineError;
use crate::error::Result;

const DEFAULT_TARGET: &str = "container";

const BUILTIN: [(&str, &str); 8] = [
    ("bar-chart", include_str!("../scenarios/bar-chart.toml")),
    ("yearly-circles", include_str!("../scenarios/yearly-circles.toml")),
    ("food-circles", include_str!("../scenarios/food-circles.toml")),
    ("food-breakdown", include_str!("../scenarios/food-breakdown.toml")),
    ("screen-time-squares", include_str!("../scenarios/screen-time-squares.toml")),
    ("screen-time-icons", include_str!("../scenarios/screen-time-icons.toml")),
    ("app-food-icons", include_str!("../scenarios/app-food-icons.toml")),
    ("app-food-treemap", include_str!("../scenarios/app-food-treemap.toml")),
];

/// One chart: where its data comes from and how it is reshaped and laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    #[serde(default)]
    pub title: String,
    /// Location of the dataset, a URL or a path relative to the data
    /// directory.
    pub source: String,
    /// The id of the page element that hosts the chart.
    #[serde(default = "default_target")]
    pub target: String,
    /// Control values used when none are given.
    #[serde(default)]
    pub controls: FilterSpec,
    /// Control changes only clear the chart; a cycle runs on calculate.
    #[serde(default)]
    pub wait_for_calculate: bool,
    pub transform: TransformSpec,
    pub layout: LayoutSpec,
    #[serde(default)]
    pub icons: IconTable,
}

fn default_target() -> String {
    String::from(DEFAULT_TARGET)
}

impl ScenarioConfig {
    pub fn parse(text: &str) -> Result<ScenarioConfig> {
        toml::from_str(text).map_err(|error| PipelineError::Config(error.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<ScenarioConfig> {
        let text = fs::read_to_string(path).map_err(|error| {
            PipelineError::Config(format!("could not read `{}`: {error}", path.display()))
        })?;

        Self::parse(&text)
    }

    pub fn builtin(name: &str) -> Result<ScenarioConfig> {
        let (_, text) = BUILTIN
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .ok_or_else(|| PipelineError::UnknownScenario(name.to_owned()))?;

        Self::parse(text)
    }

    /// Resolves a built-in scenario name, or else reads a scenario file.
    pub fn load(name_or_path: &str) -> Result<ScenarioConfig> {
        if builtin_names().any(|name| name == name_or_path) {
            return Self::builtin(name_or_path);
        }

        let path = Path::new(name_or_path);
        if path.exists() {
            Self::from_file(path)
        } else {
            Err(PipelineError::UnknownScenario(name_or_path.to_owned()))
        }
    }

    /// The configured control values overridden by the given ones.
    pub fn controls_with(&self, overrides: &FilterSpec) -> FilterSpec {
        FilterSpec {
            bucket: overrides.bucket.clone().or_else(|| self.controls.bucket.clone()),
            combination: if overrides.combination.is_empty() {
                self.controls.combination.clone()
            } else {
                overrides.combination.clone()
            },
            highlight: overrides
                .highlight
                .clone()
                .or_else(|| self.controls.highlight.clone()),
        }
    }
}

pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(name, _)| *name)
}
