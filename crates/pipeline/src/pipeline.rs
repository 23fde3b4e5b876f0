//! The fetch, transform, layout cycle shared by every scenario.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use ecochart_data::DataSource;
use ecochart_data::FilterSpec;
use ecochart_data::RawDataset;
use ecochart_data::Transformer;
use ecochart_data::error::FetchError;
use ecochart_vis::LayoutStrategy;
use ecochart_vis::Scene;
use ecochart_vis::error::LayoutError;
use ecochart_vis::icon::IconAsset;
use ecochart_vis::icon::IconTable;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::Result;
use crate::scenario::ScenarioConfig;

/// The state of the page controls a cycle runs for.
///
/// It is replaced as a whole whenever a control changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub filter: FilterSpec,
}

impl UiState {
    pub fn new(filter: FilterSpec) -> UiState {
        Self { filter }
    }
}

/// A data source, a transformer and a layout strategy wired together.
pub struct Pipeline {
    name: String,
    location: String,
    source: Arc<dyn DataSource>,
    transformer: Box<dyn Transformer>,
    layout: Box<dyn LayoutStrategy>,
    icons: IconTable,
}

#[derive(Debug, thiserror::Error)]
enum IconError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] LayoutError),
}

impl Pipeline {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        source: Arc<dyn DataSource>,
        transformer: Box<dyn Transformer>,
        layout: Box<dyn LayoutStrategy>,
    ) -> Pipeline {
        Self {
            name: name.into(),
            location: location.into(),
            source,
            transformer,
            layout,
            icons: IconTable::default(),
        }
    }

    pub fn from_scenario(scenario: &ScenarioConfig, source: Arc<dyn DataSource>) -> Pipeline {
        Self::new(
            scenario.name.clone(),
            scenario.source.clone(),
            source,
            Box::new(scenario.transform.clone()),
            Box::new(scenario.layout.clone()),
        )
        .with_icons(scenario.icons.clone())
    }

    pub fn with_icons(mut self, icons: IconTable) -> Self {
        self.icons = icons;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs one full cycle: fetches the dataset, builds the scene and
    /// attaches the icons it refers to.
    pub fn render_cycle(&self, state: &UiState) -> Result<Scene> {
        info!(scenario = %self.name, "cycle started");

        let raw = self.source.fetch(&self.location)?;
        let mut scene = self.build_scene(&raw, state)?;
        self.attach_icons(&mut scene);

        info!(scenario = %self.name, elements = scene.elements.len(), "cycle finished");
        Ok(scene)
    }

    /// Transforms `raw` for `state` and lays out the result.
    pub fn build_scene(&self, raw: &RawDataset, state: &UiState) -> Result<Scene> {
        let data = self.transformer.normalize(raw, &state.filter)?;
        debug!(scenario = %self.name, empty = data.is_empty(), "normalized dataset");

        Ok(self.layout.layout(&data)?)
    }

    /// Loads every icon the scene refers to, concurrently, and attaches each
    /// one to its cells. A failed icon is logged and leaves its cells blank.
    pub fn attach_icons(&self, scene: &mut Scene) {
        let names = scene.icon_names();
        if names.is_empty() {
            return;
        }

        let source = self.source.as_ref();
        let assets: HashMap<String, Arc<IconAsset>> = thread::scope(|scope| {
            let loads: Vec<_> = names
                .iter()
                .map(|name| {
                    let location = self.icons.location(name);
                    scope.spawn(move || load_icon(source, &location).map_err(|e| (location, e)))
                })
                .collect();

            names
                .iter()
                .zip(loads)
                .filter_map(|(name, load)| match load.join() {
                    Ok(Ok(asset)) => Some((name.clone(), Arc::new(asset))),
                    Ok(Err((location, error))) => {
                        warn!(icon = %name, %location, %error, "could not load icon");
                        None
                    }
                    Err(_) => {
                        warn!(icon = %name, "icon loader panicked");
                        None
                    }
                })
                .collect()
        });

        debug!(requested = names.len(), loaded = assets.len(), "attached icons");

        for (name, slot) in scene.icons_mut() {
            *slot = assets.get(name).cloned();
        }
    }
}

fn load_icon(source: &dyn DataSource, location: &str) -> std::result::Result<IconAsset, IconError> {
    let text = source.fetch_text(location)?;
    Ok(IconAsset::parse(&text)?)
}
