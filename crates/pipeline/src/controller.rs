//! The page controller: it turns control events into render cycles and keeps
//! a stale cycle from overwriting a newer one.
//!
//! ```text
//! Idle --ControlsChanged--> AwaitingSelection --Calculate--> Calculating
//!                                  ^                              |
//!                                  |                         Completed
//!                           ControlsChanged                       v
//!                                  +------------------------ Rendered
//! ```
//!
//! A scenario without an explicit calculate step moves straight from a
//! control change to `Calculating`.

use ecochart_data::FilterSpec;
use ecochart_vis::Scene;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::PipelineError;
use crate::pipeline::UiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    AwaitingSelection,
    Calculating,
    Rendered,
}

#[derive(Debug)]
pub enum Event {
    ControlsChanged(FilterSpec),
    Calculate,
    Highlight(String),
    Completed(Ticket, Result<Scene, PipelineError>),
}

/// What the host should do after an event.
#[derive(Debug, PartialEq)]
pub enum Effect {
    Ignored,
    /// The chart was cleared and nothing is drawn until the next cycle.
    Cleared,
    /// Run a cycle for the ticket and report back with
    /// [`Event::Completed`].
    Start(Ticket),
    /// The scene of the latest cycle is current.
    Rendered,
    /// The latest cycle failed; the chart stays empty until the next
    /// calculate.
    Alert(String),
    /// A completion for a superseded cycle; nothing changed.
    Discarded,
}

/// Identifies one cycle and carries the state it runs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    state: UiState,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }
}

pub struct Controller {
    state: PageState,
    ui: UiState,
    generation: u64,
    explicit_calculate: bool,
    scene: Option<Scene>,
}

impl Controller {
    /// A controller whose cycles start on [`Event::Calculate`].
    pub fn new(initial: UiState) -> Controller {
        Self {
            state: PageState::Idle,
            ui: initial,
            generation: 0,
            explicit_calculate: true,
            scene: None,
        }
    }

    /// A controller that starts a cycle on every control change.
    pub fn immediate(initial: UiState) -> Controller {
        Self {
            explicit_calculate: false,
            ..Self::new(initial)
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// The scene on display, if any.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Starts the first cycle for the initial control state.
    pub fn start(&mut self) -> Effect {
        self.begin()
    }

    pub fn handle(&mut self, event: Event) -> Effect {
        match event {
            Event::ControlsChanged(filter) => {
                self.ui = UiState::new(filter);
                self.scene = None;

                if self.explicit_calculate {
                    self.generation += 1;
                    self.state = PageState::AwaitingSelection;
                    debug!(generation = self.generation, "controls changed, awaiting calculate");
                    Effect::Cleared
                } else {
                    self.begin()
                }
            }
            Event::Calculate => match self.state {
                PageState::AwaitingSelection | PageState::Rendered => self.begin(),
                PageState::Idle | PageState::Calculating => Effect::Ignored,
            },
            Event::Highlight(highlight) => match self.state {
                PageState::Rendered | PageState::Calculating => {
                    self.ui = UiState::new(self.ui.filter.with_highlight(highlight));
                    self.begin()
                }
                PageState::Idle | PageState::AwaitingSelection => Effect::Ignored,
            },
            Event::Completed(ticket, result) => self.complete(ticket, result),
        }
    }

    fn begin(&mut self) -> Effect {
        self.generation += 1;
        self.state = PageState::Calculating;
        self.scene = None;
        debug!(generation = self.generation, "cycle requested");

        Effect::Start(Ticket {
            generation: self.generation,
            state: self.ui.clone(),
        })
    }

    fn complete(&mut self, ticket: Ticket, result: Result<Scene, PipelineError>) -> Effect {
        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale cycle"
            );
            return Effect::Discarded;
        }

        match result {
            Ok(scene) => {
                self.state = PageState::Rendered;
                info!(generation = ticket.generation, elements = scene.elements.len(), "scene rendered");
                self.scene = Some(scene);
                Effect::Rendered
            }
            Err(error) => {
                warn!(generation = ticket.generation, %error, "cycle failed");
                self.state = PageState::AwaitingSelection;
                self.scene = None;
                Effect::Alert(error.alert_message())
            }
        }
    }
}
