//! Scenario-driven render cycles for [ecochart].
//!
//! [ecochart]: https://github.com/nelusnegur/ecochart
//!
//! A [`scenario::ScenarioConfig`] names a dataset, a transformer and a
//! layout. A [`pipeline::Pipeline`] runs them as one cycle and a
//! [`controller::Controller`] decides which cycle's scene is shown.

pub mod controller;
pub mod error;
pub mod pipeline;
pub mod scenario;

pub use crate::controller::Controller;
pub use crate::error::PipelineError;
pub use crate::pipeline::Pipeline;
pub use crate::pipeline::UiState;
pub use crate::scenario::ScenarioConfig;
