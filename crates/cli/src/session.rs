//! An interactive shell over the page controller.
//!
//! Commands are read line by line from the standard input:
//!
//! ```text
//! bucket less3
//! apps TikTok, Instagram
//! highlight banana
//! calculate
//! quit
//! ```
//!
//! Cycles run on a worker thread and report back over a channel, so a
//! control change may arrive while a cycle is still running. The
//! controller discards such a cycle once it completes.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::mpsc::Sender;
use std::thread;

use ecochart_data::FilterSpec;
use ecochart_pipeline::Controller;
use ecochart_pipeline::PipelineError;
use ecochart_pipeline::UiState;
use ecochart_pipeline::controller::Effect;
use ecochart_pipeline::controller::Event;
use ecochart_pipeline::controller::Ticket;
use ecochart_vis::Scene;
use ecochart_vis::render::surface::Surface;
use tracing::debug;
use tracing::info;

use crate::cli::ScenarioArgs;
use crate::error::CliError;
use crate::render::PageWriter;
use crate::render::Prepared;
use crate::render::prepare;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Bucket(String),
    Apps(Vec<String>),
    Highlight(String),
    Calculate,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines and `#` comments yield `None`.
    pub(crate) fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match name {
            "bucket" => Command::Bucket(required(name, rest)?),
            "apps" => Command::Apps(
                rest.split(',')
                    .flat_map(str::split_whitespace)
                    .map(str::to_owned)
                    .collect(),
            ),
            "highlight" => Command::Highlight(required(name, rest)?),
            "calculate" => Command::Calculate,
            "quit" | "exit" => Command::Quit,
            unknown => return Err(format!("unknown command `{unknown}`")),
        };

        Ok(Some(command))
    }

    fn into_event(self, current: &UiState) -> Option<Event> {
        match self {
            Command::Bucket(bucket) => Some(Event::ControlsChanged(FilterSpec {
                bucket: Some(bucket),
                ..current.filter.clone()
            })),
            Command::Apps(apps) => Some(Event::ControlsChanged(FilterSpec {
                combination: apps,
                ..current.filter.clone()
            })),
            Command::Highlight(highlight) => Some(Event::Highlight(highlight)),
            Command::Calculate => Some(Event::Calculate),
            Command::Quit => None,
        }
    }
}

fn required(command: &str, value: &str) -> Result<String, String> {
    if value.is_empty() {
        Err(format!("`{command}` needs a value"))
    } else {
        Ok(value.to_owned())
    }
}

enum Message {
    Input(String),
    Closed,
    Completed(Ticket, Result<Scene, PipelineError>),
}

pub(crate) fn session(args: ScenarioArgs) -> Result<(), CliError> {
    let Prepared {
        scenario,
        pipeline,
        controls,
        writer,
    } = prepare(args)?;

    println!(
        "ecochart runs a `{}` session and writes the page into: `{}`",
        scenario.name,
        writer.dir().display()
    );

    let (messages_tx, messages) = mpsc::channel();
    let (jobs, pending) = mpsc::channel::<Ticket>();

    let completions = messages_tx.clone();
    let worker = thread::spawn(move || {
        for ticket in pending {
            debug!(generation = ticket.generation(), "running cycle");
            let result = pipeline.render_cycle(ticket.state());

            if completions.send(Message::Completed(ticket, result)).is_err() {
                break;
            }
        }
    });

    thread::spawn(move || read_input(messages_tx));

    let initial = UiState::new(controls);
    let mut shell = Shell {
        controller: if scenario.wait_for_calculate {
            Controller::new(initial)
        } else {
            Controller::immediate(initial)
        },
        surface: Surface::new(&scenario.target),
        writer,
        jobs,
    };

    if !scenario.wait_for_calculate {
        let effect = shell.controller.start();
        shell.apply(effect)?;
    }

    for message in &messages {
        let effect = match message {
            Message::Input(line) => match Command::parse(&line) {
                Ok(Some(command)) => match command.into_event(shell.controller.ui()) {
                    Some(event) => shell.controller.handle(event),
                    None => break,
                },
                Ok(None) => continue,
                Err(error) => {
                    eprintln!("{error}");
                    continue;
                }
            },
            Message::Closed => break,
            Message::Completed(ticket, result) => shell.controller.handle(Event::Completed(ticket, result)),
        };

        shell.apply(effect)?;
    }

    drop(shell);
    worker.join().map_err(|_| CliError::Worker)
}

fn read_input(messages: Sender<Message>) {
    for line in io::stdin().lines() {
        let message = match line {
            Ok(line) => Message::Input(line),
            Err(error) => {
                eprintln!("{}", CliError::Input(error));
                break;
            }
        };

        if messages.send(message).is_err() {
            return;
        }
    }

    let _ = messages.send(Message::Closed);
}

struct Shell {
    controller: Controller,
    surface: Surface,
    writer: PageWriter,
    jobs: Sender<Ticket>,
}

impl Shell {
    fn apply(&mut self, effect: Effect) -> Result<(), CliError> {
        match effect {
            Effect::Start(ticket) => {
                info!(generation = ticket.generation(), "calculating");
                self.jobs.send(ticket).map_err(|_| CliError::Worker)?;
            }
            Effect::Cleared => {
                self.surface.clear();
                self.write(None)?;
            }
            Effect::Rendered => {
                if let Some(scene) = self.controller.scene() {
                    self.surface.draw(scene)?;
                }
                let path = self.write(None)?;
                println!("rendered `{}`", path.display());
            }
            Effect::Alert(message) => {
                self.surface.clear();
                self.write(Some(&message))?;
                eprintln!("{message}");
            }
            Effect::Ignored | Effect::Discarded => {}
        }

        Ok(())
    }

    fn write(&self, alert: Option<&str>) -> Result<PathBuf, CliError> {
        self.writer.write(&self.surface, &self.controller.ui().filter, alert)
    }
}
