//! Track command: an interactive timer/stopwatch session.
//!
//! One line per command on stdin:
//!
//! | input            | action                                   |
//! |------------------|------------------------------------------|
//! | `p` or empty     | start, pause or resume                   |
//! | `s`              | stop and record the session              |
//! | `m [mode]`       | switch to `timer`/`stopwatch` or toggle  |
//! | `d <text>`       | set the session description              |
//! | `b <budget>`     | set the countdown budget (only while off)|
//! | `t`              | show the current state                   |
//! | `?`              | help                                     |
//! | `q`              | quit                                     |
//!
//! Quitting, closing stdin or pressing Ctrl-C while a session is unsaved
//! asks for confirmation once. Closing stdin while a timer runs waits for it
//! to expire instead.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::TimeZone;
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedReceiver;

use tk_core::{
    Clock, EntryStore, Notifier, Recorder, SessionEvent, Tracker, TrackerStatus, TrackingMode,
};

use super::util::{format_clock, parse_budget};

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Tracking mode (`timer` or `stopwatch`).
    #[arg(short, long)]
    pub mode: Option<TrackingMode>,
    /// Countdown budget, e.g. 25m, 1h30m, 90s.
    #[arg(short, long, value_parser = parse_budget)]
    pub budget: Option<i64>,
    /// Description of the work.
    #[arg(short, long)]
    pub description: Option<String>,
    /// Wait for `p` instead of starting right away.
    #[arg(long)]
    pub paused: bool,
}

const HELP: &str = "\
Commands:
  p        start / pause / resume
  s        stop and record
  m [mode] switch mode (timer, stopwatch)
  d <text> set description
  b <time> set budget while off (e.g. 25m)
  t        show state
  q        quit";

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Toggle,
    Stop,
    Mode(Option<TrackingMode>),
    Describe(String),
    Budget(String),
    Show,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, r)| (c, r.trim()));
    match command {
        "" | "p" | "pause" | "start" => Input::Toggle,
        "s" | "stop" => Input::Stop,
        "m" | "mode" if rest.is_empty() => Input::Mode(None),
        "m" | "mode" => rest
            .parse()
            .map_or_else(|_| Input::Unknown(line.to_string()), |mode| Input::Mode(Some(mode))),
        "d" | "desc" => Input::Describe(rest.to_string()),
        "b" | "budget" => Input::Budget(rest.to_string()),
        "t" | "status" => Input::Show,
        "?" | "h" | "help" => Input::Help,
        "q" | "quit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// A running session: tracker, recorder and the quit confirmation state.
///
/// Clock times are shown in `tz`.
pub struct Session<C: Clock, S: EntryStore, N: Notifier, Tz: TimeZone> {
    tracker: Tracker<C>,
    recorder: Recorder<S, N>,
    tz: Tz,
    quit_requested: bool,
    render_every: Option<u32>,
    ticks_since_render: u32,
    clock_drawn: bool,
}

impl<C, S, N, Tz> Session<C, S, N, Tz>
where
    C: Clock,
    S: EntryStore,
    N: Notifier,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub const fn new(tracker: Tracker<C>, recorder: Recorder<S, N>, tz: Tz) -> Self {
        Self {
            tracker,
            recorder,
            tz,
            quit_requested: false,
            render_every: None,
            ticks_since_render: 0,
            clock_drawn: false,
        }
    }

    /// Redraws a status line every `ticks` ticks while running.
    #[must_use]
    pub const fn with_render_every(mut self, ticks: u32) -> Self {
        self.render_every = Some(ticks);
        self
    }

    pub const fn tracker(&self) -> &Tracker<C> {
        &self.tracker
    }

    pub const fn recorder(&self) -> &Recorder<S, N> {
        &self.recorder
    }

    pub fn set_description(&mut self, description: &str) {
        self.recorder.set_description(description.trim());
    }

    /// Starts the tracker as if `p` had been entered.
    pub fn start<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.toggle(out)
    }

    /// Runs until the user quits.
    ///
    /// `interrupts` delivers one message per Ctrl-C.
    pub async fn run<R, W>(
        &mut self,
        input: R,
        out: &mut W,
        interrupts: &mut UnboundedReceiver<()>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut input_open = true;

        loop {
            tokio::select! {
                event = self.tracker.tick() => {
                    if let Some(event) = event {
                        if std::mem::take(&mut self.clock_drawn) {
                            writeln!(out)?;
                        }
                        self.handle_event(event, out)?;
                        if !input_open {
                            return Ok(());
                        }
                    }
                    self.render(out)?;
                }
                line = lines.next_line(), if input_open => {
                    let Some(line) = line.context("failed to read input")? else {
                        input_open = false;
                        if self.tracker.status() == TrackerStatus::On
                            && self.tracker.mode() == TrackingMode::Timer
                        {
                            writeln!(out, "Input closed, waiting for the timer to expire.")?;
                            continue;
                        }
                        self.discard_unsaved(out)?;
                        return Ok(());
                    };
                    self.clock_drawn = false;
                    if self.handle_line(&line, out)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Some(()) = interrupts.recv() => {
                    if self.request_quit(out)? == Flow::Quit {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let input = parse_input(line);
        if input != Input::Quit {
            self.quit_requested = false;
        }
        match input {
            Input::Toggle => self.toggle(out)?,
            Input::Stop => {
                if let Some(event) = self.tracker.stop() {
                    self.handle_event(event, out)?;
                } else {
                    writeln!(out, "Nothing to stop.")?;
                }
            }
            Input::Mode(mode) => {
                let next = mode.unwrap_or(match self.tracker.mode() {
                    TrackingMode::Timer => TrackingMode::Stopwatch,
                    TrackingMode::Stopwatch => TrackingMode::Timer,
                });
                let event = self.tracker.set_mode(next);
                writeln!(out, "Mode: {next}")?;
                if let Some(event) = event {
                    self.handle_event(event, out)?;
                }
            }
            Input::Describe(text) => {
                self.recorder.set_description(text.clone());
                writeln!(out, "Description: {text}")?;
            }
            Input::Budget(text) => match parse_budget(&text) {
                Ok(budget_ms) => match self.tracker.set_budget(budget_ms) {
                    Ok(()) => writeln!(out, "Budget: {}", format_clock(budget_ms))?,
                    Err(err) => writeln!(out, "Error: {err}")?,
                },
                Err(err) => writeln!(out, "Error: {err}")?,
            },
            Input::Show => self.show(out)?,
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Quit => return self.request_quit(out),
            Input::Unknown(text) => writeln!(out, "Unknown command: {text} (? for help)")?,
        }
        Ok(Flow::Continue)
    }

    fn toggle<W: Write>(&mut self, out: &mut W) -> Result<()> {
        match self.tracker.status() {
            TrackerStatus::On => {
                self.tracker.pause();
                if self.tracker.status() == TrackerStatus::Off {
                    self.recorder.abandon();
                    writeln!(out, "Stopped before anything was tracked")?;
                } else {
                    writeln!(out, "Paused at {}", format_clock(self.tracker.elapsed_ms()))?;
                }
            }
            TrackerStatus::Paused => {
                self.tracker.start();
                writeln!(out, "Resumed at {}", format_clock(self.tracker.elapsed_ms()))?;
            }
            TrackerStatus::Off => {
                if let Some(event) = self.tracker.start() {
                    self.handle_event(event, out)?;
                }
            }
        }
        Ok(())
    }

    fn handle_event<W: Write>(&mut self, event: SessionEvent, out: &mut W) -> Result<()> {
        self.ticks_since_render = 0;
        match event {
            SessionEvent::Started { .. } => match self.tracker.mode() {
                TrackingMode::Timer => writeln!(
                    out,
                    "Started timer, budget {}",
                    format_clock(self.tracker.budget_ms())
                )?,
                TrackingMode::Stopwatch => writeln!(out, "Started stopwatch")?,
            },
            SessionEvent::Ended { elapsed_ms, .. } => {
                writeln!(out, "Session ended at {}", format_clock(elapsed_ms))?;
            }
        }

        if let Some(entry) = self.recorder.apply(event).context("failed to record session")? {
            let line = format!(
                "Recorded entry {}: {} {}",
                self.recorder.log().len(),
                format_clock(entry.spent),
                entry.description
            );
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(())
    }

    fn request_quit<W: Write>(&mut self, out: &mut W) -> Result<Flow> {
        if self.recorder.has_unsaved_session() && !self.quit_requested {
            self.quit_requested = true;
            writeln!(
                out,
                "A session is in progress. Stop it with `s`, or quit again to discard it."
            )?;
            return Ok(Flow::Continue);
        }
        self.discard_unsaved(out)?;
        Ok(Flow::Quit)
    }

    fn discard_unsaved<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if self.recorder.has_unsaved_session() {
            tracing::warn!(
                elapsed_ms = self.tracker.elapsed_ms(),
                "discarding unsaved session"
            );
            writeln!(
                out,
                "Discarded unsaved session ({})",
                format_clock(self.tracker.elapsed_ms())
            )?;
        }
        Ok(())
    }

    fn show<W: Write>(&self, out: &mut W) -> Result<()> {
        let elapsed = format_clock(self.tracker.elapsed_ms());
        match self.tracker.remaining_ms() {
            Some(remaining) => writeln!(
                out,
                "{} {}, {elapsed} elapsed, {} left",
                self.tracker.status(),
                self.tracker.mode(),
                format_clock(remaining)
            )?,
            None => writeln!(
                out,
                "{} {}, {elapsed} elapsed",
                self.tracker.status(),
                self.tracker.mode()
            )?,
        }

        if let Some(started) = self.tracker.started_at() {
            let started = started.with_timezone(&self.tz);
            match self.tracker.projected_end() {
                Some(end) => writeln!(
                    out,
                    "Started {}, ends at {}",
                    started.format("%H:%M:%S"),
                    end.with_timezone(&self.tz).format("%H:%M:%S")
                )?,
                None => writeln!(out, "Started {}", started.format("%H:%M:%S"))?,
            }
        }
        Ok(())
    }

    fn render<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let Some(every) = self.render_every else {
            return Ok(());
        };
        self.ticks_since_render += 1;
        if self.ticks_since_render < every || self.tracker.status() != TrackerStatus::On {
            return Ok(());
        }
        self.ticks_since_render = 0;
        let shown = self
            .tracker
            .remaining_ms()
            .unwrap_or_else(|| self.tracker.elapsed_ms());
        write!(out, "\r{} ", format_clock(shown))?;
        out.flush()?;
        self.clock_drawn = true;
        Ok(())
    }
}
