//! Trip driver
//!
//! Replays the recorded rows one tick at a time: build the snapshot, evaluate
//! the advisories, append to the trip log, refresh the display, then wait for
//! the next tick.

use crate::display::{DisplaySurface, TickUpdate};
use crate::state::Session;
use anyhow::{Context, Result};
use std::time::Duration;
use train_advisory::{AdvisoryEngine, LogEntry, SensorRow, Severity, Timestamp, TripLog};

/// Waits between ticks
pub trait Pacer {
    fn wait(&mut self, interval: Duration);
}

/// Sleeps for the full tick interval
pub struct RealtimePacer;

impl Pacer for RealtimePacer {
    fn wait(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Runs ticks back to back
pub struct NoWait;

impl Pacer for NoWait {
    fn wait(&mut self, _interval: Duration) {}
}

/// Counts collected over one trip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripSummary {
    pub ticks: usize,
    /// Ticks where at least one advisory was an alert
    pub alert_ticks: usize,
    /// Ticks whose worst advisory was a caution
    pub caution_ticks: usize,
}

pub struct TripDriver<'a> {
    engine: &'a AdvisoryEngine,
    interval: Duration,
    display: &'a mut dyn DisplaySurface,
    pacer: &'a mut dyn Pacer,
}

impl<'a> TripDriver<'a> {
    pub fn new(
        engine: &'a AdvisoryEngine,
        interval: Duration,
        display: &'a mut dyn DisplaySurface,
        pacer: &'a mut dyn Pacer,
    ) -> Self {
        Self {
            engine,
            interval,
            display,
            pacer,
        }
    }

    /// Timestamp of tick `tick` for a trip that started at `start`
    fn tick_timestamp(&self, start: Timestamp, tick: usize) -> Timestamp {
        let offset_ms = self.interval.as_millis() as i64 * tick as i64;
        start + chrono::Duration::milliseconds(offset_ms)
    }

    /// Start of the simulated clock for a new trip
    ///
    /// Earlier trips may have run ahead of the wall clock, so the new trip
    /// begins one interval after the last logged tick if that is later.
    pub fn trip_start(&self, log: &TripLog, now: Timestamp) -> Timestamp {
        match log.latest() {
            Some(last) => now.max(self.tick_timestamp(last.timestamp(), 1)),
            None => now,
        }
    }

    /// Run a whole trip over `rows`, starting the simulated clock at `start`
    ///
    /// A trip that fails partway is aborted, so the session never stays in
    /// the running state.
    pub fn run(&mut self, session: &mut Session, rows: &[SensorRow], start: Timestamp) -> Result<TripSummary> {
        session.start_trip()?;

        match self.play(session, rows, start) {
            Ok(summary) => {
                session.finish_trip()?;
                Ok(summary)
            }
            Err(err) => {
                session.abort_trip()?;
                Err(err)
            }
        }
    }

    fn play(&mut self, session: &mut Session, rows: &[SensorRow], start: Timestamp) -> Result<TripSummary> {
        let mut summary = TripSummary::default();

        for (tick, row) in rows.iter().enumerate() {
            let timestamp = self.tick_timestamp(start, tick);
            let snapshot = row.snapshot();
            let state = self.engine.evaluate(&snapshot);

            log::debug!(
                "Tick {} (line {}): slippage={} distance={} gate={}",
                tick,
                row.line,
                state.slippage.severity,
                state.distance.severity,
                state.gate.severity
            );
            if !state.slip_causes.is_empty() {
                let causes: Vec<String> = state.slip_causes.iter().map(|c| c.to_string()).collect();
                log::debug!("Slip causes: {}", causes.join(", "));
            }

            session.record(LogEntry::from_snapshot(timestamp, &snapshot))?;

            self.display
                .render(&TickUpdate {
                    tick,
                    total: rows.len(),
                    timestamp,
                    state: &state,
                })
                .context("Failed to update the display")?;

            summary.ticks += 1;
            match state.worst_severity() {
                Severity::Alert => summary.alert_ticks += 1,
                Severity::Caution => summary.caution_ticks += 1,
                Severity::Ok => {}
            }

            self.pacer.wait(self.interval);
        }

        Ok(summary)
    }
}
