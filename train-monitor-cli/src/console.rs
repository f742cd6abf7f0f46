//! Interactive console
//!
//! Prompts for credentials and dispatches to the conductor trip or the admin
//! log view. After either finishes the console returns to the login prompt;
//! end of input closes it.

use crate::auth::{LoginOutcome, Role};
use crate::config::OutputConfig;
use crate::display::TerminalDisplay;
use crate::driver::{Pacer, TripDriver};
use crate::report;
use crate::state::{Session, SessionError};
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::{BufRead, Write};
use std::time::Duration;
use train_advisory::{AdvisoryEngine, SensorRow};

/// Everything a conductor trip needs besides the session
pub struct TripSetup<'a> {
    pub engine: &'a AdvisoryEngine,
    pub rows: &'a [SensorRow],
    pub interval: Duration,
    pub output: &'a OutputConfig,
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one line without its line ending; `None` at end of input
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from console")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Run login prompts until input ends or the session locks
    pub fn run(
        &mut self,
        session: &mut Session,
        setup: &TripSetup<'_>,
        pacer: &mut dyn Pacer,
    ) -> Result<()> {
        loop {
            writeln!(self.output, "************** WELCOME **************")?;
            let Some(username) = self.read_line("Enter a username: ")? else {
                break;
            };
            let Some(password) = self.read_line("Enter a password: ")? else {
                break;
            };

            match session.login(&username, &password)? {
                LoginOutcome::Granted(role) => {
                    writeln!(self.output, "************** {} LOGGED IN **************", role)?;
                    match role {
                        Role::Conductor => self.conductor_trip(session, setup, pacer)?,
                        Role::Admin => self.admin_view(session, setup.output)?,
                    }
                    session.logout()?;
                }
                LoginOutcome::Denied { remaining } => {
                    writeln!(
                        self.output,
                        "Invalid Login. Try Again. ({} attempts left)",
                        remaining
                    )?;
                }
                LoginOutcome::LockedOut => {
                    let err = SessionError::LockedOut;
                    writeln!(self.output, "{}", err)?;
                    return Err(err.into());
                }
            }
        }

        writeln!(self.output)?;
        Ok(())
    }

    fn conductor_trip(
        &mut self,
        session: &mut Session,
        setup: &TripSetup<'_>,
        pacer: &mut dyn Pacer,
    ) -> Result<()> {
        writeln!(self.output, "IoT Engine calibrating...\n")?;

        let summary = {
            let mut display = TerminalDisplay::new(
                &mut self.output,
                setup.output.color,
                setup.output.clear_screen,
            );
            let mut driver = TripDriver::new(setup.engine, setup.interval, &mut display, pacer);
            let start = driver.trip_start(session.log(), Utc::now());
            driver.run(session, setup.rows, start)?
        };

        log::info!(
            "Trip summary: {} ticks, {} with alerts, {} with cautions",
            summary.ticks,
            summary.alert_ticks,
            summary.caution_ticks
        );
        writeln!(self.output, "Thank you for riding\n")?;
        Ok(())
    }

    fn admin_view(&mut self, session: &Session, output: &OutputConfig) -> Result<()> {
        let log = session.view_log()?;
        let rendered = report::render_log(log, output.log_format)?;
        write!(self.output, "{}", rendered)?;
        Ok(())
    }
}
