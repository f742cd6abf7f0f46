//! Session state machine
//!
//! LoggedOut → {Admin, Conductor} → Running → Finished, with LockedOut as a
//! terminal state after too many failed logins. The session owns the trip
//! log; nothing else writes to it.

use crate::auth::{LoginGate, LoginOutcome, Role};
use std::fmt;
use train_advisory::{AdvisoryError, LogEntry, TripLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    /// Read-only access to the trip log
    Admin,
    /// Logged in, trip not started yet
    Conductor,
    Running,
    Finished,
    /// Terminal; needs an external override
    LockedOut,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::LoggedOut => "logged out",
            SessionState::Admin => "logged in as admin",
            SessionState::Conductor => "logged in as conductor",
            SessionState::Running => "running a trip",
            SessionState::Finished => "finished a trip",
            SessionState::LockedOut => "locked out",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: SessionState,
        action: &'static str,
    },

    #[error("Too many attempts to login, please contact dispatch for manual override.")]
    LockedOut,

    #[error("Trip log error")]
    Log(#[from] AdvisoryError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// One operator session at the console
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    gate: LoginGate,
    log: TripLog,
}

impl Session {
    pub fn new(gate: LoginGate) -> Self {
        Self {
            state: SessionState::LoggedOut,
            gate,
            log: TripLog::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn require(&self, allowed: &[SessionState], action: &'static str) -> SessionResult<()> {
        if self.state == SessionState::LockedOut {
            return Err(SessionError::LockedOut);
        }
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }

    /// Try a username/password pair
    pub fn login(&mut self, username: &str, password: &str) -> SessionResult<LoginOutcome> {
        self.require(&[SessionState::LoggedOut], "log in")?;

        let outcome = self.gate.attempt(username, password);
        match outcome {
            LoginOutcome::Granted(Role::Conductor) => self.state = SessionState::Conductor,
            LoginOutcome::Granted(Role::Admin) => self.state = SessionState::Admin,
            LoginOutcome::Denied { .. } => {}
            LoginOutcome::LockedOut => {
                log::error!("Login locked after {} failed attempts", self.gate.failures());
                self.state = SessionState::LockedOut;
            }
        }
        Ok(outcome)
    }

    pub fn start_trip(&mut self) -> SessionResult<()> {
        self.require(&[SessionState::Conductor], "start a trip")?;
        log::info!("Trip started");
        self.state = SessionState::Running;
        Ok(())
    }

    /// Append one tick's entry to the trip log
    pub fn record(&mut self, entry: LogEntry) -> SessionResult<()> {
        self.require(&[SessionState::Running], "record a log entry")?;
        self.log.append(entry)?;
        Ok(())
    }

    pub fn finish_trip(&mut self) -> SessionResult<()> {
        self.require(&[SessionState::Running], "finish a trip")?;
        log::info!("Trip finished with {} log entries", self.log.len());
        self.state = SessionState::Finished;
        Ok(())
    }

    /// End a trip that stopped partway; entries already recorded are kept
    pub fn abort_trip(&mut self) -> SessionResult<()> {
        self.require(&[SessionState::Running], "abort a trip")?;
        log::warn!("Trip aborted after {} log entries", self.log.len());
        self.state = SessionState::Finished;
        Ok(())
    }

    /// The trip log, for the administrator only
    pub fn view_log(&self) -> SessionResult<&TripLog> {
        self.require(&[SessionState::Admin], "view the trip log")?;
        Ok(&self.log)
    }

    pub fn logout(&mut self) -> SessionResult<()> {
        self.require(
            &[
                SessionState::Admin,
                SessionState::Conductor,
                SessionState::Finished,
            ],
            "log out",
        )?;
        self.state = SessionState::LoggedOut;
        Ok(())
    }

    pub fn log(&self) -> &TripLog {
        &self.log
    }
}
