//! Credential checks and login lockout
//!
//! Two fixed accounts exist: a conductor, who runs trips, and an
//! administrator, who reviews the trip log. After too many consecutive failed
//! attempts the gate locks for good.

use crate::config::{Credential, CredentialsConfig};
use std::fmt;

/// Role granted by a successful login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Conductor,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Conductor => write!(f, "CONDUCTOR"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// The two known accounts
#[derive(Debug, Clone)]
pub struct CredentialStore {
    conductor: Credential,
    admin: Credential,
}

impl CredentialStore {
    pub fn new(conductor: Credential, admin: Credential) -> Self {
        Self { conductor, admin }
    }

    pub fn from_config(config: &CredentialsConfig) -> Self {
        Self::new(config.conductor.clone(), config.admin.clone())
    }

    /// Role for a username/password pair, if it matches an account
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        let matches = |c: &Credential| c.username == username && c.password == password;

        if matches(&self.conductor) {
            Some(Role::Conductor)
        } else if matches(&self.admin) {
            Some(Role::Admin)
        } else {
            None
        }
    }
}

/// Result of one login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Granted(Role),
    Denied { remaining: u32 },
    LockedOut,
}

/// Counts consecutive failures and locks after `max_attempts` of them
#[derive(Debug, Clone)]
pub struct LoginGate {
    store: CredentialStore,
    max_attempts: u32,
    failures: u32,
}

impl LoginGate {
    pub fn new(store: CredentialStore, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts,
            failures: 0,
        }
    }

    pub fn from_config(config: &CredentialsConfig) -> Self {
        Self::new(CredentialStore::from_config(config), config.max_attempts)
    }

    pub fn is_locked(&self) -> bool {
        self.failures >= self.max_attempts
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn attempt(&mut self, username: &str, password: &str) -> LoginOutcome {
        if self.is_locked() {
            return LoginOutcome::LockedOut;
        }

        match self.store.authenticate(username, password) {
            Some(role) => {
                self.failures = 0;
                log::info!("Login granted for {:?} as {}", username, role);
                LoginOutcome::Granted(role)
            }
            None => {
                self.failures += 1;
                log::warn!(
                    "Login failed for {:?} ({}/{})",
                    username,
                    self.failures,
                    self.max_attempts
                );
                if self.is_locked() {
                    LoginOutcome::LockedOut
                } else {
                    LoginOutcome::Denied {
                        remaining: self.max_attempts - self.failures,
                    }
                }
            }
        }
    }
}
