//! Session domain model

use serde::{Deserialize, Serialize};

/// Login state of the local shopper
///
/// There is no authentication; a non-empty username is all it takes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    pub logged_in: bool,
}

/// What a session operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTransition {
    /// Went from logged out to logged in
    LoggedIn,
    /// Was already logged in; only the username changed
    Renamed,
    /// Went from logged in to logged out
    LoggedOut,
    /// Nothing happened
    Unchanged,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log in as `username`; blank usernames are ignored
    pub fn login(&mut self, username: &str) -> SessionTransition {
        let username = username.trim();
        if username.is_empty() {
            return SessionTransition::Unchanged;
        }

        if self.logged_in {
            if self.username == username {
                return SessionTransition::Unchanged;
            }
            self.username = username.to_string();
            return SessionTransition::Renamed;
        }

        self.username = username.to_string();
        self.logged_in = true;
        SessionTransition::LoggedIn
    }

    pub fn logout(&mut self) -> SessionTransition {
        if !self.logged_in {
            return SessionTransition::Unchanged;
        }
        self.logged_in = false;
        self.username.clear();
        SessionTransition::LoggedOut
    }

    /// Username while logged in
    pub fn user(&self) -> Option<&str> {
        self.logged_in.then_some(self.username.as_str())
    }
}
