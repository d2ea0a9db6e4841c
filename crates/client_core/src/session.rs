//! Session state for one run of the directory: the one-shot load, the working
//! set, and the filter inputs with their derived visible list.

use shared::{
    domain::{FilterState, LoadedDirectory, UserRecord},
    error::FetchError,
    filter::filter_users,
};
use tracing::{debug, warn};

use crate::UserSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Loading,
    Ready,
    Errored,
}

#[derive(Debug, Default)]
pub struct DirectorySession {
    phase: SessionPhase,
    load_requested: bool,
    users: Vec<UserRecord>,
    countries: Vec<String>,
    filter: FilterState,
    visible: Vec<usize>,
    error: Option<String>,
}

impl DirectorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the single load of this session. Only the first call returns
    /// `true`.
    pub fn begin_load(&mut self) -> bool {
        if self.load_requested {
            debug!("user batch already requested for this session");
            return false;
        }
        self.load_requested = true;
        true
    }

    /// Applies the outcome of the load. Returns `false` if the outcome was
    /// ignored because no load was pending.
    pub fn complete_load(&mut self, outcome: Result<LoadedDirectory, FetchError>) -> bool {
        if !self.load_requested || self.phase != SessionPhase::Loading {
            warn!(phase = ?self.phase, "ignoring load outcome with no pending load");
            return false;
        }

        match outcome {
            Ok(directory) => {
                self.users = directory.users;
                self.countries = directory.countries;
                self.phase = SessionPhase::Ready;
                self.refilter();
            }
            Err(err) => {
                warn!("user batch load failed: {err}");
                self.users.clear();
                self.countries.clear();
                self.visible.clear();
                self.error = Some(err.user_message().to_string());
                self.phase = SessionPhase::Errored;
            }
        }
        true
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.filter.query != query {
            self.filter.query = query;
            self.refilter();
        }
    }

    /// An empty string removes the country constraint.
    pub fn set_country(&mut self, country: impl Into<String>) {
        let country = country.into();
        if self.filter.country != country {
            self.filter.country = country;
            self.refilter();
        }
    }

    pub fn clear_filters(&mut self) {
        if !self.filter.is_unconstrained() {
            self.filter = FilterState::default();
            self.refilter();
        }
    }

    fn refilter(&mut self) {
        if self.phase != SessionPhase::Ready {
            return;
        }
        self.visible = filter_users(&self.users, &self.filter);
        debug!(
            query = %self.filter.query,
            country = %self.filter.country,
            visible = self.visible.len(),
            "recomputed visible users"
        );
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_users(&self) -> impl Iterator<Item = &UserRecord> + '_ {
        self.visible.iter().map(|index| &self.users[*index])
    }
}

/// Runs the session's load against `source`. Returns `false` without touching
/// the network when the load was already claimed.
pub async fn run_load<S: UserSource + ?Sized>(session: &mut DirectorySession, source: &S) -> bool {
    if !session.begin_load() {
        return false;
    }
    let outcome = source.load().await;
    session.complete_load(outcome)
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
