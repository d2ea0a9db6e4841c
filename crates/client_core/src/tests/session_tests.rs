use super::*;
use async_trait::async_trait;
use shared::filter::derive_countries;
use std::sync::atomic::{AtomicUsize, Ordering};

struct FixedSource {
    outcome: Result<Vec<UserRecord>, FetchError>,
    loads: AtomicUsize,
}

impl FixedSource {
    fn ok(users: Vec<UserRecord>) -> Self {
        Self {
            outcome: Ok(users),
            loads: AtomicUsize::new(0),
        }
    }

    fn failing(err: FetchError) -> Self {
        Self {
            outcome: Err(err),
            loads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl UserSource for FixedSource {
    async fn load(&self) -> Result<LoadedDirectory, FetchError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map(|users| LoadedDirectory {
            countries: derive_countries(&users),
            users,
        })
    }

    async fn fetch_portrait(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(Vec::new())
    }
}

fn user(first: &str, last: &str, country: &str) -> UserRecord {
    UserRecord {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{first}@example.com"),
        country: country.to_string(),
        portrait_url: format!("https://img.example/{first}-{last}.jpg"),
    }
}

fn scenario_users() -> Vec<UserRecord> {
    vec![user("Ana", "Smith", "Peru"), user("Ana", "Lopez", "Chile")]
}

fn ready_session(users: Vec<UserRecord>) -> DirectorySession {
    let mut session = DirectorySession::new();
    assert!(session.begin_load());
    let countries = derive_countries(&users);
    assert!(session.complete_load(Ok(LoadedDirectory { users, countries })));
    session
}

fn visible_last_names(session: &DirectorySession) -> Vec<&str> {
    session
        .visible_users()
        .map(|user| user.last_name.as_str())
        .collect()
}

#[test]
fn starts_loading_with_empty_working_set() {
    let session = DirectorySession::new();
    assert_eq!(session.phase(), SessionPhase::Loading);
    assert!(session.is_loading());
    assert!(session.users().is_empty());
    assert!(session.visible_indices().is_empty());
    assert!(session.error().is_none());
}

#[test]
fn begin_load_is_granted_once() {
    let mut session = DirectorySession::new();
    assert!(session.begin_load());
    assert!(!session.begin_load());
    assert!(!session.begin_load());
}

#[test]
fn outcome_without_pending_load_is_ignored() {
    let mut session = DirectorySession::new();
    assert!(!session.complete_load(Ok(LoadedDirectory::default())));
    assert_eq!(session.phase(), SessionPhase::Loading);
}

#[test]
fn second_outcome_does_not_replace_the_first() {
    let mut session = ready_session(scenario_users());
    assert!(!session.complete_load(Err(FetchError::Transport("late".to_string()))));
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(session.users().len(), 2);
    assert!(session.error().is_none());
}

#[test]
fn ready_session_shows_everyone_initially() {
    let session = ready_session(scenario_users());
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert!(!session.is_loading());
    assert_eq!(session.visible_indices(), &[0, 1]);
    assert_eq!(session.countries(), &["Peru".to_string(), "Chile".to_string()]);
}

#[test]
fn scenario_query_only() {
    let mut session = ready_session(scenario_users());
    session.set_query("ana");
    assert_eq!(visible_last_names(&session), vec!["Smith", "Lopez"]);
}

#[test]
fn scenario_country_only() {
    let mut session = ready_session(scenario_users());
    session.set_country("Chile");
    assert_eq!(visible_last_names(&session), vec!["Lopez"]);
}

#[test]
fn scenario_name_matches_but_country_does_not() {
    let mut session = ready_session(scenario_users());
    session.set_query("smith");
    session.set_country("Chile");
    assert!(session.visible_indices().is_empty());
}

#[test]
fn every_filter_change_recomputes_from_the_full_working_set() {
    let mut session = ready_session(scenario_users());
    session.set_country("Chile");
    assert_eq!(visible_last_names(&session), vec!["Lopez"]);
    session.set_country("");
    assert_eq!(visible_last_names(&session), vec!["Smith", "Lopez"]);
    session.set_query("SMI");
    assert_eq!(visible_last_names(&session), vec!["Smith"]);
    session.set_query("");
    assert_eq!(visible_last_names(&session), vec!["Smith", "Lopez"]);
}

#[test]
fn clear_filters_restores_identity() {
    let mut session = ready_session(scenario_users());
    session.set_query("lopez");
    session.set_country("Peru");
    assert!(session.visible_indices().is_empty());
    session.clear_filters();
    assert!(session.filter().is_unconstrained());
    assert_eq!(session.visible_indices(), &[0, 1]);
}

#[test]
fn filter_edits_while_loading_apply_once_ready() {
    let mut session = DirectorySession::new();
    session.set_query("lopez");
    assert!(session.visible_indices().is_empty());
    assert!(session.begin_load());
    let users = scenario_users();
    let countries = derive_countries(&users);
    session.complete_load(Ok(LoadedDirectory { users, countries }));
    assert_eq!(visible_last_names(&session), vec!["Lopez"]);
}

#[tokio::test]
async fn failed_fetch_enters_errored_without_visible_users() {
    let source = FixedSource::failing(FetchError::Transport("connection refused".to_string()));
    let mut session = DirectorySession::new();

    assert!(run_load(&mut session, &source).await);

    assert_eq!(session.phase(), SessionPhase::Errored);
    assert!(!session.is_loading());
    assert_eq!(session.error(), Some("Failed to fetch users."));
    assert!(session.users().is_empty());
    assert!(session.visible_indices().is_empty());

    session.set_query("ana");
    assert!(session.visible_indices().is_empty());
}

#[tokio::test]
async fn empty_batch_is_ready_with_nothing_to_show() {
    let source = FixedSource::ok(Vec::new());
    let mut session = DirectorySession::new();

    assert!(run_load(&mut session, &source).await);

    assert_eq!(session.phase(), SessionPhase::Ready);
    assert!(session.error().is_none());
    assert!(session.countries().is_empty());
    assert!(session.visible_indices().is_empty());
}

#[tokio::test]
async fn run_load_fetches_only_once() {
    let source = FixedSource::ok(scenario_users());
    let mut session = DirectorySession::new();

    assert!(run_load(&mut session, &source).await);
    assert!(!run_load(&mut session, &source).await);

    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    assert_eq!(session.users().len(), 2);
}
