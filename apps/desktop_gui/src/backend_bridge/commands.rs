//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    /// Sent at most once per session.
    LoadUsers,
    FetchPortrait { url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadUsers => "load_users",
            BackendCommand::FetchPortrait { .. } => "fetch_portrait",
        }
    }
}
