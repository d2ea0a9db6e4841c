//! Events sent from the backend worker to the UI thread.

use shared::{domain::LoadedDirectory, error::FetchError};

use crate::ui::cards::PortraitImage;

pub enum UiEvent {
    Info(String),
    UsersLoaded(Result<LoadedDirectory, FetchError>),
    PortraitLoaded { url: String, image: PortraitImage },
    PortraitFailed { url: String, reason: String },
}
