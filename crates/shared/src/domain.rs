use serde::{Deserialize, Serialize};

/// One entry of the working set. Position in the list is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
    pub portrait_url: String,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    /// Empty means every country is accepted.
    pub country: String,
}

impl FilterState {
    pub fn new(query: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            country: country.into(),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.query.is_empty() && self.country.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedDirectory {
    pub users: Vec<UserRecord>,
    pub countries: Vec<String>,
}
