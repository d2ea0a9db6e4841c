use serde::{Deserialize, Serialize};

use crate::{domain::UserRecord, error::FetchError};

/// Top-level body returned by the random user endpoint.
///
/// `results` is required; a body without it fails the load. The endpoint
/// signals some failures with a `200` and an `error` string instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomUserPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<RandomUser>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<PageInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub seed: String,
    #[serde(default)]
    pub results: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub version: String,
}

// Nested fields default to empty so one incomplete record renders blank
// instead of failing the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomUser {
    #[serde(default)]
    pub name: RandomUserName,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub location: RandomUserLocation,
    #[serde(default)]
    pub picture: RandomUserPicture,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomUserName {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub last: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomUserLocation {
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomUserPicture {
    #[serde(default)]
    pub large: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl From<RandomUser> for UserRecord {
    fn from(value: RandomUser) -> Self {
        Self {
            first_name: value.name.first,
            last_name: value.name.last,
            email: value.email,
            country: value.location.country,
            portrait_url: value.picture.large,
        }
    }
}

impl RandomUserPage {
    pub fn into_users(self) -> Result<Vec<UserRecord>, FetchError> {
        if let Some(err) = self.error {
            return Err(FetchError::Upstream(err));
        }
        let results = self
            .results
            .ok_or_else(|| FetchError::Decode("missing `results` array".to_string()))?;
        Ok(results.into_iter().map(UserRecord::from).collect())
    }
}

pub fn decode_user_page(body: &[u8]) -> Result<Vec<UserRecord>, FetchError> {
    let page: RandomUserPage =
        serde_json::from_slice(body).map_err(|err| FetchError::Decode(err.to_string()))?;
    page.into_users()
}
