//! User profile payload.

use serde::{Deserialize, Serialize};

/// A user profile as served by the profile API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Account login handle
    pub login: String,
    /// Personal web page
    pub web: String,
    /// Display name
    pub name: String,
}

impl Profile {
    /// Creates a new profile.
    pub fn new(login: impl Into<String>, web: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            web: web.into(),
            name: name.into(),
        }
    }
}
