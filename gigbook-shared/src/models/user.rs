use serde::{Deserialize, Serialize};
use crate::models::ids::UserId;

/// Minimal user projection. Everything else about a user belongs to the
/// identity provider and the profile service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}
