//! Wire types for the directory API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A directory member. Identity is `id`; values are immutable once
/// fetched, save for a refetch overwriting the cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Display label of the position.
    pub position: String,
    #[serde(rename = "position_id")]
    pub position_id: i64,
    /// Photo URL; resolving it to image bytes is the presentation
    /// layer's concern.
    pub photo: String,
}

/// Pagination links as the API reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(rename = "next_url")]
    pub next_url: Option<String>,
    #[serde(rename = "prev_url")]
    pub prev_url: Option<String>,
}

/// One page of the user list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedUsers {
    pub success: bool,
    pub page: u32,
    #[serde(rename = "total_pages")]
    pub total_pages: u32,
    #[serde(rename = "total_users")]
    pub total_users: u64,
    /// Server-echoed page size.
    pub count: u32,
    pub links: PageLinks,
    pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionsResponse {
    pub success: bool,
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// Outcome of a create-user request: success with a new id, a server-side
/// validation failure, or an echoed payload without a usable id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateUserOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "user_id")]
    pub user_id: Option<i64>,
    /// Some deployments echo the updated user list instead of `user_id`.
    #[serde(default)]
    pub users: Option<Vec<User>>,
    /// Field name to validation error strings.
    #[serde(default)]
    pub fails: Option<HashMap<String, Vec<String>>>,
}

impl CreateUserOutcome {
    /// The id of the newly created user, when the response carries one.
    /// Falls back to the last echoed user, which is the newest entry when
    /// the API returns the list instead of `user_id`.
    pub fn new_user_id(&self) -> Option<i64> {
        if !self.success {
            return None;
        }
        self.user_id.or_else(|| {
            self.users
                .as_ref()
                .and_then(|users| users.last().map(|u| u.id))
        })
    }
}
