//! Identity triples shared by most payloads.
//!
//! Flattened into payload structs, so `broadcaster_user_id`,
//! `broadcaster_user_login`, and `broadcaster_user_name` stay at the top level
//! of the event JSON.

use serde::{Deserialize, Serialize};

/// The channel the subscription condition names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcasterRef {
    /// Broadcaster user id.
    pub broadcaster_user_id: String,
    /// Broadcaster login (lowercase).
    pub broadcaster_user_login: String,
    /// Broadcaster display name.
    pub broadcaster_user_name: String,
}

/// The user who triggered the event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User id.
    pub user_id: String,
    /// User login (lowercase).
    pub user_login: String,
    /// User display name.
    pub user_name: String,
}

/// The moderator who took the action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeratorRef {
    /// Moderator user id.
    pub moderator_user_id: String,
    /// Moderator login (lowercase).
    pub moderator_user_login: String,
    /// Moderator display name.
    pub moderator_user_name: String,
}

/// A user who may be anonymous, in which case every field is null.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalUserRef {
    /// User id.
    pub user_id: Option<String>,
    /// User login (lowercase).
    pub user_login: Option<String>,
    /// User display name.
    pub user_name: Option<String>,
}
