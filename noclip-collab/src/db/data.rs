use std::fmt;

use sqlx::FromRow;

/// A noclip account
#[derive(Clone, FromRow)]
pub struct UserData {
    /// The id chosen by the user at registration
    pub id: String,
    /// The key presented in `X-API-Key`, only handed out once
    pub api_key: String,
}

impl fmt::Debug for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserData")
            .field("id", &self.id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// A clip stored in a bucket
#[derive(Debug, Clone, FromRow)]
pub struct ClipData {
    pub owner_id: String,
    pub bucket: String,
    pub content: String,
}

/// The outcome of adding a friend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendshipStatus {
    /// A new edge was stored
    Added,
    /// An edge already existed in one of the two directions
    AlreadyFriends,
}
