//! All schemas that are exposed from endpoints are defined here
//! along with the ToSerialized impls

use noclip_collab::{ClipData, FriendshipStatus, UserData};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct User {
    id: String,
}

/// Returned once, on registration. The key can't be retrieved again.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    id: String,
    api_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Clip {
    content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Status {
    /// "success", or "already friends" when adding an existing friend
    status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

impl Status {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl ToSerialized<User> for UserData {
    fn to_serialized(&self) -> User {
        User {
            id: self.id.clone(),
        }
    }
}

impl ToSerialized<RegisteredUser> for UserData {
    fn to_serialized(&self) -> RegisteredUser {
        RegisteredUser {
            id: self.id.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

impl ToSerialized<Clip> for ClipData {
    fn to_serialized(&self) -> Clip {
        Clip {
            content: self.content.clone(),
        }
    }
}

impl ToSerialized<Status> for FriendshipStatus {
    fn to_serialized(&self) -> Status {
        match self {
            FriendshipStatus::Added => Status::success(),
            FriendshipStatus::AlreadyFriends => Status {
                status: "already friends".to_string(),
            },
        }
    }
}
