use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

mod data;
pub use data::*;

mod sqlite;
pub use sqlite::*;

pub type Result<T> = std::result::Result<T, DatabaseError>;
pub type SharedDatabase = Arc<dyn Database>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource} {identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    /// Missing rows and broken references become [DatabaseError::NotFound]
    fn not_found_or(self, resource: &'static str, identifier: &str) -> DatabaseError;
    /// Uniqueness violations become [DatabaseError::Conflict]
    fn conflict_or(self, resource: &'static str, field: &'static str, value: &str)
        -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Represents a type that can store and fetch noclip data.
///
/// Every method is a single atomic unit: either everything it writes is
/// visible afterwards, or nothing is.
#[async_trait]
pub trait Database: Send + Sync {
    async fn user_by_id(&self, user_id: &str) -> Result<UserData>;
    async fn user_by_api_key(&self, api_key: &str) -> Result<UserData>;
    /// Fails with a conflict if either the id or the api key is taken
    async fn create_user(&self, new_user: NewUser) -> Result<UserData>;

    /// Checks for an edge between the two users, in either direction
    async fn friendship_exists(&self, user_id: &str, other_id: &str) -> Result<bool>;
    /// Stores a directed edge, unless the pair is already connected either way
    async fn create_friendship(&self, new_friendship: NewFriendship)
        -> Result<FriendshipStatus>;

    async fn clip(&self, owner_id: &str, bucket: &str) -> Result<ClipData>;
    /// Inserts the clip or replaces the content of the existing one
    async fn upsert_clip(&self, new_clip: NewClip) -> Result<ClipData>;
}

#[derive(Debug)]
pub struct NewUser {
    pub id: String,
    pub api_key: String,
}

#[derive(Debug)]
pub struct NewFriendship {
    /// The user adding a friend
    pub user_id: String,
    pub friend_id: String,
}

#[derive(Debug)]
pub struct NewClip {
    pub owner_id: String,
    pub bucket: String,
    pub content: String,
}
