use log::info;
use thiserror::Error;

use crate::{DatabaseError, FriendshipStatus, NewFriendship, SharedDatabase, UserData};

/// Friendships are stored as directed edges, but count in both directions.
#[derive(Clone)]
pub struct Friends {
    db: SharedDatabase,
}

#[derive(Debug, Error)]
pub enum FriendshipError {
    #[error("Cannot add yourself as friend")]
    SelfFriendship,
    #[error(transparent)]
    Db(DatabaseError),
}

impl Friends {
    pub fn new(db: &SharedDatabase) -> Self {
        Self { db: db.clone() }
    }

    /// Adds `friend_id` as a friend of the requester.
    /// Adding an existing friend, from either side, succeeds without storing anything.
    pub async fn add_friend(
        &self,
        requester: &UserData,
        friend_id: &str,
    ) -> Result<FriendshipStatus, FriendshipError> {
        if requester.id == friend_id {
            return Err(FriendshipError::SelfFriendship);
        }

        let status = self
            .db
            .create_friendship(NewFriendship {
                user_id: requester.id.clone(),
                friend_id: friend_id.to_string(),
            })
            .await
            .map_err(FriendshipError::Db)?;

        if status == FriendshipStatus::Added {
            info!("{} added {} as friend", requester.id, friend_id);
        }

        Ok(status)
    }

    /// Returns true if `requester_id` may read the clips of `owner_id`
    pub async fn is_authorized_to_read(
        &self,
        requester_id: &str,
        owner_id: &str,
    ) -> Result<bool, DatabaseError> {
        if requester_id == owner_id {
            return Ok(true);
        }

        self.db.friendship_exists(requester_id, owner_id).await
    }
}

#[cfg(test)]
mod test {
    use crate::{test_collab, DatabaseError, FriendshipError, FriendshipStatus};

    #[tokio::test]
    async fn test_add_friend_is_idempotent() {
        let collab = test_collab().await;
        let alice = collab.auth.register("alice").await.unwrap();
        let bob = collab.auth.register("bob").await.unwrap();

        let first = collab.friends.add_friend(&alice, "bob").await.unwrap();
        let second = collab.friends.add_friend(&alice, "bob").await.unwrap();
        let reverse = collab.friends.add_friend(&bob, "alice").await.unwrap();

        assert_eq!(first, FriendshipStatus::Added);
        assert_eq!(second, FriendshipStatus::AlreadyFriends);
        assert_eq!(reverse, FriendshipStatus::AlreadyFriends);
    }

    #[tokio::test]
    async fn test_add_self() {
        let collab = test_collab().await;
        let alice = collab.auth.register("alice").await.unwrap();

        assert!(matches!(
            collab.friends.add_friend(&alice, "alice").await,
            Err(FriendshipError::SelfFriendship)
        ));
    }

    #[tokio::test]
    async fn test_add_unknown_friend() {
        let collab = test_collab().await;
        let alice = collab.auth.register("alice").await.unwrap();

        assert!(matches!(
            collab.friends.add_friend(&alice, "nobody").await,
            Err(FriendshipError::Db(DatabaseError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_authorization_is_bidirectional() {
        let collab = test_collab().await;
        let alice = collab.auth.register("alice").await.unwrap();
        collab.auth.register("bob").await.unwrap();
        collab.auth.register("carol").await.unwrap();

        let friends = &collab.friends;

        assert!(friends.is_authorized_to_read("alice", "alice").await.unwrap());
        assert!(!friends.is_authorized_to_read("alice", "bob").await.unwrap());

        friends.add_friend(&alice, "bob").await.unwrap();

        assert!(friends.is_authorized_to_read("alice", "bob").await.unwrap());
        assert!(friends.is_authorized_to_read("bob", "alice").await.unwrap());
        assert!(!friends.is_authorized_to_read("carol", "alice").await.unwrap());
        assert!(!friends.is_authorized_to_read("bob", "carol").await.unwrap());
    }
}
