use log::debug;
use thiserror::Error;

use crate::{ClipData, DatabaseError, Friends, NewClip, SharedDatabase, UserData};

pub struct Clips {
    db: SharedDatabase,
    friends: Friends,
}

#[derive(Debug, Error)]
pub enum ClipError {
    /// The requester is neither the owner nor a friend of the owner
    #[error("Not authorized to access this clip")]
    Forbidden,
    #[error(transparent)]
    Db(DatabaseError),
}

impl Clips {
    pub fn new(db: &SharedDatabase, friends: &Friends) -> Self {
        Self {
            db: db.clone(),
            friends: friends.clone(),
        }
    }

    /// Stores `content` in one of the owner's buckets, replacing what was there
    pub async fn put_clip(
        &self,
        owner: &UserData,
        bucket: &str,
        content: String,
    ) -> Result<ClipData, ClipError> {
        let clip = self
            .db
            .upsert_clip(NewClip {
                owner_id: owner.id.clone(),
                bucket: bucket.to_string(),
                content,
            })
            .await
            .map_err(ClipError::Db)?;

        debug!("{} stored {} bytes in {}", owner.id, clip.content.len(), bucket);

        Ok(clip)
    }

    /// Reads a clip from any bucket the requester is allowed to see.
    ///
    /// Authorization is checked before the lookup, so a stranger gets
    /// [ClipError::Forbidden] whether or not the bucket exists.
    pub async fn get_clip(
        &self,
        requester: &UserData,
        owner_id: &str,
        bucket: &str,
    ) -> Result<ClipData, ClipError> {
        let authorized = self
            .friends
            .is_authorized_to_read(&requester.id, owner_id)
            .await
            .map_err(ClipError::Db)?;

        if !authorized {
            return Err(ClipError::Forbidden);
        }

        self.db.clip(owner_id, bucket).await.map_err(ClipError::Db)
    }
}
