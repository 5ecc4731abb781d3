use std::str::FromStr;

use async_trait::async_trait;
use log::info;
use sqlx::{
    query, query_as, query_scalar,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError, SqlitePool,
};

use crate::{
    ClipData, Database, DatabaseError, FriendshipStatus, IntoDatabaseError, NewClip,
    NewFriendship, NewUser, Result, UserData,
};

/// A SQLite database implementation for noclip
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Connects to the database at `url`, creating the file if needed, and runs migrations.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| e.any())?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| e.any())?;

        info!("Connected to database at {}", url);

        Self::migrate(pool).await
    }

    /// Creates a private in-memory database.
    ///
    /// Every connection to `sqlite::memory:` gets its own database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| e.any())?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| e.any())?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        info!("Database migrations are up to date");

        Ok(Self { pool })
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn user_by_id(&self, user_id: &str) -> Result<UserData> {
        query_as::<_, UserData>("SELECT id, api_key FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("user", user_id))
    }

    async fn user_by_api_key(&self, api_key: &str) -> Result<UserData> {
        query_as::<_, UserData>("SELECT id, api_key FROM users WHERE api_key = ?")
            .bind(api_key)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("user", "for api key"))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        query("INSERT INTO users (id, api_key) VALUES (?, ?)")
            .bind(&new_user.id)
            .bind(&new_user.api_key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let key_taken = matches!(
                    &e,
                    SqlxError::Database(db) if db.message().contains("users.api_key")
                );

                if key_taken {
                    // The key must not be echoed back
                    e.conflict_or("user", "api_key", "<hidden>")
                } else {
                    e.conflict_or("user", "id", &new_user.id)
                }
            })?;

        Ok(UserData {
            id: new_user.id,
            api_key: new_user.api_key,
        })
    }

    async fn friendship_exists(&self, user_id: &str, other_id: &str) -> Result<bool> {
        let count: i64 = query_scalar(
            "
            SELECT COUNT(*) FROM friendships
            WHERE (user_id = ?1 AND friend_id = ?2)
               OR (user_id = ?2 AND friend_id = ?1)",
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(count > 0)
    }

    async fn create_friendship(
        &self,
        new_friendship: NewFriendship,
    ) -> Result<FriendshipStatus> {
        // One statement, so the write lock is taken before the reverse edge is read.
        // A missing friend shows up as a foreign key violation.
        let result = query(
            "
            INSERT INTO friendships (user_id, friend_id)
            SELECT ?1, ?2
            WHERE NOT EXISTS (
                SELECT 1 FROM friendships WHERE user_id = ?2 AND friend_id = ?1
            )
            ON CONFLICT DO NOTHING",
        )
        .bind(&new_friendship.user_id)
        .bind(&new_friendship.friend_id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.not_found_or("user", &new_friendship.friend_id))?;

        if result.rows_affected() == 0 {
            Ok(FriendshipStatus::AlreadyFriends)
        } else {
            Ok(FriendshipStatus::Added)
        }
    }

    async fn clip(&self, owner_id: &str, bucket: &str) -> Result<ClipData> {
        query_as::<_, ClipData>(
            "SELECT owner_id, bucket, content FROM clips WHERE owner_id = ? AND bucket = ?",
        )
        .bind(owner_id)
        .bind(bucket)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.not_found_or("clip", &format!("{}/{}", owner_id, bucket)))
    }

    async fn upsert_clip(&self, new_clip: NewClip) -> Result<ClipData> {
        query_as::<_, ClipData>(
            "
            INSERT INTO clips (owner_id, bucket, content)
            VALUES (?, ?, ?)
            ON CONFLICT (owner_id, bucket) DO UPDATE SET content = excluded.content
            RETURNING owner_id, bucket, content",
        )
        .bind(&new_clip.owner_id)
        .bind(&new_clip.bucket)
        .bind(&new_clip.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.not_found_or("user", &new_clip.owner_id))
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: &str) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier: identifier.to_string(),
            },
            SqlxError::Database(ref e) if e.is_foreign_key_violation() => {
                DatabaseError::NotFound {
                    resource,
                    identifier: identifier.to_string(),
                }
            }
            e => Self::any(e),
        }
    }

    fn conflict_or(
        self,
        resource: &'static str,
        field: &'static str,
        value: &str,
    ) -> DatabaseError {
        match self {
            SqlxError::Database(ref e) if e.is_unique_violation() => DatabaseError::Conflict {
                resource,
                field,
                value: value.to_string(),
            },
            e => Self::any(e),
        }
    }
}
