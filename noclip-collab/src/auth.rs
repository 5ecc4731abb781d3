use log::info;
use thiserror::Error;

use crate::{
    util::{random_string, USER_ID_REGEX},
    DatabaseError, NewUser, SharedDatabase, UserData,
};

pub struct Auth {
    db: SharedDatabase,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// The api key is missing or doesn't belong to anyone
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("User id must be 1 to 64 characters without whitespace or slashes")]
    InvalidUserId,
    /// Something else went wrong with the database
    #[error(transparent)]
    Db(DatabaseError),
}

impl Auth {
    /// Same length as 32 url-safe base64 encoded bytes
    const API_KEY_LENGTH: usize = 43;

    pub fn new(db: &SharedDatabase) -> Self {
        Self { db: db.clone() }
    }

    /// Resolves an api key to the user owning it
    pub async fn authenticate(&self, api_key: &str) -> Result<UserData, AuthError> {
        if api_key.is_empty() {
            return Err(AuthError::InvalidApiKey);
        }

        self.db
            .user_by_api_key(api_key)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound { .. } => AuthError::InvalidApiKey,
                err => AuthError::Db(err),
            })
    }

    /// Creates a user with a freshly generated api key.
    ///
    /// The returned [UserData] is the only place the key is ever handed out.
    pub async fn register(&self, user_id: &str) -> Result<UserData, AuthError> {
        if !USER_ID_REGEX.is_match(user_id) {
            return Err(AuthError::InvalidUserId);
        }

        let user = self
            .db
            .create_user(NewUser {
                id: user_id.to_string(),
                api_key: random_string(Self::API_KEY_LENGTH),
            })
            .await
            .map_err(AuthError::Db)?;

        info!("Registered user {}", user.id);

        Ok(user)
    }
}
