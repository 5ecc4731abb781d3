use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use noclip_collab::{AuthError, ClipError, DatabaseError, FriendshipError};
use thiserror::Error;

use crate::serialized::ErrorBody;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{resource} {identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("Not authorized to access this clip")]
    Forbidden,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Unknown internal error: {0}")]
    Unknown(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if let Self::Unknown(message) = &self {
            error!("Request failed: {}", message);
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };

        (self.as_status_code(), Json(body)).into_response()
    }
}

impl From<DatabaseError> for ServerError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource,
                identifier,
            },
            DatabaseError::Conflict {
                resource,
                field,
                value,
            } => Self::Conflict {
                resource,
                field,
                value,
            },
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidApiKey => Self::Unauthorized("Invalid API key"),
            e @ AuthError::InvalidUserId => Self::InvalidRequest(e.to_string()),
            AuthError::Db(e) => e.into(),
        }
    }
}

impl From<FriendshipError> for ServerError {
    fn from(value: FriendshipError) -> Self {
        match value {
            e @ FriendshipError::SelfFriendship => Self::InvalidRequest(e.to_string()),
            FriendshipError::Db(e) => e.into(),
        }
    }
}

impl From<ClipError> for ServerError {
    fn from(value: ClipError) -> Self {
        match value {
            ClipError::Forbidden => Self::Forbidden,
            ClipError::Db(e) => e.into(),
        }
    }
}
