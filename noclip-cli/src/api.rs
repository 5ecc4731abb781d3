//! A small blocking client for the noclip HTTP API.

use anyhow::{anyhow, Context, Result};
use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    Method, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::UsageError;

/// The header the server reads the api key from
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Holds the HTTP client, the server URL and, once registered, the api key.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

/// A non-success response from the server
#[derive(Debug, Error)]
#[error("{detail} ({status})")]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

#[derive(Debug, Deserialize)]
pub struct Registration {
    pub id: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddFriendOutcome {
    Added,
    AlreadyFriends,
}

#[derive(Deserialize)]
struct StatusBody {
    status: String,
}

#[derive(Deserialize)]
struct ClipBody {
    content: String,
}

#[derive(Serialize)]
struct PutClipBody<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct UserBody {
    id: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid server URL {:?}", base_url))?;

        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid server URL {:?}", base_url.as_str()));
        }

        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key: None,
        })
    }

    /// Attaches an api key to every following request
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn register(&self, user_id: &str) -> Result<Registration> {
        let response = self
            .request(Method::POST, &["users", "register"])?
            .json(&json!({ "id": user_id }))
            .send()
            .context("Failed to send register request")?;

        parse(response)
    }

    pub fn add_friend(&self, friend_id: &str) -> Result<AddFriendOutcome> {
        let response = self
            .request(Method::POST, &["users", "add", friend_id])?
            .send()
            .context("Failed to send add friend request")?;

        let body: StatusBody = parse(response)?;

        match body.status.as_str() {
            "already friends" => Ok(AddFriendOutcome::AlreadyFriends),
            _ => Ok(AddFriendOutcome::Added),
        }
    }

    pub fn put_clip(&self, bucket: &str, content: &str) -> Result<()> {
        let response = self
            .request(Method::PUT, &["clip", bucket])?
            .json(&PutClipBody { content })
            .send()
            .context("Failed to send put request")?;

        parse::<StatusBody>(response).map(|_| ())
    }

    pub fn get_clip(&self, owner_id: &str, bucket: &str) -> Result<String> {
        let response = self
            .request(Method::GET, &["clip", owner_id, bucket])?
            .send()
            .context("Failed to send get request")?;

        parse::<ClipBody>(response).map(|body| body.content)
    }

    /// Returns the id of the user owning the api key
    pub fn me(&self) -> Result<String> {
        let response = self
            .request(Method::GET, &["users", "me"])?
            .send()
            .context("Failed to send whoami request")?;

        parse::<UserBody>(response).map(|body| body.id)
    }

    /// Builds `base_url/segment/...`, percent-encoding each segment
    fn url(&self, segments: &[&str]) -> Result<Url> {
        // The url crate drops dot segments instead of encoding them
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(UsageError(format!("{:?} is not a valid name", segment)).into());
        }

        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid server URL {:?}", self.base_url.as_str()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let request = self.client.request(method, self.url(segments)?);

        Ok(match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        })
    }
}

/// Turns a response into `T`, or into an [ApiError] carrying the server's explanation
fn parse<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();

    if !status.is_success() {
        let detail = response
            .json::<ErrorBody>()
            .map(|body| body.detail)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        return Err(ApiError { status, detail }.into());
    }

    response.json().context("Failed to parse server response")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_url_segments_are_encoded() {
        let client = ApiClient::new("http://localhost:8000").unwrap();
        let url = client.url(&["clip", "alice", "my notes/today"]).unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8000/clip/alice/my%20notes%2Ftoday"
        );
    }

    #[test]
    fn test_url_rejects_dot_segments() {
        let client = ApiClient::new("http://localhost:8000").unwrap();

        for name in [".", "..", ""] {
            let error = client.url(&["clip", "alice", name]).unwrap_err();

            assert!(error.downcast_ref::<UsageError>().is_some(), "{:?}", name);
        }

        let url = client.url(&["clip", "alice", "..."]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/clip/alice/...");
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client = ApiClient::new("https://example.com/noclip/").unwrap();
        let url = client.url(&["users", "me"]).unwrap();

        assert_eq!(url.as_str(), "https://example.com/noclip/users/me");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
        assert!(ApiClient::new("mailto:someone@example.com").is_err());
    }
}
