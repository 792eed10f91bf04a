use std::collections::HashMap;

use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::feed::error::ApiError;
use crate::feed::types::{Comment, Hobby, HobbyCategory, HobbyId, Post, PostId, ReactionKind};
use crate::session::Session;

/// Optional image payload attached to a new post.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Error body shape of the data service.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Typed wrapper around the remote HTTP data service.
///
/// Snapshot and catalog reads are public; mutations require the session
/// attached at construction time.
pub struct DataApiClient {
    http: Client,
    base_url: Url,
    session: Option<Session>,
}

impl DataApiClient {
    pub fn new(base_url: &str, session: Option<Session>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Validation(format!("invalid base url: {e}")))?;
        Ok(Self {
            http: Client::new(),
            base_url,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Validation(format!("invalid endpoint {path}: {e}")))
    }

    fn bearer(&self) -> Result<String, ApiError> {
        match &self.session {
            Some(session) => Ok(format!("Bearer {}", session.token().expose())),
            None => Err(ApiError::Validation(
                "operation requires a signed-in session".into(),
            )),
        }
    }

    // =====================================================================
    // Public reads
    // =====================================================================

    /// Full server-ordered feed snapshot.
    pub async fn fetch_feed_snapshot(&self) -> Result<Vec<Post>, ApiError> {
        let url = self.endpoint("feed-snapshot")?;
        log::debug!("[HTTP] GET {url}");
        let response = self.http.get(url).send().await.map_err(transport)?;
        decode(response).await
    }

    /// Single post by id.
    pub async fn fetch_post(&self, id: PostId) -> Result<Post, ApiError> {
        let url = self.endpoint(&format!("posts/{id}"))?;
        log::debug!("[HTTP] GET {url}");
        let response = self.http.get(url).send().await.map_err(transport)?;
        decode(response).await
    }

    /// Hobby catalog, consumed as an id → name lookup for display.
    pub async fn fetch_hobbies(&self) -> Result<Vec<Hobby>, ApiError> {
        let url = self.endpoint("hobbies")?;
        log::debug!("[HTTP] GET {url}");
        let response = self.http.get(url).send().await.map_err(transport)?;
        decode(response).await
    }

    pub async fn fetch_hobby_categories(&self) -> Result<Vec<HobbyCategory>, ApiError> {
        let url = self.endpoint("hobby-categories")?;
        log::debug!("[HTTP] GET {url}");
        let response = self.http.get(url).send().await.map_err(transport)?;
        decode(response).await
    }

    // =====================================================================
    // Authenticated mutations
    // =====================================================================

    /// Creates a post (multipart: content, optional hobby id, optional
    /// image) and returns the created record.
    pub async fn create_post(
        &self,
        content: &str,
        hobby_id: Option<HobbyId>,
        image: Option<ImageUpload>,
    ) -> Result<Post, ApiError> {
        if content.trim().is_empty() {
            return Err(ApiError::Validation("content must not be empty".into()));
        }

        let mut form = multipart::Form::new().text("content", content.to_string());
        if let Some(hobby_id) = hobby_id {
            form = form.text("hobby_id", hobby_id.to_string());
        }
        if let Some(image) = image {
            let part = multipart::Part::stream(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)
                .map_err(|e| ApiError::Validation(format!("invalid image content type: {e}")))?;
            form = form.part("file", part);
        }

        let url = self.endpoint("posts")?;
        log::debug!("[HTTP] POST {url}");
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.bearer()?)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    /// Appends a comment and returns the created record.
    pub async fn add_comment(&self, post_id: PostId, content: &str) -> Result<Comment, ApiError> {
        if content.trim().is_empty() {
            return Err(ApiError::Validation("content must not be empty".into()));
        }

        let url = self.endpoint(&format!("posts/{post_id}/comments"))?;
        log::debug!("[HTTP] POST {url}");
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.bearer()?)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    /// Records a reaction and returns the updated aggregate counts.
    pub async fn add_reaction(
        &self,
        post_id: PostId,
        kind: ReactionKind,
    ) -> Result<HashMap<ReactionKind, u32>, ApiError> {
        let url = self.endpoint(&format!("posts/{post_id}/reactions"))?;
        log::debug!("[HTTP] POST {url}");
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.bearer()?)
            .json(&json!({ "type": kind }))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}

fn transport(error: reqwest::Error) -> ApiError {
    ApiError::Network(error.to_string())
}

/// Maps a non-2xx status to the error taxonomy, reading the server's
/// `detail` message when present, then decodes a successful body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        return Err(ApiError::from_status(status.as_u16(), detail));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Network(format!("malformed response body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn public_client() -> DataApiClient {
        DataApiClient::new("http://localhost:8000", None).unwrap()
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            DataApiClient::new("not a url", None),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn endpoints_join_against_the_base_url() {
        let client = public_client();
        assert_eq!(
            client.endpoint("feed-snapshot").unwrap().as_str(),
            "http://localhost:8000/feed-snapshot"
        );
        let id = PostId(Uuid::nil());
        assert_eq!(
            client.endpoint(&format!("posts/{id}/comments")).unwrap().as_str(),
            format!("http://localhost:8000/posts/{id}/comments")
        );
    }

    #[test]
    fn mutations_require_a_session() {
        let client = public_client();
        assert!(matches!(client.bearer(), Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn empty_content_fails_client_side() {
        let client = public_client();
        assert!(matches!(
            client.create_post("   ", None, None).await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            client.add_comment(PostId(Uuid::nil()), "").await,
            Err(ApiError::Validation(_))
        ));
    }
}
