use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult, FeedApi};
use nomex_types::*;

/// API client for communicating with the Nomex server
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_token: None,
        }
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the session token for authenticated requests
    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token;
    }

    /// Helper to add session token to request if available
    fn add_auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.session_token {
            req.header("X-Session-Token", token)
        } else {
            req
        }
    }

    /// Turn a non-success response into the matching error variant
    async fn error_from_response(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        // Prefer the structured error body, fall back to raw text
        let message = match serde_json::from_str::<ErrorResponse>(&error_text) {
            Ok(body) => match body.details {
                Some(details) => format!("{}: {}", body.error, details),
                None => body.error,
            },
            Err(_) if error_text.contains("<html>") || error_text.contains("<!DOCTYPE") => {
                format!(
                    "Server returned {} error. Please check the server URL.",
                    status.as_u16()
                )
            }
            Err(_) => error_text,
        };

        match status.as_u16() {
            404 => ApiError::NotFound(message),
            401 => ApiError::Unauthorized(message),
            400 => ApiError::BadRequest(message),
            code => ApiError::Server {
                status: code,
                message,
            },
        }
    }

    /// Helper to handle API responses
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> ApiResult<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    /// Helper for endpoints where only the status matters
    async fn handle_status(&self, response: reqwest::Response) -> ApiResult<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    // Post endpoints

    /// Get one page of the feed, newest first
    pub async fn get_posts_page(&self, page: u32) -> ApiResult<PostsPage> {
        let url = format!("{}/posts/{}", self.base_url, page);
        let req = self.add_auth_header(self.client.get(&url).header(CACHE_CONTROL, "no-store"));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Create a new post
    pub async fn create_post(&self, request: &CreatePostRequest) -> ApiResult<Post> {
        let url = format!("{}/posts", self.base_url);
        let req = self.add_auth_header(self.client.post(&url).json(request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Update a post body
    pub async fn update_post(&self, post_id: PostId, post_body: String) -> ApiResult<Post> {
        let url = format!("{}/posts/{}", self.base_url, post_id);
        let request = UpdatePostRequest { post_body };
        let req = self.add_auth_header(self.client.put(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Delete a post
    pub async fn delete_post(&self, post_id: PostId) -> ApiResult<()> {
        let url = format!("{}/posts/{}", self.base_url, post_id);
        let req = self.add_auth_header(self.client.delete(&url));
        let response = req.send().await?;
        self.handle_status(response).await
    }

    // Comment endpoints

    /// Get every comment on a post
    pub async fn get_comments(&self, post_id: PostId) -> ApiResult<Vec<Comment>> {
        let url = format!("{}/comments/{}", self.base_url, post_id);
        let req = self.add_auth_header(self.client.get(&url).header(CACHE_CONTROL, "no-store"));
        let response = req.send().await?;
        let body: CommentsResponse = self.handle_response(response).await?;
        Ok(body.data)
    }

    /// Comment on a post
    pub async fn create_comment(&self, post_id: PostId, comment: String) -> ApiResult<Comment> {
        let url = format!("{}/comments", self.base_url);
        let request = CreateCommentRequest { post_id, comment };
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Update a comment body
    pub async fn update_comment(&self, comment_id: CommentId, comment: String) -> ApiResult<Comment> {
        let url = format!("{}/comments/{}", self.base_url, comment_id);
        let request = UpdateCommentRequest { comment };
        let req = self.add_auth_header(self.client.put(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Delete a comment
    pub async fn delete_comment(&self, comment_id: CommentId) -> ApiResult<()> {
        let url = format!("{}/comments/{}", self.base_url, comment_id);
        let req = self.add_auth_header(self.client.delete(&url));
        let response = req.send().await?;
        self.handle_status(response).await
    }

    // User endpoints

    /// Get a user profile by email
    pub async fn get_user(&self, email: &str) -> ApiResult<UserProfile> {
        let url = format!("{}/users/{}", self.base_url, urlencoding::encode(email));
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        let base_url = std::env::var("NOMEX_SERVER_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api".to_string());
        Self::new(base_url)
    }
}

#[async_trait]
impl FeedApi for ApiClient {
    async fn fetch_posts_page(&self, page: u32) -> ApiResult<PostsPage> {
        self.get_posts_page(page).await
    }

    async fn create_post(&self, request: CreatePostRequest) -> ApiResult<Post> {
        ApiClient::create_post(self, &request).await
    }

    async fn update_post(&self, post_id: PostId, post_body: String) -> ApiResult<Post> {
        ApiClient::update_post(self, post_id, post_body).await
    }

    async fn delete_post(&self, post_id: PostId) -> ApiResult<()> {
        ApiClient::delete_post(self, post_id).await
    }

    async fn fetch_comments(&self, post_id: PostId) -> ApiResult<Vec<Comment>> {
        self.get_comments(post_id).await
    }

    async fn create_comment(&self, post_id: PostId, comment: String) -> ApiResult<Comment> {
        ApiClient::create_comment(self, post_id, comment).await
    }

    async fn update_comment(&self, comment_id: CommentId, comment: String) -> ApiResult<Comment> {
        ApiClient::update_comment(self, comment_id, comment).await
    }

    async fn delete_comment(&self, comment_id: CommentId) -> ApiResult<()> {
        ApiClient::delete_comment(self, comment_id).await
    }

    async fn fetch_user(&self, email: &str) -> ApiResult<UserProfile> {
        self.get_user(email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/api/");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }
}
