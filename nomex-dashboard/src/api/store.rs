use async_trait::async_trait;
use nomex_types::{Comment, CommentId, CreatePostRequest, Post, PostId, PostsPage, UserProfile};

use super::ApiResult;

/// The remote post, comment and user stores as seen by the dashboard engine.
///
/// [`ApiClient`](super::ApiClient) is the HTTP implementation; tests plug in
/// scripted in-memory stores.
#[async_trait]
pub trait FeedApi: Send + Sync {
    /// `GET /posts/{page}`, newest first with author data
    async fn fetch_posts_page(&self, page: u32) -> ApiResult<PostsPage>;

    async fn create_post(&self, request: CreatePostRequest) -> ApiResult<Post>;

    async fn update_post(&self, post_id: PostId, post_body: String) -> ApiResult<Post>;

    async fn delete_post(&self, post_id: PostId) -> ApiResult<()>;

    /// `GET /comments/{postId}`, the full set in one response
    async fn fetch_comments(&self, post_id: PostId) -> ApiResult<Vec<Comment>>;

    async fn create_comment(&self, post_id: PostId, comment: String) -> ApiResult<Comment>;

    async fn update_comment(&self, comment_id: CommentId, comment: String) -> ApiResult<Comment>;

    async fn delete_comment(&self, comment_id: CommentId) -> ApiResult<()>;

    /// `GET /users/{email}`
    async fn fetch_user(&self, email: &str) -> ApiResult<UserProfile>;
}
