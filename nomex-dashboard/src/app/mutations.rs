//! Create/update/delete calls against the remote stores.
//!
//! The coordinator only talks to the server and classifies failures; the
//! caller applies successful results to the state it owns.

use nomex_types::{AuthStatus, Comment, CommentId, CreatePostRequest, Post, PostId};

use super::errors::ErrorRecord;
use crate::api::{ApiError, FeedApi};
use crate::logging::LogConfig;

pub struct MutationCoordinator<'a, A: FeedApi + ?Sized> {
    api: &'a A,
    auth: AuthStatus,
    log_config: &'a LogConfig,
}

impl<'a, A: FeedApi + ?Sized> MutationCoordinator<'a, A> {
    pub fn new(api: &'a A, auth: AuthStatus, log_config: &'a LogConfig) -> Self {
        Self {
            api,
            auth,
            log_config,
        }
    }

    fn failed(&self, operation: &str, error: ApiError) -> ErrorRecord {
        log::warn!("{} failed: {}", operation, error);
        ErrorRecord::from_api_error(&error, self.auth)
    }

    pub async fn create_post(&self, request: CreatePostRequest) -> Result<Post, ErrorRecord> {
        match self.api.create_post(request).await {
            Ok(post) => {
                log_mutation!(self.log_config, "Created post {}", post.id);
                Ok(post)
            }
            Err(e) => Err(self.failed("create_post", e)),
        }
    }

    pub async fn update_post(&self, post_id: PostId, post_body: String) -> Result<Post, ErrorRecord> {
        match self.api.update_post(post_id, post_body).await {
            Ok(post) => {
                log_mutation!(self.log_config, "Updated post {}", post_id);
                Ok(post)
            }
            Err(e) => Err(self.failed("update_post", e)),
        }
    }

    pub async fn delete_post(&self, post_id: PostId) -> Result<(), ErrorRecord> {
        match self.api.delete_post(post_id).await {
            Ok(()) => {
                log_mutation!(self.log_config, "Deleted post {}", post_id);
                Ok(())
            }
            Err(e) => Err(self.failed("delete_post", e)),
        }
    }

    pub async fn create_comment(&self, post_id: PostId, body: String) -> Result<Comment, ErrorRecord> {
        match self.api.create_comment(post_id, body).await {
            Ok(comment) => {
                log_mutation!(self.log_config, "Created comment {} on post {}", comment.id, post_id);
                Ok(comment)
            }
            Err(e) => Err(self.failed("create_comment", e)),
        }
    }

    pub async fn update_comment(
        &self,
        comment_id: CommentId,
        body: String,
    ) -> Result<Comment, ErrorRecord> {
        match self.api.update_comment(comment_id, body).await {
            Ok(comment) => {
                log_mutation!(self.log_config, "Updated comment {}", comment_id);
                Ok(comment)
            }
            Err(e) => Err(self.failed("update_comment", e)),
        }
    }

    pub async fn delete_comment(&self, comment_id: CommentId, post_id: PostId) -> Result<(), ErrorRecord> {
        match self.api.delete_comment(comment_id).await {
            Ok(()) => {
                log_mutation!(self.log_config, "Deleted comment {} from post {}", comment_id, post_id);
                Ok(())
            }
            Err(e) => Err(self.failed("delete_comment", e)),
        }
    }
}
