use nomex_types::{CommentId, PostId, UserId};
use thiserror::Error;

use super::errors::ErrorKind;

/// The signed-in user, as far as ownership checks are concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: UserId,
    pub email: String,
}

impl Viewer {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}

/// Why a dashboard action did not go through
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Sign in to do that")]
    NotSignedIn,

    #[error("Only the author can change this")]
    NotAuthor,

    #[error("Validation Error: {0}")]
    Invalid(&'static str),

    #[error("Post {0} is not in the feed")]
    UnknownPost(PostId),

    #[error("Comment {0} is not loaded")]
    UnknownComment(CommentId),

    /// The remote call failed; the dashboard's error record holds the details
    #[error("{0}")]
    Failed(ErrorKind),
}

pub type ActionResult<T> = Result<T, ActionError>;
