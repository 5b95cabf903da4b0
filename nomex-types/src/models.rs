use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Persona;

pub type PostId = i64;
pub type CommentId = i64;
pub type UserId = i64;

/// Number of characters shown before a post body collapses behind "read more"
pub const COLLAPSED_BODY_CHARS: usize = 38;

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

/// Author data denormalized onto posts and comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: UserId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl Author {
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("Unknown")
    }

    /// "Job at Company", or whichever half is known
    pub fn headline(&self) -> Option<String> {
        match (self.job_title.as_deref(), self.company_name.as_deref()) {
            (Some(job), Some(company)) => Some(format!("{} at {}", job, company)),
            (Some(job), None) => Some(job.to_string()),
            (None, Some(company)) => Some(company.to_string()),
            (None, None) => None,
        }
    }

    /// Known persona tag, if the free-form tag matches one
    pub fn persona_kind(&self) -> Option<Persona> {
        self.persona.as_deref().and_then(Persona::parse)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub post_body: Option<String>,
    #[serde(rename = "createdAT", with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
    pub author: Author,
    #[serde(default)]
    pub image_src: Option<String>,
    #[serde(default)]
    pub video_src: Option<String>,
}

impl Post {
    pub fn body(&self) -> &str {
        self.post_body.as_deref().unwrap_or("")
    }

    pub fn has_image(&self) -> bool {
        self.image_src.as_deref().is_some_and(|src| !src.is_empty())
    }

    pub fn has_video(&self) -> bool {
        self.video_src.as_deref().is_some_and(|src| !src.is_empty())
    }

    /// Collapsed body text and whether anything was cut off.
    pub fn preview(&self, limit: usize) -> (&str, bool) {
        let body = self.body();
        match body.char_indices().nth(limit) {
            Some((cut, _)) => (&body[..cut], true),
            None => (body, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub comment: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
    pub author: Author,
    pub post_id: PostId,
}

/// User profile as returned by the user store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Set until the user finishes onboarding
    #[serde(default)]
    pub new_user: bool,
}

// Request/Response types for API

/// One page of the feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPage {
    pub all_posts: Vec<Post>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub data: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub post_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_src: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub post_body: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: PostId,
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
