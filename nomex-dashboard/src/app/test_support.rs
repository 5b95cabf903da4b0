use chrono::{TimeZone, Utc};
use nomex_types::{Author, Comment, CommentId, Post, PostId, UserId};

pub fn author(id: UserId) -> Author {
    Author {
        id,
        user_name: Some(format!("user{}", id)),
        persona: Some("EXPAT".to_string()),
        job_title: None,
        company_name: None,
        profile_picture: None,
    }
}

pub fn post(id: PostId, author_id: UserId) -> Post {
    Post {
        id,
        post_body: Some(format!("post body {}", id)),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        author_id,
        author: author(author_id),
        image_src: None,
        video_src: None,
    }
}

pub fn comment(id: CommentId, post_id: PostId, author_id: UserId) -> Comment {
    Comment {
        id,
        comment: format!("comment {}", id),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap(),
        author_id,
        author: author(author_id),
        post_id,
    }
}
