//! Lazily loaded comment lists, one per mounted post.

use std::collections::HashMap;

use nomex_types::{Comment, CommentId, Post, PostId};

/// The post inputs a comment set was loaded for. Any change triggers a fresh
/// full reload on the next mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountKey {
    pub post_id: PostId,
    pub post_body: Option<String>,
    pub has_image: bool,
    pub has_video: bool,
}

impl MountKey {
    pub fn for_post(post: &Post) -> Self {
        Self {
            post_id: post.id,
            post_body: post.post_body.clone(),
            has_image: post.has_image(),
            has_video: post.has_video(),
        }
    }
}

/// Ticket for one in-flight comment load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentLoad {
    pub post_id: PostId,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct CommentSet {
    comments: Vec<Comment>,
    loading: bool,
    loaded_for: Option<MountKey>,
    generation: u64,
}

impl CommentSet {
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn contains(&self, comment_id: CommentId) -> bool {
        self.comments.iter().any(|c| c.id == comment_id)
    }

    /// Whether the set was loaded (or is loading) for a different version of the post
    pub fn is_stale_for(&self, post: &Post) -> bool {
        self.loaded_for.as_ref() != Some(&MountKey::for_post(post))
    }

    fn begin(&mut self, post: &Post, generation: u64) -> CommentLoad {
        self.loaded_for = Some(MountKey::for_post(post));
        self.generation = generation;
        self.loading = true;
        CommentLoad {
            post_id: post.id,
            generation,
        }
    }

    fn complete_success(&mut self, load: CommentLoad, comments: Vec<Comment>) -> bool {
        if load.generation != self.generation {
            return false;
        }
        self.comments = comments;
        self.loading = false;
        true
    }

    fn complete_failure(&mut self, load: CommentLoad) -> bool {
        if load.generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn push(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Replace the matching comment in place
    pub fn replace(&mut self, comment: Comment) -> bool {
        match self.comments.iter_mut().find(|c| c.id == comment.id) {
            Some(existing) => {
                *existing = comment;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, comment_id: CommentId) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != comment_id);
        self.comments.len() != before
    }
}

/// Owns the comment set of every mounted post
#[derive(Debug, Default)]
pub struct CommentSetLoader {
    sets: HashMap<PostId, CommentSet>,
    /// Shared by all sets and never rewound, so tickets issued before an
    /// unmount or clear cannot match a later load
    generation: u64,
}

impl CommentSetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, post_id: PostId) -> Option<&CommentSet> {
        self.sets.get(&post_id)
    }

    pub fn get_mut(&mut self, post_id: PostId) -> Option<&mut CommentSet> {
        self.sets.get_mut(&post_id)
    }

    /// Start loading comments for `post` unless they are already loaded (or
    /// loading) for this exact version of it.
    pub fn begin_load(&mut self, post: &Post) -> Option<CommentLoad> {
        let set = self.sets.entry(post.id).or_default();
        if !set.is_stale_for(post) {
            return None;
        }
        self.generation += 1;
        Some(set.begin(post, self.generation))
    }

    /// Apply a loaded comment list. `false` means the load was superseded.
    pub fn complete_success(&mut self, load: CommentLoad, comments: Vec<Comment>) -> bool {
        self.sets
            .get_mut(&load.post_id)
            .is_some_and(|set| set.complete_success(load, comments))
    }

    /// Clear the loading flag after a failed load, keeping the sequence.
    pub fn complete_failure(&mut self, load: CommentLoad) -> bool {
        self.sets
            .get_mut(&load.post_id)
            .is_some_and(|set| set.complete_failure(load))
    }

    pub fn unmount(&mut self, post_id: PostId) {
        self.sets.remove(&post_id);
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }

    pub fn mounted_count(&self) -> usize {
        self.sets.len()
    }
}
