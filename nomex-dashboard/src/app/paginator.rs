//! Incremental, append-only pagination of the shared post feed.
//!
//! A fetch is split in two halves so the single-flight rule is explicit:
//! `begin_*` hands out a [`PageRequest`] ticket (or `None` when a fetch must
//! not start) and `complete_*` applies the response for that ticket. Tickets
//! issued before a [`FeedPaginator::reset`] are stale and their results are
//! dropped.

use std::collections::HashSet;

use nomex_types::{AuthStatus, Post, PostId, PostsPage};

/// Accumulated feed plus the pagination flags
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub posts: Vec<Post>,
    /// Last page cursor; starts at 1 and only moves forward
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    /// At least one page fetch has completed
    pub has_fetched: bool,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            page: 1,
            has_more: true,
            loading: false,
            has_fetched: false,
        }
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticket for one in-flight page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    generation: u64,
}

/// What an auth status change asks of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTransition {
    /// Nothing to do (status pending, or the current page is already loaded)
    Idle,
    /// Fetch this page now
    Fetch(PageRequest),
    /// Session is gone; surface an auth error
    AuthRequired,
}

#[derive(Debug)]
pub struct FeedPaginator {
    state: FeedState,
    suppressed: bool,
    generation: u64,
}

impl FeedPaginator {
    pub fn new() -> Self {
        Self {
            state: FeedState::new(),
            suppressed: false,
            generation: 0,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn posts(&self) -> &[Post] {
        &self.state.posts
    }

    /// Fetching is blocked until the next `Authenticated` transition
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn contains(&self, post_id: PostId) -> bool {
        self.state.posts.iter().any(|p| p.id == post_id)
    }

    pub fn on_auth_status_change(&mut self, status: AuthStatus) -> AuthTransition {
        match status {
            AuthStatus::Loading => AuthTransition::Idle,
            AuthStatus::Unauthenticated => {
                // Any fetch still in flight belongs to the old session
                self.suppressed = true;
                self.state.loading = false;
                self.generation += 1;
                AuthTransition::AuthRequired
            }
            AuthStatus::Authenticated => {
                self.suppressed = false;
                if self.state.has_fetched {
                    return AuthTransition::Idle;
                }
                match self.begin_fetch_page(self.state.page) {
                    Some(request) => AuthTransition::Fetch(request),
                    None => AuthTransition::Idle,
                }
            }
        }
    }

    /// Start fetching `page` unless a fetch is in flight or fetching is suppressed
    pub fn begin_fetch_page(&mut self, page: u32) -> Option<PageRequest> {
        if self.suppressed || self.state.loading {
            return None;
        }
        self.state.loading = true;
        Some(PageRequest {
            page,
            generation: self.generation,
        })
    }

    /// Start fetching the page after the cursor.
    ///
    /// Returns `None` once the server reported no more pages, while a fetch
    /// is in flight, while suppressed, or before the first page has loaded.
    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        if !self.state.has_more || !self.state.has_fetched {
            return None;
        }
        self.begin_fetch_page(self.state.page + 1)
    }

    /// Apply a successful response. Returns how many posts were appended,
    /// or `None` when the ticket is stale.
    pub fn complete_success(&mut self, request: PageRequest, page: PostsPage) -> Option<usize> {
        if request.generation != self.generation {
            return None;
        }

        let mut seen: HashSet<PostId> = self.state.posts.iter().map(|p| p.id).collect();
        let before = self.state.posts.len();
        for post in page.all_posts {
            if seen.insert(post.id) {
                self.state.posts.push(post);
            } else {
                log::warn!("Skipping post {} already in feed (page {})", post.id, request.page);
            }
        }

        // Exhaustion comes from the server flag only; an empty page may still have successors
        self.state.has_more = page.has_more;
        self.state.page = self.state.page.max(request.page);
        self.state.loading = false;
        self.state.has_fetched = true;

        Some(self.state.posts.len() - before)
    }

    /// Record a failed fetch. The cursor stays where it was.
    /// Returns `false` when the ticket is stale.
    pub fn complete_failure(&mut self, request: PageRequest) -> bool {
        if request.generation != self.generation {
            return false;
        }
        self.state.loading = false;
        true
    }

    /// Replace a post's body in place. Returns `false` if it is not in the feed.
    pub fn update_body(&mut self, post_id: PostId, post_body: Option<String>) -> bool {
        match self.state.posts.iter_mut().find(|p| p.id == post_id) {
            Some(post) => {
                post.post_body = post_body;
                true
            }
            None => false,
        }
    }

    /// Drop every accumulated page and start over at page 1.
    /// In-flight tickets become stale; auth suppression is kept.
    pub fn reset(&mut self) {
        self.state = FeedState::new();
        self.generation += 1;
    }
}

impl Default for FeedPaginator {
    fn default() -> Self {
        Self::new()
    }
}
