use nomex_types::{AuthStatus, Comment, CommentId, CreatePostRequest, Post, PostId, UserId};

use crate::api::{ApiClient, FeedApi};
use crate::logging::LogConfig;

pub mod comments;
pub mod editing;
pub mod errors;
pub mod mutations;
pub mod paginator;
pub mod state;

pub use comments::{CommentSet, CommentSetLoader};
pub use editing::{EditingMode, EditingModes};
pub use errors::{classify, ErrorKind, ErrorRecord};
pub use mutations::MutationCoordinator;
pub use paginator::{AuthTransition, FeedPaginator, FeedState, PageRequest};
pub use state::*;

#[cfg(test)]
mod test_support;

/// Feed-level owner of all dashboard state.
///
/// Holds the paginated feed, posts created in this session that pagination
/// has not caught up with yet, one editing mode and one comment set per
/// mounted post, the onboarding flag, and the single error record shown in
/// place of the feed.
pub struct Dashboard<A: FeedApi = ApiClient> {
    api: A,
    auth_status: AuthStatus,
    viewer: Option<Viewer>,
    feed: FeedPaginator,
    fresh_posts: Vec<Post>,
    editing: EditingModes,
    comments: CommentSetLoader,
    error: Option<ErrorRecord>,
    needs_onboarding: bool,
    log_config: LogConfig,
}

impl<A: FeedApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self::with_log_config(api, LogConfig::default())
    }

    pub fn with_log_config(api: A, log_config: LogConfig) -> Self {
        Self {
            api,
            auth_status: AuthStatus::Loading,
            viewer: None,
            feed: FeedPaginator::new(),
            fresh_posts: Vec::new(),
            editing: EditingModes::new(),
            comments: CommentSetLoader::new(),
            error: None,
            needs_onboarding: false,
            log_config,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn auth_status(&self) -> AuthStatus {
        self.auth_status
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    pub fn feed_state(&self) -> &FeedState {
        self.feed.state()
    }

    /// Posts to render: this session's new posts (newest first) that
    /// pagination has not delivered yet, then the paginated feed.
    pub fn visible_posts(&self) -> Vec<&Post> {
        self.fresh_posts
            .iter()
            .filter(|p| !self.feed.contains(p.id))
            .chain(self.feed.posts().iter())
            .collect()
    }

    pub fn post(&self, post_id: PostId) -> Option<&Post> {
        self.fresh_posts
            .iter()
            .chain(self.feed.posts().iter())
            .find(|p| p.id == post_id)
    }

    pub fn editing_mode(&self, post_id: PostId) -> &EditingMode {
        self.editing.get(post_id)
    }

    pub fn comment_set(&self, post_id: PostId) -> Option<&CommentSet> {
        self.comments.get(post_id)
    }

    pub fn error(&self) -> Option<&ErrorRecord> {
        self.error.as_ref()
    }

    /// Feed content is hidden while an error is shown
    pub fn is_content_visible(&self) -> bool {
        self.error.is_none()
    }

    /// Loading with nothing fetched yet (full-screen spinner case)
    pub fn is_initial_loading(&self) -> bool {
        let state = self.feed.state();
        state.loading && !state.has_fetched
    }

    pub fn needs_onboarding(&self) -> bool {
        self.needs_onboarding
    }

    /// Only an item's author may edit or delete it
    pub fn can_modify(&self, author_id: UserId) -> bool {
        self.viewer.as_ref().is_some_and(|v| v.user_id == author_id)
    }

    fn surface(&mut self, record: ErrorRecord) {
        log::error!("Dashboard error: {}", record);
        self.error = Some(record);
    }

    fn require_viewer(&self) -> ActionResult<&Viewer> {
        self.viewer.as_ref().ok_or(ActionError::NotSignedIn)
    }

    fn require_author(&self, author_id: UserId) -> ActionResult<()> {
        self.require_viewer()?;
        if self.can_modify(author_id) {
            Ok(())
        } else {
            Err(ActionError::NotAuthor)
        }
    }

    fn find_comment(&self, post_id: PostId, comment_id: CommentId) -> ActionResult<&Comment> {
        self.comments
            .get(post_id)
            .and_then(|set| set.comments().iter().find(|c| c.id == comment_id))
            .ok_or(ActionError::UnknownComment(comment_id))
    }

    // Feed synchronization

    /// React to the identity provider's status. `viewer` identifies the
    /// session user once authenticated.
    pub async fn on_auth_status_change(&mut self, status: AuthStatus, viewer: Option<Viewer>) {
        log_feed!(self.log_config, "Auth status changed to {}", status.as_str());
        self.auth_status = status;
        match status {
            AuthStatus::Authenticated => {
                if viewer.is_some() {
                    self.viewer = viewer;
                }
            }
            AuthStatus::Unauthenticated => self.viewer = None,
            AuthStatus::Loading => {}
        }

        match self.feed.on_auth_status_change(status) {
            AuthTransition::Fetch(request) => self.run_page_fetch(request).await,
            AuthTransition::AuthRequired => {
                // No request was attempted, so this classifies as an auth problem
                self.surface(ErrorRecord {
                    kind: classify(None, status),
                    detail: None,
                });
            }
            AuthTransition::Idle => {}
        }
    }

    /// Fetch a specific page. Returns whether a request was sent.
    pub async fn fetch_page(&mut self, page: u32) -> bool {
        if self.error.is_some() {
            return false;
        }
        match self.feed.begin_fetch_page(page) {
            Some(request) => {
                self.run_page_fetch(request).await;
                true
            }
            None => false,
        }
    }

    /// Infinite-scroll trigger. Returns whether a request was sent.
    pub async fn load_next_page(&mut self) -> bool {
        if self.error.is_some() {
            log_feed!(self.log_config, "Not loading more while an error is shown");
            return false;
        }
        match self.feed.begin_next_page() {
            Some(request) => {
                self.run_page_fetch(request).await;
                true
            }
            None => {
                log_feed!(
                    self.log_config,
                    "No page load (has_more={}, loading={})",
                    self.feed.state().has_more,
                    self.feed.state().loading
                );
                false
            }
        }
    }

    async fn run_page_fetch(&mut self, request: PageRequest) {
        log_api_call!(self.log_config, "GET /posts/{}", request.page);
        match self.api.fetch_posts_page(request.page).await {
            Ok(page) => {
                let has_more = page.has_more;
                if let Some(added) = self.feed.complete_success(request, page) {
                    log_feed!(
                        self.log_config,
                        "Page {} appended {} posts (has_more={})",
                        request.page,
                        added,
                        has_more
                    );
                    let feed = &self.feed;
                    self.fresh_posts.retain(|p| !feed.contains(p.id));
                }
            }
            Err(e) => {
                if self.feed.complete_failure(request) {
                    log::warn!("Fetching page {} failed: {}", request.page, e);
                    let record = ErrorRecord::from_api_error(&e, self.auth_status);
                    self.surface(record);
                }
            }
        }
    }

    /// Discard every accumulated page and restart from page 1
    async fn reload_feed(&mut self) {
        log_feed!(self.log_config, "Reloading feed from page 1");
        self.feed.reset();
        self.fresh_posts.clear();
        self.editing.clear();
        self.comments.clear();
        if let Some(request) = self.feed.begin_fetch_page(1) {
            self.run_page_fetch(request).await;
        }
    }

    /// Load a post's comments on first mount, or again after the post's body
    /// or media changed. Returns whether a request was sent.
    pub async fn mount_post(&mut self, post_id: PostId) -> bool {
        if self.error.is_some() {
            return false;
        }
        let post = match self.post(post_id) {
            Some(post) => post.clone(),
            None => return false,
        };
        let load = match self.comments.begin_load(&post) {
            Some(load) => load,
            None => return false,
        };

        log_api_call!(self.log_config, "GET /comments/{}", post_id);
        match self.api.fetch_comments(post_id).await {
            Ok(comments) => {
                let count = comments.len();
                if self.comments.complete_success(load, comments) {
                    log_comments!(self.log_config, "Loaded {} comments for post {}", count, post_id);
                }
            }
            Err(e) => {
                if self.comments.complete_failure(load) {
                    log::warn!("Loading comments for post {} failed: {}", post_id, e);
                    let record = ErrorRecord::from_api_error(&e, self.auth_status);
                    self.surface(record);
                }
            }
        }
        true
    }

    pub fn unmount_post(&mut self, post_id: PostId) {
        self.comments.unmount(post_id);
        self.editing.close(post_id);
    }

    // Inline editing

    /// Toggle an inline editor on a post. Editing a post or a comment is
    /// only offered to its author; anyone signed in may add a comment.
    pub fn toggle_editing(&mut self, post_id: PostId, target: EditingMode) -> ActionResult<&EditingMode> {
        let author_id = self
            .post(post_id)
            .map(|p| p.author_id)
            .ok_or(ActionError::UnknownPost(post_id))?;

        match &target {
            EditingMode::EditingPost => self.require_author(author_id)?,
            EditingMode::EditingComment { comment_id, .. } => {
                let comment_author = self.find_comment(post_id, *comment_id)?.author_id;
                self.require_author(comment_author)?;
            }
            EditingMode::AddingComment => {
                self.require_viewer()?;
            }
            EditingMode::Viewing => {}
        }

        let mode = self.editing.toggle(post_id, target);
        log_editing!(self.log_config, "Post {} now {}", post_id, mode.name());
        Ok(mode)
    }

    // Mutations

    fn mutations(&self) -> MutationCoordinator<'_, A> {
        MutationCoordinator::new(&self.api, self.auth_status, &self.log_config)
    }

    /// Publish a new post. It is shown ahead of the feed right away.
    pub async fn create_post(&mut self, request: CreatePostRequest) -> ActionResult<PostId> {
        self.require_viewer()?;
        let has_body = request
            .post_body
            .as_deref()
            .is_some_and(|b| !b.trim().is_empty());
        let has_media = request.image_src.as_deref().is_some_and(|s| !s.is_empty())
            || request.video_src.as_deref().is_some_and(|s| !s.is_empty());
        if !has_body && !has_media {
            return Err(ActionError::Invalid("Cannot post empty content."));
        }

        let result = self.mutations().create_post(request).await;
        match result {
            Ok(post) => {
                let post_id = post.id;
                self.fresh_posts.insert(0, post);
                Ok(post_id)
            }
            Err(record) => {
                let kind = record.kind;
                self.surface(record);
                Err(ActionError::Failed(kind))
            }
        }
    }

    /// Replace a post's body in place
    pub async fn update_post(&mut self, post_id: PostId, post_body: String) -> ActionResult<()> {
        let author_id = self
            .post(post_id)
            .map(|p| p.author_id)
            .ok_or(ActionError::UnknownPost(post_id))?;
        self.require_author(author_id)?;
        if post_body.trim().is_empty() {
            return Err(ActionError::Invalid("Cannot save empty post."));
        }

        let result = self.mutations().update_post(post_id, post_body).await;
        match result {
            Ok(updated) => {
                self.feed.update_body(post_id, updated.post_body.clone());
                if let Some(fresh) = self.fresh_posts.iter_mut().find(|p| p.id == post_id) {
                    fresh.post_body = updated.post_body;
                }
                self.editing.close(post_id);
                Ok(())
            }
            Err(record) => {
                let kind = record.kind;
                self.surface(record);
                Err(ActionError::Failed(kind))
            }
        }
    }

    /// Delete a post, then reload the whole feed from page 1
    pub async fn delete_post(&mut self, post_id: PostId) -> ActionResult<()> {
        let author_id = self
            .post(post_id)
            .map(|p| p.author_id)
            .ok_or(ActionError::UnknownPost(post_id))?;
        self.require_author(author_id)?;

        let result = self.mutations().delete_post(post_id).await;
        match result {
            Ok(()) => {
                self.reload_feed().await;
                Ok(())
            }
            Err(record) => {
                let kind = record.kind;
                self.surface(record);
                Err(ActionError::Failed(kind))
            }
        }
    }

    pub async fn create_comment(&mut self, post_id: PostId, body: String) -> ActionResult<CommentId> {
        self.require_viewer()?;
        if self.post(post_id).is_none() {
            return Err(ActionError::UnknownPost(post_id));
        }
        if body.trim().is_empty() {
            return Err(ActionError::Invalid("Cannot post empty comment."));
        }

        let result = self.mutations().create_comment(post_id, body).await;
        match result {
            Ok(comment) => {
                let comment_id = comment.id;
                match self.comments.get_mut(post_id) {
                    Some(set) => set.push(comment),
                    None => log_comments!(
                        self.log_config,
                        "Comment {} created on post {} with no mounted set, next mount fetches it",
                        comment_id,
                        post_id
                    ),
                }
                self.editing.close(post_id);
                Ok(comment_id)
            }
            Err(record) => {
                let kind = record.kind;
                self.surface(record);
                Err(ActionError::Failed(kind))
            }
        }
    }

    pub async fn update_comment(
        &mut self,
        post_id: PostId,
        comment_id: CommentId,
        body: String,
    ) -> ActionResult<()> {
        let author_id = self.find_comment(post_id, comment_id)?.author_id;
        self.require_author(author_id)?;
        if body.trim().is_empty() {
            return Err(ActionError::Invalid("Cannot save empty comment."));
        }

        let result = self.mutations().update_comment(comment_id, body).await;
        match result {
            Ok(updated) => {
                if let Some(set) = self.comments.get_mut(post_id) {
                    set.replace(updated);
                }
                self.editing.close(post_id);
                Ok(())
            }
            Err(record) => {
                let kind = record.kind;
                self.surface(record);
                Err(ActionError::Failed(kind))
            }
        }
    }

    /// Remove a comment once the server confirms the delete
    pub async fn delete_comment(&mut self, post_id: PostId, comment_id: CommentId) -> ActionResult<()> {
        let author_id = self.find_comment(post_id, comment_id)?.author_id;
        self.require_author(author_id)?;

        let result = self.mutations().delete_comment(comment_id, post_id).await;
        match result {
            Ok(()) => {
                if let Some(set) = self.comments.get_mut(post_id) {
                    set.remove(comment_id);
                }
                self.editing.close(post_id);
                Ok(())
            }
            Err(record) => {
                let kind = record.kind;
                self.surface(record);
                Err(ActionError::Failed(kind))
            }
        }
    }

    // Onboarding and recovery

    /// Look up the user record to decide whether onboarding is still pending
    pub async fn check_onboarding(&mut self, email: &str) -> ActionResult<bool> {
        log_api_call!(self.log_config, "GET /users/{}", email);
        match self.api.fetch_user(email).await {
            Ok(profile) => {
                self.needs_onboarding = profile.new_user;
                Ok(profile.new_user)
            }
            Err(e) => {
                let record = ErrorRecord::from_api_error(&e, self.auth_status);
                let kind = record.kind;
                self.surface(record);
                Err(ActionError::Failed(kind))
            }
        }
    }

    /// Clear the error and rebuild everything from an empty feed at page 1.
    /// Results of calls started before the reset are ignored.
    pub async fn reset(&mut self) {
        log_debug!(self.log_config, "Resetting dashboard state");
        self.error = None;
        self.feed.reset();
        self.fresh_posts.clear();
        self.editing.clear();
        self.comments.clear();

        let status = self.auth_status;
        let viewer = self.viewer.clone();
        self.on_auth_status_change(status, viewer).await;
    }
}
