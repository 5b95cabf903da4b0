//! Per-post inline editing modes.

use std::collections::HashMap;

use nomex_types::{CommentId, PostId};

/// Which inline editor is open on a post
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditingMode {
    #[default]
    Viewing,
    EditingPost,
    AddingComment,
    EditingComment {
        comment_id: CommentId,
        original_text: String,
    },
}

impl EditingMode {
    pub fn is_viewing(&self) -> bool {
        matches!(self, EditingMode::Viewing)
    }

    /// Same variant, ignoring the comment payload
    pub fn same_kind(&self, other: &EditingMode) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Exclusive toggle: re-entering the active kind closes the editor,
    /// anything else replaces it.
    pub fn toggle(&mut self, target: EditingMode) {
        if self.same_kind(&target) {
            *self = EditingMode::Viewing;
        } else {
            *self = target;
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditingMode::Viewing => "viewing",
            EditingMode::EditingPost => "editing_post",
            EditingMode::AddingComment => "adding_comment",
            EditingMode::EditingComment { .. } => "editing_comment",
        }
    }
}

/// Editing mode of every mounted post, keyed by post id.
/// Posts without an entry are viewing.
#[derive(Debug, Default)]
pub struct EditingModes {
    modes: HashMap<PostId, EditingMode>,
}

static VIEWING: EditingMode = EditingMode::Viewing;

impl EditingModes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, post_id: PostId) -> &EditingMode {
        self.modes.get(&post_id).unwrap_or(&VIEWING)
    }

    /// Toggle and return the resulting mode
    pub fn toggle(&mut self, post_id: PostId, target: EditingMode) -> &EditingMode {
        let mode = self.modes.entry(post_id).or_default();
        mode.toggle(target);
        if mode.is_viewing() {
            self.modes.remove(&post_id);
            return &VIEWING;
        }
        self.get(post_id)
    }

    pub fn close(&mut self, post_id: PostId) {
        self.modes.remove(&post_id);
    }

    /// Number of posts with an open editor
    pub fn active_count(&self) -> usize {
        self.modes.len()
    }

    pub fn clear(&mut self) {
        self.modes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn editing_comment(comment_id: CommentId) -> EditingMode {
        EditingMode::EditingComment {
            comment_id,
            original_text: format!("comment {}", comment_id),
        }
    }

    #[test]
    fn test_switching_modes_overwrites() {
        let mut mode = EditingMode::Viewing;
        mode.toggle(EditingMode::EditingPost);
        mode.toggle(EditingMode::AddingComment);
        assert_eq!(mode, EditingMode::AddingComment);
    }

    #[test]
    fn test_same_mode_twice_returns_to_viewing() {
        let mut mode = EditingMode::Viewing;
        mode.toggle(EditingMode::AddingComment);
        mode.toggle(EditingMode::AddingComment);
        assert_eq!(mode, EditingMode::Viewing);
    }

    #[test]
    fn test_comment_edit_toggle_ignores_comment_id() {
        let mut mode = EditingMode::Viewing;
        mode.toggle(editing_comment(1));
        assert_eq!(mode, editing_comment(1));

        mode.toggle(editing_comment(2));
        assert_eq!(mode, EditingMode::Viewing);
    }

    #[test]
    fn test_toggle_viewing_closes_any_editor() {
        let mut mode = EditingMode::EditingPost;
        mode.toggle(EditingMode::Viewing);
        assert!(mode.is_viewing());
    }

    #[test]
    fn test_modes_are_tracked_per_post() {
        let mut modes = EditingModes::new();
        modes.toggle(1, EditingMode::EditingPost);
        modes.toggle(2, EditingMode::AddingComment);

        assert_eq!(modes.get(1), &EditingMode::EditingPost);
        assert_eq!(modes.get(2), &EditingMode::AddingComment);
        assert_eq!(modes.get(3), &EditingMode::Viewing);
        assert_eq!(modes.active_count(), 2);

        assert!(modes.toggle(1, EditingMode::EditingPost).is_viewing());
        modes.close(2);
        assert_eq!(modes.active_count(), 0);
    }

    fn any_mode() -> impl Strategy<Value = EditingMode> {
        prop_oneof![
            Just(EditingMode::Viewing),
            Just(EditingMode::EditingPost),
            Just(EditingMode::AddingComment),
            (1i64..4).prop_map(editing_comment),
        ]
    }

    proptest! {
        // Toggling the same kind twice in a row from any state lands on viewing,
        // and a single toggle never leaves two editors open
        #[test]
        fn prop_toggle_is_exclusive(start in any_mode(), target in any_mode()) {
            let mut mode = start.clone();
            mode.toggle(target.clone());
            if start.same_kind(&target) {
                prop_assert!(mode.is_viewing());
            } else {
                prop_assert_eq!(&mode, &target);
            }

            if !target.is_viewing() {
                let mut twice = EditingMode::Viewing;
                twice.toggle(target.clone());
                twice.toggle(target);
                prop_assert!(twice.is_viewing());
            }
        }
    }
}
