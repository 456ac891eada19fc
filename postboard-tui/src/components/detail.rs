use postboard_types::{Comment, CommentId, Page, Post, PostId};

use super::comment::CommentCard;
use super::comment_form::CommentComposer;
use super::confirm::ConfirmationModal;
use super::menu::OwnerMenu;
use super::pagination::{PageRequest, PagedList};
use super::post::PostCard;
use super::scope::TaskScope;
use crate::api::{comments_pointer, ApiResult};

const PREFETCH_DISTANCE: usize = 2;

/// Which part of the detail page has the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Post,
    Composer,
    Comment(usize),
}

/// A single post with its comment thread.
///
/// Owns the requests made on its behalf through `scope`; closing the view
/// drops it and any answer still on its way is discarded.
#[derive(Debug)]
pub struct PostDetailView {
    post_id: PostId,
    post: Option<PostCard>,
    load_error: Option<String>,
    comments: PagedList<CommentCard>,
    pub composer: CommentComposer,
    pub confirm: ConfirmationModal,
    pub menu: OwnerMenu,
    focus: Focus,
    pub scope: TaskScope,
}

impl PostDetailView {
    /// Open on a card already on screen; returns the first comments fetch
    pub fn open(card: PostCard) -> (Self, PageRequest) {
        let mut view = Self::empty(card.id());
        view.post = Some(card);
        let request = view.reload_comments();
        (view, request)
    }

    /// Open by id alone; the post arrives through [`apply_post`](Self::apply_post)
    pub fn by_id(post_id: PostId) -> (Self, PageRequest) {
        let mut view = Self::empty(post_id);
        let request = view.reload_comments();
        (view, request)
    }

    fn empty(post_id: PostId) -> Self {
        Self {
            post_id,
            post: None,
            load_error: None,
            comments: PagedList::new(),
            composer: CommentComposer::new(post_id),
            confirm: ConfirmationModal::new(),
            menu: OwnerMenu::new(),
            focus: Focus::Post,
            scope: TaskScope::new(),
        }
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn post(&self) -> Option<&PostCard> {
        self.post.as_ref()
    }

    pub fn post_mut(&mut self) -> Option<&mut PostCard> {
        self.post.as_mut()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn apply_post(&mut self, result: ApiResult<Post>) {
        match result {
            Ok(post) => match &mut self.post {
                Some(card) => {
                    card.refresh(post);
                }
                None => self.post = Some(PostCard::new(post)),
            },
            Err(e) => {
                log::warn!("Loading post {} failed: {}", self.post_id, e);
                if self.post.is_none() {
                    self.load_error = Some(e.user_message());
                }
            }
        }
    }

    // Comments

    pub fn reload_comments(&mut self) -> PageRequest {
        self.comments.start(comments_pointer(self.post_id))
    }

    pub fn apply_comments(&mut self, seq: u64, result: ApiResult<Page<Comment>>) -> bool {
        self.comments.apply_with(seq, result, CommentCard::new)
    }

    pub fn comments(&self) -> &PagedList<CommentCard> {
        &self.comments
    }

    pub fn comment_mut(&mut self, id: CommentId) -> Option<&mut CommentCard> {
        self.comments.items_mut().iter_mut().find(|card| card.id() == id)
    }

    /// A comment was created from the composer: newest first, counter up
    pub fn on_comment_created(&mut self, comment: Comment) {
        self.comments.prepend(CommentCard::new(comment));
        if let Some(card) = &mut self.post {
            card.comment_added();
        }
        if let Focus::Comment(index) = self.focus {
            self.focus = Focus::Comment(index + 1);
        }
    }

    pub fn on_comment_deleted(&mut self, id: CommentId) {
        let removed = self.comments.remove_where(|card| card.id() == id);
        if removed > 0 {
            if let Some(card) = &mut self.post {
                card.comment_removed();
            }
        }
        if let Focus::Comment(index) = self.focus {
            self.focus = match self.comments.len() {
                0 => Focus::Composer,
                len => Focus::Comment(index.min(len - 1)),
            };
        }
    }

    // Focus

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected_comment(&self) -> Option<&CommentCard> {
        match self.focus {
            Focus::Comment(index) => self.comments.items().get(index),
            _ => None,
        }
    }

    pub fn selected_comment_mut(&mut self) -> Option<&mut CommentCard> {
        match self.focus {
            Focus::Comment(index) => self.comments.items_mut().get_mut(index),
            _ => None,
        }
    }

    pub fn focus_previous(&mut self) {
        self.menu.close();
        self.focus = match self.focus {
            Focus::Post | Focus::Composer => Focus::Post,
            Focus::Comment(0) => Focus::Composer,
            Focus::Comment(index) => Focus::Comment(index - 1),
        };
    }

    /// Move down; returns the next comments fetch near the end of the thread
    pub fn focus_next(&mut self) -> Option<PageRequest> {
        self.menu.close();
        let len = self.comments.len();
        self.focus = match self.focus {
            Focus::Post => Focus::Composer,
            Focus::Composer if len > 0 => Focus::Comment(0),
            Focus::Composer => Focus::Composer,
            Focus::Comment(index) if index + 1 < len => Focus::Comment(index + 1),
            other => other,
        };
        match self.focus {
            Focus::Comment(index) if index + PREFETCH_DISTANCE >= len => {
                self.comments.request_next()
            }
            _ => None,
        }
    }

    pub fn focus_composer(&mut self) {
        self.menu.close();
        self.focus = Focus::Composer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_types::ProfileId;

    fn post() -> Post {
        Post {
            id: PostId(1),
            owner: "ada".to_string(),
            is_owner: true,
            profile_id: ProfileId(1),
            profile_image: String::new(),
            title: "Hello".to_string(),
            content: String::new(),
            image: String::new(),
            like_id: None,
            likes_count: 0,
            comments_count: 1,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn comment(id: i64) -> Comment {
        Comment {
            id: CommentId(id),
            owner: "bob".to_string(),
            is_owner: true,
            profile_id: ProfileId(2),
            profile_image: String::new(),
            content: format!("comment {}", id),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_open_requests_comments_for_post() {
        let (view, request) = PostDetailView::open(PostCard::new(post()));
        assert_eq!(request.pointer, "/comments/?post=1");
        assert!(!view.comments().has_loaded());
        assert_eq!(view.post_id(), PostId(1));
    }

    #[test]
    fn test_created_comment_is_prepended_and_counted() {
        let (mut view, request) = PostDetailView::open(PostCard::new(post()));
        view.apply_comments(request.seq, Ok(Page::new(vec![comment(1)], None)));

        view.on_comment_created(comment(2));
        let ids: Vec<_> = view.comments().items().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![CommentId(2), CommentId(1)]);
        assert_eq!(view.post().map(|p| p.comments_count()), Some(2));
    }

    #[test]
    fn test_deleted_comment_is_removed_and_uncounted() {
        let (mut view, request) = PostDetailView::open(PostCard::new(post()));
        view.apply_comments(request.seq, Ok(Page::new(vec![comment(1)], None)));
        view.focus_next();
        view.focus_next();
        assert_eq!(view.focus(), Focus::Comment(0));

        view.on_comment_deleted(CommentId(1));
        assert!(view.comments().is_empty());
        assert_eq!(view.post().map(|p| p.comments_count()), Some(0));
        assert_eq!(view.focus(), Focus::Composer);

        // Unknown id leaves the counter alone
        view.on_comment_deleted(CommentId(9));
        assert_eq!(view.post().map(|p| p.comments_count()), Some(0));
    }

    #[test]
    fn test_by_id_waits_for_post() {
        let (mut view, _) = PostDetailView::by_id(PostId(1));
        assert!(view.post().is_none());
        view.apply_post(Ok(post()));
        assert_eq!(view.post().map(|p| p.fields().title.as_str()), Some("Hello"));
    }
}
