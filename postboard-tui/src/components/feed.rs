use postboard_types::{Post, PostId};

use super::pagination::{PageRequest, PagedList};
use super::post::PostCard;
use super::scope::TaskScope;
use crate::api::{posts_pointer, ApiResult};
use postboard_types::Page;

/// How close to the end of the list the selection must get before the next
/// page is requested
const PREFETCH_DISTANCE: usize = 2;

/// The post feed
#[derive(Debug, Default)]
pub struct FeedView {
    posts: PagedList<PostCard>,
    selected: usize,
    pub scope: TaskScope,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reload(&mut self) -> PageRequest {
        self.selected = 0;
        self.posts.start(posts_pointer())
    }

    pub fn apply_page(&mut self, seq: u64, result: ApiResult<Page<Post>>) -> bool {
        let applied = self.posts.apply_with(seq, result, PostCard::new);
        self.clamp_selection();
        applied
    }

    pub fn posts(&self) -> &PagedList<PostCard> {
        &self.posts
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&PostCard> {
        self.posts.items().get(self.selected)
    }

    pub fn selected_mut(&mut self) -> Option<&mut PostCard> {
        self.posts.items_mut().get_mut(self.selected)
    }

    pub fn card_mut(&mut self, id: PostId) -> Option<&mut PostCard> {
        self.posts.items_mut().iter_mut().find(|card| card.id() == id)
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move down; returns the next-page fetch when the end comes into reach
    pub fn select_next(&mut self) -> Option<PageRequest> {
        if self.selected + 1 < self.posts.len() {
            self.selected += 1;
        }
        if self.selected + PREFETCH_DISTANCE >= self.posts.len() {
            self.posts.request_next()
        } else {
            None
        }
    }

    /// Take over the state a detail view ended with
    pub fn absorb(&mut self, card: &PostCard) {
        if let Some(existing) = self.card_mut(card.id()) {
            existing.absorb(card);
        }
    }

    pub fn remove(&mut self, id: PostId) {
        self.posts.remove_where(|card| card.id() == id);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.posts.len() {
            self.selected = self.posts.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_types::ProfileId;

    fn post(id: i64) -> Post {
        Post {
            id: PostId(id),
            owner: "ada".to_string(),
            is_owner: false,
            profile_id: ProfileId(1),
            profile_image: String::new(),
            title: format!("Post {}", id),
            content: String::new(),
            image: String::new(),
            like_id: None,
            likes_count: 0,
            comments_count: 0,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_scrolling_to_the_end_requests_next_page() {
        let mut feed = FeedView::new();
        let first = feed.reload();
        assert_eq!(first.pointer, "/posts/");
        feed.apply_page(
            first.seq,
            Ok(Page::new(
                (1..=4).map(post).collect(),
                Some("/posts/?page=2".into()),
            )),
        );

        assert!(feed.select_next().is_none());
        let next = feed.select_next().expect("within prefetch distance");
        assert_eq!(next.pointer, "/posts/?page=2");
        // Serialized: no second fetch while one is out
        assert!(feed.select_next().is_none());
    }

    #[test]
    fn test_remove_keeps_selection_in_bounds() {
        let mut feed = FeedView::new();
        let first = feed.reload();
        feed.apply_page(first.seq, Ok(Page::new(vec![post(1), post(2)], None)));
        feed.select_next();
        assert_eq!(feed.selected_index(), 1);

        feed.remove(PostId(2));
        assert_eq!(feed.selected_index(), 0);
        assert_eq!(feed.selected().map(|c| c.id()), Some(PostId(1)));
    }
}
