use postboard_types::{ImageUpload, Post, PostId, PostUpdate, ProfileId};
use std::path::PathBuf;
use std::time::Instant;

use super::edit::{EditPhase, InlineEditor};
use super::like::{LikeClick, LikeOutcome, LikeToggle};
use crate::api::{image_upload_from_path, ApiError, ApiResult, Backend};
use crate::auth::AuthContext;

pub const TITLE_MAX_CHARS: usize = 50;
pub const CONTENT_MAX_CHARS: usize = 200;

/// The editable part of a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub content: String,
    /// Current image URL, read-only in the form
    pub image: String,
}

impl PostFields {
    fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            image: post.image.clone(),
        }
    }
}

/// Everything needed to send a post update
#[derive(Debug, Clone, PartialEq)]
pub struct PostEditRequest {
    pub post_id: PostId,
    pub title: String,
    pub content: String,
    /// Path of a newly chosen image; `None` keeps the current one
    pub image_path: Option<PathBuf>,
}

impl PostEditRequest {
    pub fn into_update(self, image: Option<ImageUpload>) -> PostUpdate {
        PostUpdate {
            title: self.title,
            content: self.content,
            image,
        }
    }

    /// Read the chosen image (if any) and send the multipart update
    pub async fn perform<B: Backend>(self, backend: &B) -> ApiResult<Post> {
        let image = match &self.image_path {
            Some(path) => Some(image_upload_from_path(path).await?),
            None => None,
        };
        let post_id = self.post_id;
        let update = self.into_update(image);
        backend.update_post(post_id, &update).await
    }
}

/// A post as shown in the feed or on its own page
#[derive(Debug, Clone)]
pub struct PostCard {
    post: Post,
    pub like: LikeToggle,
    comments_count: i64,
    editor: InlineEditor<PostFields>,
    /// Image path typed into the edit form; empty means unchanged
    image_path: String,
}

impl PostCard {
    pub fn new(post: Post) -> Self {
        Self {
            like: LikeToggle::new(&post),
            comments_count: post.comments_count,
            editor: InlineEditor::new(PostFields::from_post(&post)),
            image_path: String::new(),
            post,
        }
    }

    pub fn id(&self) -> PostId {
        self.post.id
    }

    pub fn owner(&self) -> &str {
        &self.post.owner
    }

    pub fn is_owner(&self) -> bool {
        self.post.is_owner
    }

    pub fn profile_id(&self) -> ProfileId {
        self.post.profile_id
    }

    pub fn profile_image(&self) -> &str {
        &self.post.profile_image
    }

    pub fn created_at(&self) -> &str {
        &self.post.created_at
    }

    pub fn updated_at(&self) -> &str {
        &self.post.updated_at
    }

    /// Displayed title, content and image (the draft while editing)
    pub fn fields(&self) -> &PostFields {
        self.editor.content()
    }

    pub fn comments_count(&self) -> i64 {
        self.comments_count
    }

    pub fn comment_added(&mut self) {
        self.comments_count += 1;
    }

    pub fn comment_removed(&mut self) {
        self.comments_count -= 1;
    }

    /// Take a freshly fetched copy of the post, unless the viewer is in the
    /// middle of changing it
    pub fn refresh(&mut self, post: Post) -> bool {
        if self.editor.is_editing() || self.like.state().is_busy() {
            return false;
        }
        *self = PostCard::new(post);
        true
    }

    /// Copy what another card for the same post has learned since. A like
    /// still in flight over there is not taken over; its task is gone.
    pub fn absorb(&mut self, other: &PostCard) {
        self.post = other.post.clone();
        self.comments_count = other.comments_count;
        self.editor.reset(PostFields::from_post(&other.post));
        if !other.like.state().is_busy() {
            self.like = other.like.clone();
        }
    }

    pub fn click_like(&mut self, auth: &AuthContext, now: Instant) -> LikeClick {
        self.like.click(auth, now)
    }

    pub fn settle_like(&mut self, outcome: LikeOutcome) -> Result<(), ApiError> {
        self.like.settle(outcome)
    }

    // Editing

    pub fn edit_phase(&self) -> EditPhase {
        self.editor.phase()
    }

    pub fn editor(&self) -> &InlineEditor<PostFields> {
        &self.editor
    }

    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    pub fn begin_edit(&mut self) -> bool {
        let started = self.editor.begin(self.post.is_owner);
        if started {
            self.image_path.clear();
        }
        started
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(draft) = self.editor.draft_mut() {
            draft.title = title.chars().take(TITLE_MAX_CHARS).collect();
        }
    }

    pub fn set_content(&mut self, content: &str) {
        if let Some(draft) = self.editor.draft_mut() {
            draft.content = content.chars().take(CONTENT_MAX_CHARS).collect();
        }
    }

    pub fn set_image_path(&mut self, path: &str) {
        if self.editor.phase() == EditPhase::Editing {
            self.image_path = path.trim().to_string();
        }
    }

    pub fn cancel_edit(&mut self) -> bool {
        let cancelled = self.editor.cancel();
        if cancelled {
            self.image_path.clear();
        }
        cancelled
    }

    pub fn submit_edit(&mut self) -> Option<PostEditRequest> {
        let draft = self.editor.submit()?;
        let image_path = if self.image_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.image_path))
        };
        Some(PostEditRequest {
            post_id: self.post.id,
            title: draft.title,
            content: draft.content,
            image_path,
        })
    }

    /// Apply the server's copy of the updated post
    pub fn complete_edit(&mut self, result: ApiResult<Post>) -> Result<(), ApiError> {
        let echoed = result.map(|post| {
            self.post.title = post.title.clone();
            self.post.content = post.content.clone();
            self.post.image = post.image.clone();
            self.post.updated_at = post.updated_at.clone();
            PostFields::from_post(&post)
        });
        let succeeded = echoed.is_ok();
        let outcome = self.editor.complete(echoed);
        if succeeded {
            // The upload went through; don't send it again next time
            self.image_path.clear();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_types::FieldErrors;

    fn post(is_owner: bool) -> Post {
        Post {
            id: PostId(3),
            owner: "ada".to_string(),
            is_owner,
            profile_id: ProfileId(1),
            profile_image: String::new(),
            title: "Old Title".to_string(),
            content: "Body".to_string(),
            image: "https://img/1.jpg".to_string(),
            like_id: None,
            likes_count: 0,
            comments_count: 2,
            created_at: "1 day ago".to_string(),
            updated_at: "1 day ago".to_string(),
        }
    }

    #[test]
    fn test_edit_without_image_has_no_image_path() {
        let mut card = PostCard::new(post(true));
        assert!(card.begin_edit());
        card.set_title("New Title");

        let request = card.submit_edit().unwrap();
        assert_eq!(request.title, "New Title");
        assert_eq!(request.content, "Body");
        assert_eq!(request.image_path, None);
        assert_eq!(request.into_update(None).image, None);
    }

    #[test]
    fn test_title_and_content_are_capped() {
        let mut card = PostCard::new(post(true));
        card.begin_edit();
        card.set_title(&"x".repeat(80));
        card.set_content(&"y".repeat(300));

        assert_eq!(card.fields().title.chars().count(), TITLE_MAX_CHARS);
        assert_eq!(card.fields().content.chars().count(), CONTENT_MAX_CHARS);
    }

    #[test]
    fn test_successful_edit_clears_pending_image() {
        let mut card = PostCard::new(post(true));
        card.begin_edit();
        card.set_image_path(" /tmp/new.png ");
        let request = card.submit_edit().unwrap();
        assert_eq!(request.image_path, Some(PathBuf::from("/tmp/new.png")));

        let mut echoed = post(true);
        echoed.image = "https://img/2.png".to_string();
        card.complete_edit(Ok(echoed)).unwrap();

        assert_eq!(card.image_path(), "");
        assert_eq!(card.fields().image, "https://img/2.png");
        assert_eq!(card.edit_phase(), EditPhase::Viewing);
    }

    #[test]
    fn test_failed_edit_keeps_form_open_with_errors() {
        let mut card = PostCard::new(post(true));
        card.begin_edit();
        card.set_image_path("/tmp/huge.png");
        card.submit_edit();

        let mut errors = FieldErrors::new();
        errors.insert("image", "Image size larger than 2MB!");
        assert!(card.complete_edit(Err(ApiError::Validation(errors))).is_err());

        assert_eq!(card.edit_phase(), EditPhase::Editing);
        assert_eq!(card.editor().errors().field("image").len(), 1);
        assert_eq!(card.image_path(), "/tmp/huge.png");
    }

    #[test]
    fn test_non_owner_cannot_edit() {
        let mut card = PostCard::new(post(false));
        assert!(!card.begin_edit());
        assert!(card.submit_edit().is_none());
    }

    #[test]
    fn test_absorb_skips_in_flight_like() {
        use crate::components::like::LikeState;
        use postboard_types::CurrentUser;

        let viewer = AuthContext::signed_in(CurrentUser {
            pk: 2,
            username: "bob".to_string(),
            profile_id: ProfileId(2),
            profile_image: String::new(),
        });
        let mut feed_card = PostCard::new(post(false));
        let mut detail_card = feed_card.clone();
        detail_card.comment_added();
        detail_card.click_like(&viewer, Instant::now());

        feed_card.absorb(&detail_card);
        assert_eq!(feed_card.comments_count(), 3);
        assert_eq!(feed_card.like.state(), LikeState::NotLiked);
        assert_eq!(feed_card.like.count(), 0);
    }

    #[test]
    fn test_comment_counter_moves_by_one() {
        let mut card = PostCard::new(post(false));
        card.comment_added();
        assert_eq!(card.comments_count(), 3);
        card.comment_removed();
        assert_eq!(card.comments_count(), 2);
    }
}
