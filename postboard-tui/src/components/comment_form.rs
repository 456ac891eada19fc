use postboard_types::{Comment, CreateCommentRequest, PostId};
use std::time::Instant;

use super::notice::Notice;
use crate::api::{ApiError, ApiResult};
use crate::auth::AuthContext;

pub const EMPTY_COMMENT_NOTICE: &str = "Please write a comment first!";
pub const SIGN_IN_NOTICE: &str = "Please sign in to leave a comment!";

/// What pressing "post" on the composer amounted to
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Anonymous viewer; the form shows a sign-in prompt instead
    SignInRequired,
    /// Nothing to send; the empty-input notice is showing
    Rejected,
    /// A comment from this form is already being created
    Busy,
    Send(CreateCommentRequest),
}

/// Form for adding a comment under a post
#[derive(Debug, Clone)]
pub struct CommentComposer {
    post_id: PostId,
    content: String,
    posting: bool,
    pub notice: Notice,
}

impl CommentComposer {
    pub fn new(post_id: PostId) -> Self {
        Self {
            post_id,
            content: String::new(),
            posting: false,
            notice: Notice::new(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
    }

    pub fn is_posting(&self) -> bool {
        self.posting
    }

    pub fn submit(&mut self, auth: &AuthContext, now: Instant) -> SubmitOutcome {
        if !auth.is_authenticated() {
            return SubmitOutcome::SignInRequired;
        }
        if self.posting {
            return SubmitOutcome::Busy;
        }
        if self.content.trim().is_empty() {
            // A notice already on screen keeps its original deadline
            self.notice.show(EMPTY_COMMENT_NOTICE, now);
            return SubmitOutcome::Rejected;
        }

        self.posting = true;
        SubmitOutcome::Send(CreateCommentRequest {
            post: self.post_id,
            content: self.content.clone(),
        })
    }

    /// Clear the input on success. The created comment is handed back so the
    /// caller can prepend it to the list and bump the post's counter.
    pub fn complete(&mut self, result: ApiResult<Comment>) -> Result<Comment, ApiError> {
        self.posting = false;
        match result {
            Ok(comment) => {
                self.content.clear();
                Ok(comment)
            }
            Err(e) => {
                log::warn!("Creating comment on post {} failed: {}", self.post_id, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_types::{CommentId, CurrentUser, ProfileId};
    use std::time::Duration;

    fn viewer() -> AuthContext {
        AuthContext::signed_in(CurrentUser {
            pk: 1,
            username: "ada".to_string(),
            profile_id: ProfileId(1),
            profile_image: String::new(),
        })
    }

    fn created(content: &str) -> Comment {
        Comment {
            id: CommentId(10),
            owner: "ada".to_string(),
            is_owner: true,
            profile_id: ProfileId(1),
            profile_image: String::new(),
            content: content.to_string(),
            created_at: "now".to_string(),
            updated_at: "now".to_string(),
        }
    }

    #[test]
    fn test_empty_comment_shows_notice_without_request() {
        let mut form = CommentComposer::new(PostId(2));
        let now = Instant::now();
        form.set_content("   ");

        assert_eq!(form.submit(&viewer(), now), SubmitOutcome::Rejected);
        assert_eq!(form.notice.message(now), Some(EMPTY_COMMENT_NOTICE));
        assert!(!form.is_posting());
        assert!(!form.notice.is_visible(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_repeated_empty_submit_does_not_extend_notice() {
        let mut form = CommentComposer::new(PostId(2));
        let start = Instant::now();
        form.submit(&viewer(), start);
        form.submit(&viewer(), start + Duration::from_secs(2));

        assert!(!form.notice.is_visible(start + Duration::from_secs(3)));
    }

    #[test]
    fn test_anonymous_viewer_must_sign_in() {
        let mut form = CommentComposer::new(PostId(2));
        form.set_content("hi");
        assert_eq!(
            form.submit(&AuthContext::anonymous(), Instant::now()),
            SubmitOutcome::SignInRequired
        );
    }

    #[test]
    fn test_submit_then_complete_clears_input() {
        let mut form = CommentComposer::new(PostId(2));
        form.set_content("hello");

        let outcome = form.submit(&viewer(), Instant::now());
        assert_eq!(
            outcome,
            SubmitOutcome::Send(CreateCommentRequest {
                post: PostId(2),
                content: "hello".to_string()
            })
        );
        assert_eq!(form.submit(&viewer(), Instant::now()), SubmitOutcome::Busy);

        let comment = form.complete(Ok(created("hello"))).unwrap();
        assert_eq!(comment.content, "hello");
        assert_eq!(form.content(), "");
        assert!(!form.is_posting());
    }

    #[test]
    fn test_surrounding_whitespace_is_sent_as_typed() {
        let mut form = CommentComposer::new(PostId(2));
        form.set_content("  spaced out  ");

        match form.submit(&viewer(), Instant::now()) {
            SubmitOutcome::Send(request) => assert_eq!(request.content, "  spaced out  "),
            other => panic!("expected a request, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_keeps_input() {
        let mut form = CommentComposer::new(PostId(2));
        form.set_content("hello");
        form.submit(&viewer(), Instant::now());

        assert!(form.complete(Err(ApiError::Api("down".into()))).is_err());
        assert_eq!(form.content(), "hello");
        assert!(!form.is_posting());
    }
}
