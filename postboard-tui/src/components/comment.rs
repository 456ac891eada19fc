use postboard_types::{Comment, CommentId, UpdateCommentRequest};

use super::edit::{EditPhase, InlineEditor};
use crate::api::{ApiError, ApiResult, Backend};

/// An update to a comment's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEditRequest {
    pub id: CommentId,
    pub content: String,
}

impl CommentEditRequest {
    pub async fn perform<B: Backend>(self, backend: &B) -> ApiResult<Comment> {
        let request = UpdateCommentRequest {
            content: self.content,
        };
        backend.update_comment(self.id, &request).await
    }
}

/// One comment in a post's thread
#[derive(Debug, Clone)]
pub struct CommentCard {
    comment: Comment,
    editor: InlineEditor<String>,
}

impl CommentCard {
    pub fn new(comment: Comment) -> Self {
        Self {
            editor: InlineEditor::new(comment.content.clone()),
            comment,
        }
    }

    pub fn id(&self) -> CommentId {
        self.comment.id
    }

    pub fn comment(&self) -> &Comment {
        &self.comment
    }

    pub fn is_owner(&self) -> bool {
        self.comment.is_owner
    }

    /// Shown text; the draft while editing
    pub fn content(&self) -> &str {
        self.editor.content()
    }

    pub fn editor(&self) -> &InlineEditor<String> {
        &self.editor
    }

    pub fn edit_phase(&self) -> EditPhase {
        self.editor.phase()
    }

    pub fn begin_edit(&mut self) -> bool {
        self.editor.begin(self.comment.is_owner)
    }

    pub fn set_draft(&mut self, text: &str) {
        if let Some(draft) = self.editor.draft_mut() {
            *draft = text.to_string();
        }
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.editor.cancel()
    }

    pub fn submit_edit(&mut self) -> Option<CommentEditRequest> {
        let content = self.editor.submit()?;
        Some(CommentEditRequest {
            id: self.comment.id,
            content,
        })
    }

    pub fn complete_edit(&mut self, result: ApiResult<Comment>) -> Result<(), ApiError> {
        let echoed = result.map(|comment| {
            self.comment.content = comment.content.clone();
            self.comment.updated_at = comment.updated_at;
            comment.content
        });
        self.editor.complete(echoed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_types::ProfileId;

    fn comment(is_owner: bool) -> Comment {
        Comment {
            id: CommentId(4),
            owner: "ada".to_string(),
            is_owner,
            profile_id: ProfileId(1),
            profile_image: String::new(),
            content: "first!".to_string(),
            created_at: "now".to_string(),
            updated_at: "now".to_string(),
        }
    }

    #[test]
    fn test_edit_round_trip_with_server_echo() {
        let mut card = CommentCard::new(comment(true));
        assert!(card.begin_edit());
        card.set_draft("  second  ");

        let request = card.submit_edit().unwrap();
        assert_eq!(
            request,
            CommentEditRequest {
                id: CommentId(4),
                content: "  second  ".to_string()
            }
        );

        let mut echoed = comment(true);
        echoed.content = "second".to_string();
        echoed.updated_at = "just now".to_string();
        card.complete_edit(Ok(echoed)).unwrap();

        assert_eq!(card.content(), "second");
        assert_eq!(card.comment().updated_at, "just now");
        assert_eq!(card.edit_phase(), EditPhase::Viewing);
    }

    #[test]
    fn test_cancel_restores_text() {
        let mut card = CommentCard::new(comment(true));
        card.begin_edit();
        card.set_draft("changed");
        card.cancel_edit();
        assert_eq!(card.content(), "first!");
    }

    #[test]
    fn test_other_users_comment_is_read_only() {
        let mut card = CommentCard::new(comment(false));
        assert!(!card.begin_edit());
        card.set_draft("hijack");
        assert_eq!(card.content(), "first!");
    }
}
