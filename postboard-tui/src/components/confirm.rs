use postboard_types::{CommentId, PostId};

use crate::api::{ApiError, ApiResult, Backend};

/// Something the viewer asked to delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Post(PostId),
    Comment(CommentId),
}

impl DeleteTarget {
    pub fn object_name(&self) -> &'static str {
        match self {
            DeleteTarget::Post(_) => "post",
            DeleteTarget::Comment(_) => "comment",
        }
    }

    pub fn title(&self) -> String {
        format!("Delete {}", self.object_name())
    }

    pub fn question(&self) -> String {
        format!("Do you want to delete this {}?", self.object_name())
    }

    pub async fn perform<B: Backend>(self, backend: &B) -> ApiResult<()> {
        match self {
            DeleteTarget::Post(id) => backend.delete_post(id).await,
            DeleteTarget::Comment(id) => backend.delete_comment(id).await,
        }
    }
}

pub const IRREVERSIBLE_WARNING: &str = "This action cannot be undone.";

/// Yes/no dialog guarding a delete
#[derive(Debug, Clone, Default)]
pub struct ConfirmationModal {
    target: Option<DeleteTarget>,
    deleting: bool,
}

impl ConfirmationModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, target: DeleteTarget) {
        if !self.deleting {
            self.target = Some(target);
        }
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<DeleteTarget> {
        self.target
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// "Yes": returns the delete to perform
    pub fn confirm(&mut self) -> Option<DeleteTarget> {
        if self.deleting {
            return None;
        }
        let target = self.target?;
        self.deleting = true;
        Some(target)
    }

    /// "No" or Esc. Ignored once the delete was sent.
    pub fn dismiss(&mut self) {
        if !self.deleting {
            self.target = None;
        }
    }

    /// Close the dialog after the server answered
    pub fn complete(&mut self, result: ApiResult<()>) -> Result<DeleteTarget, ApiError> {
        self.deleting = false;
        let target = self.target.take();
        result?;
        target.ok_or_else(|| ApiError::Api("No delete was pending".to_string()))
    }
}
