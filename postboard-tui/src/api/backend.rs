use async_trait::async_trait;
use postboard_types::*;
use serde::de::DeserializeOwned;

use super::ApiResult;

/// The REST resources the client consumes.
///
/// `ApiClient` is the production implementation; components and the app
/// shell only ever talk to this trait so tests can substitute a fake.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch a page by pointer. Absolute URLs are used verbatim, anything
    /// else is resolved against the server URL.
    async fn fetch_page<T>(&self, pointer: &str) -> ApiResult<Page<T>>
    where
        T: DeserializeOwned + Send + 'static;

    async fn get_post(&self, id: PostId) -> ApiResult<Post>;

    async fn update_post(&self, id: PostId, update: &PostUpdate) -> ApiResult<Post>;

    async fn delete_post(&self, id: PostId) -> ApiResult<()>;

    async fn create_comment(&self, request: &CreateCommentRequest) -> ApiResult<Comment>;

    async fn update_comment(
        &self,
        id: CommentId,
        request: &UpdateCommentRequest,
    ) -> ApiResult<Comment>;

    async fn delete_comment(&self, id: CommentId) -> ApiResult<()>;

    async fn create_like(&self, post: PostId) -> ApiResult<Like>;

    async fn delete_like(&self, id: LikeId) -> ApiResult<()>;

    async fn get_profile(&self, id: ProfileId) -> ApiResult<Profile>;

    async fn current_user(&self) -> ApiResult<CurrentUser>;
}

/// First page of the post feed
pub fn posts_pointer() -> String {
    "/posts/".to_string()
}

/// First page of the comments on a post
pub fn comments_pointer(post: PostId) -> String {
    format!("/comments/?post={}", post)
}
