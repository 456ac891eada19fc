#![allow(dead_code)]

use async_trait::async_trait;
use postboard::api::{ApiError, ApiResult, Backend};
use postboard::auth::AuthContext;
use postboard_types::*;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Every request the fake was asked to make
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchPage(String),
    GetPost(PostId),
    UpdatePost(PostId, PostUpdate),
    DeletePost(PostId),
    CreateComment(CreateCommentRequest),
    UpdateComment(CommentId, String),
    DeleteComment(CommentId),
    CreateLike(PostId),
    DeleteLike(LikeId),
    GetProfile(ProfileId),
    CurrentUser,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    pages: HashMap<String, serde_json::Value>,
    posts: HashMap<PostId, Post>,
    profiles: HashMap<ProfileId, Profile>,
    fail_likes: bool,
    fail_updates: Option<FieldErrors>,
    next_id: i64,
}

/// In-memory `Backend` that answers immediately and records its calls
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().next_id = 100;
        backend
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Serve `results` at `pointer`, pointing on to `next`
    pub fn set_page<T: serde::Serialize>(&self, pointer: &str, results: Vec<T>, next: Option<&str>) {
        let value = serde_json::json!({
            "count": null,
            "next": next,
            "previous": null,
            "results": results,
        });
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(pointer.to_string(), value);
    }

    pub fn add_post(&self, post: Post) {
        self.state.lock().unwrap().posts.insert(post.id, post);
    }

    pub fn add_profile(&self, profile: Profile) {
        self.state.lock().unwrap().profiles.insert(profile.id, profile);
    }

    pub fn fail_likes(&self, fail: bool) {
        self.state.lock().unwrap().fail_likes = fail;
    }

    pub fn fail_updates_with(&self, errors: FieldErrors) {
        self.state.lock().unwrap().fail_updates = Some(errors);
    }

    fn record(&self, call: Call) -> std::sync::MutexGuard<'_, State> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state
    }
}

fn server_down() -> ApiError {
    ApiError::Api("Server error (503)".to_string())
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_page<T>(&self, pointer: &str) -> ApiResult<Page<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let state = self.record(Call::FetchPage(pointer.to_string()));
        match state.pages.get(pointer) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Err(ApiError::NotFound(pointer.to_string())),
        }
    }

    async fn get_post(&self, id: PostId) -> ApiResult<Post> {
        let state = self.record(Call::GetPost(id));
        state
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("post {}", id)))
    }

    async fn update_post(&self, id: PostId, update: &PostUpdate) -> ApiResult<Post> {
        let mut state = self.record(Call::UpdatePost(id, update.clone()));
        if let Some(errors) = state.fail_updates.take() {
            return Err(ApiError::Validation(errors));
        }
        let post = state
            .posts
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("post {}", id)))?;
        post.title = update.title.clone();
        post.content = update.content.clone();
        if let Some(image) = &update.image {
            post.image = format!("https://media.example/{}", image.file_name);
        }
        post.updated_at = "just now".to_string();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: PostId) -> ApiResult<()> {
        let mut state = self.record(Call::DeletePost(id));
        state.posts.remove(&id);
        Ok(())
    }

    async fn create_comment(&self, request: &CreateCommentRequest) -> ApiResult<Comment> {
        let mut state = self.record(Call::CreateComment(request.clone()));
        state.next_id += 1;
        Ok(Comment {
            id: CommentId(state.next_id),
            owner: "viewer".to_string(),
            is_owner: true,
            profile_id: ProfileId(7),
            profile_image: String::new(),
            content: request.content.clone(),
            created_at: "now".to_string(),
            updated_at: "now".to_string(),
        })
    }

    async fn update_comment(
        &self,
        id: CommentId,
        request: &UpdateCommentRequest,
    ) -> ApiResult<Comment> {
        let _state = self.record(Call::UpdateComment(id, request.content.clone()));
        Ok(Comment {
            id,
            owner: "viewer".to_string(),
            is_owner: true,
            profile_id: ProfileId(7),
            profile_image: String::new(),
            content: request.content.clone(),
            created_at: "earlier".to_string(),
            updated_at: "now".to_string(),
        })
    }

    async fn delete_comment(&self, id: CommentId) -> ApiResult<()> {
        let _state = self.record(Call::DeleteComment(id));
        Ok(())
    }

    async fn create_like(&self, post: PostId) -> ApiResult<Like> {
        let mut state = self.record(Call::CreateLike(post));
        if state.fail_likes {
            return Err(server_down());
        }
        state.next_id += 1;
        Ok(Like {
            id: LikeId(state.next_id),
        })
    }

    async fn delete_like(&self, id: LikeId) -> ApiResult<()> {
        let state = self.record(Call::DeleteLike(id));
        if state.fail_likes {
            return Err(server_down());
        }
        Ok(())
    }

    async fn get_profile(&self, id: ProfileId) -> ApiResult<Profile> {
        let state = self.record(Call::GetProfile(id));
        state
            .profiles
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("profile {}", id)))
    }

    async fn current_user(&self) -> ApiResult<CurrentUser> {
        let _state = self.record(Call::CurrentUser);
        Ok(viewer_user())
    }
}

// Fixtures

pub fn viewer_user() -> CurrentUser {
    CurrentUser {
        pk: 7,
        username: "viewer".to_string(),
        profile_id: ProfileId(7),
        profile_image: String::new(),
    }
}

pub fn viewer() -> AuthContext {
    AuthContext::signed_in(viewer_user())
}

pub fn post(id: i64, is_owner: bool, like_id: Option<i64>, likes_count: i64) -> Post {
    Post {
        id: PostId(id),
        owner: if is_owner { "viewer" } else { "someone" }.to_string(),
        is_owner,
        profile_id: ProfileId(if is_owner { 7 } else { 3 }),
        profile_image: String::new(),
        title: format!("Post {}", id),
        content: format!("Content of post {}", id),
        image: "https://media.example/original.jpg".to_string(),
        like_id: like_id.map(LikeId),
        likes_count,
        comments_count: 0,
        created_at: "2 days ago".to_string(),
        updated_at: "2 days ago".to_string(),
    }
}

pub fn comment(id: i64, is_owner: bool) -> Comment {
    Comment {
        id: CommentId(id),
        owner: if is_owner { "viewer" } else { "someone" }.to_string(),
        is_owner,
        profile_id: ProfileId(if is_owner { 7 } else { 3 }),
        profile_image: String::new(),
        content: format!("Comment {}", id),
        created_at: "1 hour ago".to_string(),
        updated_at: "1 hour ago".to_string(),
    }
}

pub fn profile(id: i64, owner: &str) -> Profile {
    Profile {
        id: ProfileId(id),
        owner: owner.to_string(),
        name: owner.to_string(),
        bio: String::new(),
        image: String::new(),
        created_at: "1 Jan 2024".to_string(),
        followers_count: 2,
        following_count: 1,
        post_count: 4,
        is_owner: false,
        following_id: None,
        receive_messages: false,
    }
}

/// Let spawned fake requests run to completion
pub async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
}
