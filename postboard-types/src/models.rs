use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LikeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A post as returned by the posts endpoints.
///
/// Timestamps are display strings computed by the server ("3 hours ago",
/// "12 Mar 2024"); the client never parses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub owner: String,
    #[serde(default)]
    pub is_owner: bool,
    pub profile_id: ProfileId,
    #[serde(default)]
    pub profile_image: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
    /// Present iff the current viewer has liked this post
    #[serde(default)]
    pub like_id: Option<LikeId>,
    #[serde(default)]
    pub likes_count: i64,
    #[serde(default)]
    pub comments_count: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A comment on a post. The post it belongs to is tracked by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub owner: String,
    #[serde(default)]
    pub is_owner: bool,
    pub profile_id: ProfileId,
    #[serde(default)]
    pub profile_image: String,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub owner: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub following_count: i64,
    #[serde(default)]
    pub post_count: i64,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub following_id: Option<i64>,
    #[serde(default)]
    pub receive_messages: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: LikeId,
}

/// The signed-in user as reported by the session endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub pk: i64,
    pub username: String,
    pub profile_id: ProfileId,
    #[serde(default)]
    pub profile_image: String,
}

// Request types for API

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub post: PostId,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreateLikeRequest {
    pub post: PostId,
}

/// An image chosen for upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart payload for `PUT /posts/{id}/`.
///
/// `image` is only sent when a new file was chosen; the backend reads a
/// missing image field as "keep the current image".
#[derive(Debug, Clone, PartialEq)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormField<'a> {
    Text(&'static str, &'a str),
    File(&'static str, &'a ImageUpload),
}

impl FormField<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            FormField::Text(name, _) | FormField::File(name, _) => name,
        }
    }
}

impl PostUpdate {
    /// Fields in the order they are appended to the multipart form
    pub fn form_fields(&self) -> Vec<FormField<'_>> {
        let mut fields = vec![
            FormField::Text("title", &self.title),
            FormField::Text("content", &self.content),
        ];
        if let Some(image) = &self.image {
            fields.push(FormField::File("image", image));
        }
        fields
    }
}
