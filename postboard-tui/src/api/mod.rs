mod backend;
mod client;
mod error;

pub use backend::{comments_pointer, posts_pointer, Backend};
pub use client::{image_upload_from_path, ApiClient, ACCEPTED_IMAGE_TYPES};
pub use error::{ApiError, ApiResult};
