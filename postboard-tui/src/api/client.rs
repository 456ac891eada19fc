use async_trait::async_trait;
use postboard_types::*;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::Path;

use super::{ApiError, ApiResult, Backend};

/// Image types the backend accepts for post images
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/bmp"];

/// API client for communicating with the Postboard server
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the session token for authenticated requests
    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token;
    }

    pub fn has_session(&self) -> bool {
        self.session_token.is_some()
    }

    /// Turn a path or a next-page pointer into a full URL
    pub fn resolve(&self, pointer: &str) -> String {
        if pointer.starts_with("http://") || pointer.starts_with("https://") {
            pointer.to_string()
        } else {
            format!("{}/{}", self.base_url, pointer.trim_start_matches('/'))
        }
    }

    /// Helper to add the session token to a request if available
    fn add_auth_header(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.session_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn get(&self, pointer: &str) -> RequestBuilder {
        let url = self.resolve(pointer);
        log::debug!(target: "api_calls", "GET {}", url);
        self.add_auth_header(self.client.get(url))
    }

    fn post(&self, pointer: &str) -> RequestBuilder {
        let url = self.resolve(pointer);
        log::debug!(target: "api_calls", "POST {}", url);
        self.add_auth_header(self.client.post(url))
    }

    fn put(&self, pointer: &str) -> RequestBuilder {
        let url = self.resolve(pointer);
        log::debug!(target: "api_calls", "PUT {}", url);
        self.add_auth_header(self.client.put(url))
    }

    fn delete(&self, pointer: &str) -> RequestBuilder {
        let url = self.resolve(pointer);
        log::debug!(target: "api_calls", "DELETE {}", url);
        self.add_auth_header(self.client.delete(url))
    }

    /// Helper to handle API responses that carry a JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(error_from_status(status, body))
        }
    }

    /// Helper for endpoints that answer with an empty body (204)
    async fn handle_empty(&self, response: Response) -> ApiResult<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(error_from_status(status, body))
        }
    }
}

/// Map a failed response to an `ApiError`.
///
/// A 400 with a field-keyed JSON body becomes `Validation`; HTML error pages
/// (proxies, misconfigured server URLs) are replaced by a short message.
pub(crate) fn error_from_status(status: StatusCode, body: String) -> ApiError {
    let clean_error = if body.contains("<html>") || body.contains("<!DOCTYPE") {
        format!(
            "Server returned {} error. Please check the server URL.",
            status.as_u16()
        )
    } else {
        body
    };

    match status.as_u16() {
        400 => match serde_json::from_str::<serde_json::Value>(&clean_error)
            .ok()
            .and_then(|value| FieldErrors::from_json(&value))
        {
            Some(errors) => ApiError::Validation(errors),
            None => ApiError::BadRequest(clean_error),
        },
        401 | 403 => ApiError::Unauthorized(clean_error),
        404 => ApiError::NotFound(clean_error),
        _ => ApiError::Api(clean_error),
    }
}

fn build_form(update: &PostUpdate) -> ApiResult<Form> {
    let mut form = Form::new();
    for field in update.form_fields() {
        form = match field {
            FormField::Text(name, value) => form.text(name, value.to_string()),
            FormField::File(name, image) => {
                let part = Part::bytes(image.bytes.clone())
                    .file_name(image.file_name.clone())
                    .mime_str(&image.mime_type)?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

/// Read an image from disk for upload, rejecting types the backend refuses
pub async fn image_upload_from_path(path: &Path) -> ApiResult<ImageUpload> {
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    if !ACCEPTED_IMAGE_TYPES.contains(&mime_type.as_str()) {
        let mut errors = FieldErrors::new();
        errors.insert("image", format!("Unsupported image type: {}", mime_type));
        return Err(ApiError::Validation(errors));
    }

    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Ok(ImageUpload {
        file_name,
        mime_type,
        bytes,
    })
}

#[async_trait]
impl Backend for ApiClient {
    async fn fetch_page<T>(&self, pointer: &str) -> ApiResult<Page<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let response = self.get(pointer).send().await?;
        self.handle_response(response).await
    }

    async fn get_post(&self, id: PostId) -> ApiResult<Post> {
        let response = self.get(&format!("/posts/{}/", id)).send().await?;
        self.handle_response(response).await
    }

    async fn update_post(&self, id: PostId, update: &PostUpdate) -> ApiResult<Post> {
        let form = build_form(update)?;
        let response = self
            .put(&format!("/posts/{}/", id))
            .multipart(form)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn delete_post(&self, id: PostId) -> ApiResult<()> {
        let response = self.delete(&format!("/posts/{}/", id)).send().await?;
        self.handle_empty(response).await
    }

    async fn create_comment(&self, request: &CreateCommentRequest) -> ApiResult<Comment> {
        let response = self.post("/comments/").json(request).send().await?;
        self.handle_response(response).await
    }

    async fn update_comment(
        &self,
        id: CommentId,
        request: &UpdateCommentRequest,
    ) -> ApiResult<Comment> {
        let response = self
            .put(&format!("/comments/{}", id))
            .json(request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn delete_comment(&self, id: CommentId) -> ApiResult<()> {
        let response = self.delete(&format!("/comments/{}/", id)).send().await?;
        self.handle_empty(response).await
    }

    async fn create_like(&self, post: PostId) -> ApiResult<Like> {
        let request = CreateLikeRequest { post };
        let response = self.post("/likes/").json(&request).send().await?;
        self.handle_response(response).await
    }

    async fn delete_like(&self, id: LikeId) -> ApiResult<()> {
        let response = self.delete(&format!("/likes/{}", id)).send().await?;
        self.handle_empty(response).await
    }

    async fn get_profile(&self, id: ProfileId) -> ApiResult<Profile> {
        let response = self.get(&format!("/profiles/{}", id)).send().await?;
        self.handle_response(response).await
    }

    async fn current_user(&self) -> ApiResult<CurrentUser> {
        let response = self.get("/dj-rest-auth/user/").send().await?;
        self.handle_response(response).await
    }
}
