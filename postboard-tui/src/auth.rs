use postboard_types::{CurrentUser, ProfileId};

use crate::api::{ApiClient, ApiError, ApiResult, Backend};
use crate::session::SessionStore;

/// Who is looking at the screen.
///
/// Built once at start-up and handed by reference to every component that
/// branches on authentication; components never look it up themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthContext {
    user: Option<CurrentUser>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn signed_in(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn profile_id(&self) -> Option<ProfileId> {
        self.user.as_ref().map(|u| u.profile_id)
    }
}

/// What to do with a token after asking the server about it
#[derive(Debug, PartialEq)]
pub enum SessionCheck {
    Valid(CurrentUser),
    /// The server rejected the token; forget it
    Rejected,
    /// The server could not be asked; keep the token for next time
    Unreachable,
}

impl SessionCheck {
    pub fn from_result(result: ApiResult<CurrentUser>) -> Self {
        match result {
            Ok(user) => SessionCheck::Valid(user),
            Err(ApiError::Unauthorized(msg)) | Err(ApiError::NotFound(msg)) => {
                log::warn!("Session rejected by server: {}", msg);
                SessionCheck::Rejected
            }
            Err(e) => {
                log::warn!("Session validation failed: {}", e);
                SessionCheck::Unreachable
            }
        }
    }
}

/// Restore the signed-in user for this run.
///
/// An explicit token (CLI flag or environment) wins over the stored one and
/// replaces it once the server accepts it. A stored token the server
/// rejects is deleted.
pub async fn restore_session(
    api_client: &mut ApiClient,
    store: &SessionStore,
    token_override: Option<String>,
) -> AuthContext {
    let from_store = token_override.is_none();
    let token = match token_override {
        Some(token) => Some(token),
        None => store.load().unwrap_or_else(|e| {
            log::warn!("Could not read session file: {}", e);
            None
        }),
    };

    let Some(token) = token else {
        log::debug!("No existing session found");
        return AuthContext::anonymous();
    };

    api_client.set_session_token(Some(token.clone()));
    let check = SessionCheck::from_result(api_client.current_user().await);
    sync_store(store, &token, from_store, &check);
    match check {
        SessionCheck::Valid(user) => {
            log::info!("Session is valid for user: {}", user.username);
            AuthContext::signed_in(user)
        }
        SessionCheck::Rejected | SessionCheck::Unreachable => {
            api_client.set_session_token(None);
            AuthContext::anonymous()
        }
    }
}

/// Bring the session file in line with what the server said about `token`
fn sync_store(store: &SessionStore, token: &str, from_store: bool, check: &SessionCheck) {
    match check {
        SessionCheck::Valid(_) if !from_store => {
            if let Err(e) = store.save(token) {
                log::warn!("Failed to save session: {}", e);
            }
        }
        SessionCheck::Rejected if from_store => {
            if let Err(e) = store.delete() {
                log::warn!("Failed to delete rejected session: {}", e);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> CurrentUser {
        CurrentUser {
            pk: 1,
            username: "ada".to_string(),
            profile_id: ProfileId(4),
            profile_image: String::new(),
        }
    }

    #[test]
    fn test_anonymous_context() {
        let auth = AuthContext::anonymous();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.profile_id(), None);
    }

    #[test]
    fn test_signed_in_context() {
        let auth = AuthContext::signed_in(user());
        assert!(auth.is_authenticated());
        assert_eq!(auth.user().unwrap().username, "ada");
        assert_eq!(auth.profile_id(), Some(ProfileId(4)));
    }

    #[test]
    fn test_session_check_classification() {
        assert_eq!(SessionCheck::from_result(Ok(user())), SessionCheck::Valid(user()));
        assert_eq!(
            SessionCheck::from_result(Err(ApiError::Unauthorized("expired".into()))),
            SessionCheck::Rejected
        );
        assert_eq!(
            SessionCheck::from_result(Err(ApiError::Api("boom".into()))),
            SessionCheck::Unreachable
        );
    }

    #[tokio::test]
    async fn test_restore_without_token_is_anonymous() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::at(temp_dir.path().join("session"));
        let mut client = ApiClient::new("http://127.0.0.1:9");

        let auth = restore_session(&mut client, &store, None).await;
        assert!(!auth.is_authenticated());
        assert!(!client.has_session());
    }

    #[test]
    fn test_accepted_explicit_token_replaces_stored_one() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::at(temp_dir.path().join("session"));
        store.save("old-stored-token").unwrap();

        sync_store(&store, "fresh-cli-token", false, &SessionCheck::Valid(user()));
        assert_eq!(store.load().unwrap(), Some("fresh-cli-token".to_string()));
    }

    #[test]
    fn test_rejected_explicit_token_leaves_store_alone() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::at(temp_dir.path().join("session"));
        store.save("old-stored-token").unwrap();

        sync_store(&store, "bad-cli-token", false, &SessionCheck::Rejected);
        sync_store(&store, "bad-cli-token", false, &SessionCheck::Unreachable);
        assert_eq!(store.load().unwrap(), Some("old-stored-token".to_string()));
    }

    #[test]
    fn test_rejected_stored_token_is_deleted() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::at(temp_dir.path().join("session"));
        store.save("expired-token").unwrap();

        sync_store(&store, "expired-token", true, &SessionCheck::Unreachable);
        assert!(store.path().exists());
        sync_store(&store, "expired-token", true, &SessionCheck::Rejected);
        assert!(!store.path().exists());
    }
}
