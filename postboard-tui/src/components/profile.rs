use postboard_types::{Profile, ProfileId};

use crate::api::{ApiResult, Backend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileRequest {
    pub id: ProfileId,
    generation: u64,
}

impl ProfileRequest {
    pub async fn perform<B: Backend>(self, backend: &B) -> ApiResult<Profile> {
        backend.get_profile(self.id).await
    }
}

/// A profile page. Switching to another profile makes answers for the
/// previous one stale.
#[derive(Debug, Clone, Default)]
pub struct ProfileView {
    id: Option<ProfileId>,
    profile: Option<Profile>,
    has_loaded: bool,
    error: Option<String>,
    generation: u64,
}

impl ProfileView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, id: ProfileId) -> ProfileRequest {
        self.generation += 1;
        self.id = Some(id);
        self.profile = None;
        self.has_loaded = false;
        self.error = None;
        ProfileRequest {
            id,
            generation: self.generation,
        }
    }

    /// Returns `false` if the answer belongs to a superseded load
    pub fn complete(&mut self, request: ProfileRequest, result: ApiResult<Profile>) -> bool {
        if request.generation != self.generation || Some(request.id) != self.id {
            log::debug!("Dropping stale profile response for {}", request.id);
            return false;
        }
        match result {
            Ok(profile) => self.profile = Some(profile),
            Err(e) => {
                log::warn!("Loading profile {} failed: {}", request.id, e);
                self.error = Some(e.user_message());
            }
        }
        self.has_loaded = true;
        true
    }

    pub fn id(&self) -> Option<ProfileId> {
        self.id
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
