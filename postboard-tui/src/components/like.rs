use postboard_types::{Like, LikeId, Post, PostId};
use std::time::Instant;

use super::notice::Notice;
use crate::api::{ApiError, ApiResult, Backend};
use crate::auth::AuthContext;

pub const OWN_POST_TOOLTIP: &str = "You can't like your own post";
pub const SIGN_IN_TOOLTIP: &str = "You must be logged in to like a post";

/// Where a post's like stands from the viewer's side.
///
/// `Liking` and `Unliking` are the optimistic in-between states: the counter
/// already shows the change, the server has not confirmed it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    NotLiked,
    Liked(LikeId),
    Liking,
    Unliking(LikeId),
}

impl LikeState {
    pub fn from_like_id(like_id: Option<LikeId>) -> Self {
        match like_id {
            Some(id) => LikeState::Liked(id),
            None => LikeState::NotLiked,
        }
    }

    /// Whether the heart is drawn filled
    pub fn shows_liked(&self) -> bool {
        matches!(self, LikeState::Liked(_) | LikeState::Liking)
    }

    /// The confirmed like id; only settled states carry one
    pub fn like_id(&self) -> Option<LikeId> {
        match self {
            LikeState::Liked(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, LikeState::Liking | LikeState::Unliking(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeRequest {
    Like(PostId),
    Unlike(LikeId),
}

/// Result of the remote half of a like toggle
#[derive(Debug)]
pub enum LikeOutcome {
    Liked(ApiResult<Like>),
    Unliked(ApiResult<()>),
}

impl LikeRequest {
    pub async fn perform<B: Backend>(self, backend: &B) -> LikeOutcome {
        match self {
            LikeRequest::Like(post) => LikeOutcome::Liked(backend.create_like(post).await),
            LikeRequest::Unlike(id) => LikeOutcome::Unliked(backend.delete_like(id).await),
        }
    }
}

/// What a click on the heart turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeClick {
    Send(LikeRequest),
    /// Owner or anonymous viewer: the explanatory tooltip was toggled
    Tooltip,
    /// A request for this post is still in flight
    Busy,
}

/// Like/unlike toggle for one post card
#[derive(Debug, Clone)]
pub struct LikeToggle {
    post_id: PostId,
    is_owner: bool,
    state: LikeState,
    count: i64,
    pub tooltip: Notice,
}

impl LikeToggle {
    pub fn new(post: &Post) -> Self {
        Self {
            post_id: post.id,
            is_owner: post.is_owner,
            state: LikeState::from_like_id(post.like_id),
            count: post.likes_count,
            tooltip: Notice::new(),
        }
    }

    pub fn state(&self) -> LikeState {
        self.state
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// Handle a click on the heart.
    ///
    /// For a permitted viewer the optimistic change is applied right away and
    /// the request that commits it is returned.
    pub fn click(&mut self, auth: &AuthContext, now: Instant) -> LikeClick {
        if self.is_owner || !auth.is_authenticated() {
            let message = if self.is_owner {
                OWN_POST_TOOLTIP
            } else {
                SIGN_IN_TOOLTIP
            };
            self.tooltip.toggle(message, now);
            return LikeClick::Tooltip;
        }

        match self.state {
            LikeState::Liking | LikeState::Unliking(_) => LikeClick::Busy,
            LikeState::NotLiked => {
                self.state = LikeState::Liking;
                self.count += 1;
                LikeClick::Send(LikeRequest::Like(self.post_id))
            }
            LikeState::Liked(id) => {
                self.state = LikeState::Unliking(id);
                self.count -= 1;
                LikeClick::Send(LikeRequest::Unlike(id))
            }
        }
    }

    /// Commit or compensate the optimistic change.
    ///
    /// On failure the exact pre-click state is restored and the error is
    /// handed back for display.
    pub fn settle(&mut self, outcome: LikeOutcome) -> Result<(), ApiError> {
        match (self.state, outcome) {
            (LikeState::Liking, LikeOutcome::Liked(Ok(like))) => {
                self.state = LikeState::Liked(like.id);
                Ok(())
            }
            (LikeState::Liking, LikeOutcome::Liked(Err(e))) => {
                log::warn!("Like on post {} failed, reverting: {}", self.post_id, e);
                self.state = LikeState::NotLiked;
                self.count -= 1;
                Err(e)
            }
            (LikeState::Unliking(_), LikeOutcome::Unliked(Ok(()))) => {
                self.state = LikeState::NotLiked;
                Ok(())
            }
            (LikeState::Unliking(id), LikeOutcome::Unliked(Err(e))) => {
                log::warn!("Unlike on post {} failed, reverting: {}", self.post_id, e);
                self.state = LikeState::Liked(id);
                self.count += 1;
                Err(e)
            }
            (state, outcome) => {
                log::warn!(
                    "Ignoring like completion {:?} for post {} in state {:?}",
                    outcome,
                    self.post_id,
                    state
                );
                Ok(())
            }
        }
    }

    /// Take over the settled state of another toggle for the same post.
    ///
    /// A card copied while its like was in flight never receives that
    /// completion itself; it follows the card that does. Toggles that are
    /// not waiting on anything keep their own state.
    pub fn follow(&mut self, settled: &LikeToggle) -> bool {
        if self.post_id != settled.post_id || !self.state.is_busy() || settled.state.is_busy() {
            return false;
        }
        self.state = settled.state;
        self.count = settled.count;
        true
    }
}
