use postboard_types::{PostId, ProfileId};
use std::future::Future;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::api::{ApiError, Backend};
use crate::auth::AuthContext;
use crate::components::comment_form::SIGN_IN_NOTICE;
use crate::components::post::{CONTENT_MAX_CHARS, TITLE_MAX_CHARS};
use crate::components::{
    DeleteTarget, FeedView, Focus, LikeClick, MenuAction, Notice, PageRequest, PostCard,
    PostDetailView, SubmitOutcome, TaskScope,
};
use crate::logging::LogConfig;
use crate::{log_api_call, log_state};

pub mod handlers;
pub mod state;
pub use state::*;

/// Run `task` inside `scope` and post its completion back to the event loop
fn dispatch<F>(scope: &mut TaskScope, tx: &UnboundedSender<Envelope>, task: F)
where
    F: Future<Output = Completion> + Send + 'static,
{
    let token = scope.token();
    let tx = tx.clone();
    scope.spawn(async move {
        let completion = task.await;
        // The receiver only goes away when the app is shutting down
        let _ = tx.send(Envelope { token, completion });
    });
}

fn report(notice: &mut Notice, error: &ApiError) {
    notice.replace(error.user_message(), Instant::now());
}

/// Text and length cap for a post edit field
fn post_field(card: &PostCard, target: InputTarget) -> Option<(String, Option<usize>)> {
    match target {
        InputTarget::PostTitle => Some((card.fields().title.clone(), Some(TITLE_MAX_CHARS))),
        InputTarget::PostContent => Some((card.fields().content.clone(), Some(CONTENT_MAX_CHARS))),
        InputTarget::PostImage => Some((card.image_path().to_string(), None)),
        _ => None,
    }
}

impl<B> App<B>
where
    B: Backend + Clone + 'static,
{
    pub fn new(backend: B, auth: AuthContext) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            backend,
            auth,
            log_config: LogConfig::default(),
            feed: FeedView::new(),
            detail: None,
            profile: None,
            input: InputState::new(),
            notice: Notice::new(),
            show_help: false,
            tx,
            rx,
        }
    }

    pub fn screen(&self) -> Screen {
        if self.profile.is_some() {
            Screen::Profile
        } else if self.detail.is_some() {
            Screen::PostDetail
        } else {
            Screen::Feed
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Drop notices whose time is up
    pub fn tick(&mut self, now: Instant) {
        self.notice.expire(now);
    }

    // Completions

    /// Apply every completion already waiting; returns how many were taken
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(envelope) = self.rx.try_recv() {
            self.apply(envelope);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it
    pub async fn next_completion(&mut self) -> bool {
        match self.rx.recv().await {
            Some(envelope) => {
                self.apply(envelope);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, envelope: Envelope) {
        let Envelope { token, completion } = envelope;
        if token.is_cancelled() {
            log_state!(
                self.log_config,
                "Dropping {} completion from a closed view",
                completion.name()
            );
            return;
        }
        log_api_call!(self.log_config, "Completed: {}", completion.name());

        match completion {
            Completion::FeedPage { seq, result } => {
                if let Err(e) = &result {
                    report(&mut self.notice, e);
                }
                if !self.feed.apply_page(seq, result) {
                    log_state!(self.log_config, "Dropped stale feed page {}", seq);
                }
            }
            Completion::Like {
                origin,
                post,
                outcome,
            } => {
                let card = match origin {
                    LikeOrigin::Feed => self.feed.card_mut(post),
                    LikeOrigin::Detail => self
                        .detail
                        .as_mut()
                        .and_then(|detail| detail.post_mut())
                        .filter(|card| card.id() == post),
                };
                let settled = match card {
                    Some(card) => {
                        if let Err(e) = card.settle_like(outcome) {
                            log_state!(self.log_config, "Like on post {} compensated", post);
                            report(&mut self.notice, &e);
                        }
                        Some(card.like.clone())
                    }
                    None => {
                        log_state!(self.log_config, "No card left for post {}", post);
                        None
                    }
                };

                // A copy opened while the request was in flight waits on this one
                let mirror = match origin {
                    LikeOrigin::Feed => self
                        .detail
                        .as_mut()
                        .and_then(|detail| detail.post_mut())
                        .filter(|card| card.id() == post),
                    LikeOrigin::Detail => self.feed.card_mut(post),
                };
                if let (Some(settled), Some(mirror)) = (settled, mirror) {
                    if mirror.like.follow(&settled) {
                        log_state!(self.log_config, "Like on post {} settled on its copy", post);
                    }
                }
            }
            Completion::PostLoaded(result) => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.apply_post(result);
                }
            }
            Completion::CommentsPage { seq, result } => {
                if let Some(detail) = self.detail.as_mut() {
                    if !detail.apply_comments(seq, result) {
                        log_state!(self.log_config, "Dropped stale comments page {}", seq);
                    }
                }
            }
            Completion::PostEdited(result) => {
                let Some(card) = self.detail.as_mut().and_then(|d| d.post_mut()) else {
                    return;
                };
                match card.complete_edit(result) {
                    Ok(()) => {
                        self.feed.absorb(card);
                        if matches!(
                            self.input.target,
                            Some(InputTarget::PostTitle | InputTarget::PostContent | InputTarget::PostImage)
                        ) {
                            self.input.release();
                        }
                    }
                    // Field errors are drawn next to their inputs
                    Err(e) if e.field_errors().is_some() => {}
                    Err(e) => report(&mut self.notice, &e),
                }
            }
            Completion::CommentCreated(result) => {
                let Some(detail) = self.detail.as_mut() else {
                    return;
                };
                match detail.composer.complete(result) {
                    Ok(comment) => {
                        log_state!(self.log_config, "Comment {} created", comment.id);
                        detail.on_comment_created(comment);
                        if self.input.target == Some(InputTarget::Composer) {
                            self.input.bind(InputTarget::Composer, "", None);
                        }
                    }
                    Err(e) => report(&mut self.notice, &e),
                }
            }
            Completion::CommentEdited { id, result } => {
                let Some(card) = self.detail.as_mut().and_then(|d| d.comment_mut(id)) else {
                    return;
                };
                match card.complete_edit(result) {
                    Ok(()) => {
                        if self.input.target == Some(InputTarget::CommentEdit(id)) {
                            self.input.release();
                        }
                    }
                    Err(e) if e.field_errors().is_some() => {}
                    Err(e) => report(&mut self.notice, &e),
                }
            }
            Completion::Deleted { target, result } => {
                let Some(detail) = self.detail.as_mut() else {
                    return;
                };
                match detail.confirm.complete(result) {
                    Ok(DeleteTarget::Post(id)) => {
                        log_state!(self.log_config, "Post {} deleted", id);
                        self.detail = None;
                        self.input.release();
                        self.feed.remove(id);
                    }
                    Ok(DeleteTarget::Comment(id)) => {
                        log_state!(self.log_config, "Comment {} deleted", id);
                        detail.on_comment_deleted(id);
                        if self.input.target == Some(InputTarget::CommentEdit(id)) {
                            self.input.release();
                        }
                    }
                    Err(e) => {
                        log::warn!("Deleting {} failed: {}", target.object_name(), e);
                        report(&mut self.notice, &e);
                    }
                }
            }
            Completion::ProfileLoaded { request, result } => {
                if let Some(profile) = self.profile.as_mut() {
                    profile.view.complete(request, result);
                }
            }
        }
    }

    // Feed

    /// Load the first page of the feed
    pub fn reload_feed(&mut self) {
        let request = self.feed.reload();
        self.fetch_feed_page(request);
    }

    pub(crate) fn fetch_feed_page(&mut self, request: PageRequest) {
        log_api_call!(self.log_config, "Fetching feed page {}", request.pointer);
        let backend = self.backend.clone();
        dispatch(&mut self.feed.scope, &self.tx, async move {
            Completion::FeedPage {
                seq: request.seq,
                result: request.perform(&backend).await,
            }
        });
    }

    pub(crate) fn fetch_comments_page(&mut self, request: PageRequest) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        log_api_call!(self.log_config, "Fetching comments page {}", request.pointer);
        let backend = self.backend.clone();
        dispatch(&mut detail.scope, &self.tx, async move {
            Completion::CommentsPage {
                seq: request.seq,
                result: request.perform(&backend).await,
            }
        });
    }

    /// Like or unlike the post under the cursor
    pub fn like_focused_post(&mut self) {
        let now = Instant::now();
        let backend = self.backend.clone();
        match self.screen() {
            Screen::Feed => {
                let Some(card) = self.feed.selected_mut() else {
                    return;
                };
                let post = card.id();
                if let LikeClick::Send(request) = card.click_like(&self.auth, now) {
                    log_state!(self.log_config, "Optimistic {:?} on post {}", request, post);
                    dispatch(&mut self.feed.scope, &self.tx, async move {
                        Completion::Like {
                            origin: LikeOrigin::Feed,
                            post,
                            outcome: request.perform(&backend).await,
                        }
                    });
                }
            }
            Screen::PostDetail => {
                let Some(detail) = self.detail.as_mut() else {
                    return;
                };
                if detail.focus() != Focus::Post {
                    return;
                }
                let Some(card) = detail.post_mut() else {
                    return;
                };
                let post = card.id();
                if let LikeClick::Send(request) = card.click_like(&self.auth, now) {
                    log_state!(self.log_config, "Optimistic {:?} on post {}", request, post);
                    dispatch(&mut detail.scope, &self.tx, async move {
                        Completion::Like {
                            origin: LikeOrigin::Detail,
                            post,
                            outcome: request.perform(&backend).await,
                        }
                    });
                }
            }
            Screen::Profile => {}
        }
    }

    // Post detail

    pub fn open_selected_post(&mut self) {
        let Some(card) = self.feed.selected().cloned() else {
            return;
        };
        let (view, request) = PostDetailView::open(card);
        self.show_detail(view, request);
    }

    /// Open a post that may not be in the feed, e.g. from `--post`
    pub fn open_post(&mut self, id: PostId) {
        let (view, request) = PostDetailView::by_id(id);
        self.show_detail(view, request);
    }

    fn show_detail(&mut self, view: PostDetailView, request: PageRequest) {
        let post_id = view.post_id();
        self.detail = Some(Box::new(view));
        self.fetch_comments_page(request);

        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        let backend = self.backend.clone();
        dispatch(&mut detail.scope, &self.tx, async move {
            Completion::PostLoaded(backend.get_post(post_id).await)
        });
    }

    /// Back to the feed. In-flight requests of the detail view are dropped
    /// with it.
    pub fn close_detail(&mut self) {
        if let Some(detail) = self.detail.take() {
            if let Some(card) = detail.post() {
                self.feed.absorb(card);
            }
            log_state!(
                self.log_config,
                "Closed post {} with {} request(s) in flight",
                detail.post_id(),
                detail.scope.in_flight()
            );
        }
        self.input.release();
    }

    pub fn detail_focus_next(&mut self) {
        let request = self.detail.as_mut().and_then(|d| d.focus_next());
        if let Some(request) = request {
            self.fetch_comments_page(request);
        }
    }

    pub fn start_comment(&mut self) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        if !self.auth.is_authenticated() {
            detail.composer.notice.show(SIGN_IN_NOTICE, Instant::now());
            return;
        }
        detail.focus_composer();
        let text = detail.composer.content().to_string();
        self.input.bind(InputTarget::Composer, &text, None);
    }

    pub fn submit_comment(&mut self) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        let now = Instant::now();
        match detail.composer.submit(&self.auth, now) {
            SubmitOutcome::Send(request) => {
                log_api_call!(self.log_config, "Creating comment on post {}", request.post);
                let backend = self.backend.clone();
                dispatch(&mut detail.scope, &self.tx, async move {
                    Completion::CommentCreated(backend.create_comment(&request).await)
                });
            }
            SubmitOutcome::SignInRequired => {
                detail.composer.notice.show(SIGN_IN_NOTICE, now);
                self.input.release();
            }
            SubmitOutcome::Rejected | SubmitOutcome::Busy => {}
        }
    }

    // Owner menu, edit and delete

    pub fn toggle_owner_menu(&mut self) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        let is_owner = match detail.focus() {
            Focus::Post => detail.post().is_some_and(|p| p.is_owner()),
            Focus::Comment(_) => detail.selected_comment().is_some_and(|c| c.is_owner()),
            Focus::Composer => false,
        };
        detail.menu.toggle(is_owner);
    }

    pub fn choose_menu_action(&mut self) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        let Some(action) = detail.menu.choose() else {
            return;
        };
        match action {
            MenuAction::Edit => {
                self.begin_edit();
            }
            MenuAction::Delete => self.request_delete(),
        }
    }

    /// Edit whatever has the cursor, if the viewer owns it
    pub fn begin_edit(&mut self) -> bool {
        let Some(detail) = self.detail.as_mut() else {
            return false;
        };
        match detail.focus() {
            Focus::Post => {
                let Some(card) = detail.post_mut() else {
                    return false;
                };
                if !card.begin_edit() {
                    return false;
                }
                let title = card.fields().title.clone();
                self.input
                    .bind(InputTarget::PostTitle, &title, Some(TITLE_MAX_CHARS));
                true
            }
            Focus::Comment(_) => {
                let Some(card) = detail.selected_comment_mut() else {
                    return false;
                };
                if !card.begin_edit() {
                    return false;
                }
                let id = card.id();
                let text = card.content().to_string();
                self.input.bind(InputTarget::CommentEdit(id), &text, None);
                true
            }
            Focus::Composer => false,
        }
    }

    /// Tab through title, content and image path of the post edit form
    pub fn cycle_post_field(&mut self) {
        let next = match self.input.target {
            Some(InputTarget::PostTitle) => InputTarget::PostContent,
            Some(InputTarget::PostContent) => InputTarget::PostImage,
            Some(InputTarget::PostImage) => InputTarget::PostTitle,
            _ => return,
        };
        let Some(card) = self.detail.as_ref().and_then(|d| d.post()) else {
            return;
        };
        if let Some((text, max_chars)) = post_field(card, next) {
            self.input.bind(next, &text, max_chars);
        }
    }

    /// Push the text area's contents into the bound field
    pub fn sync_input(&mut self) {
        let Some(target) = self.input.target else {
            return;
        };
        let text = self.input.text();
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        match target {
            InputTarget::Composer => detail.composer.set_content(&text),
            InputTarget::CommentEdit(id) => {
                if let Some(card) = detail.comment_mut(id) {
                    card.set_draft(&text);
                }
            }
            InputTarget::PostTitle | InputTarget::PostContent | InputTarget::PostImage => {
                if let Some(card) = detail.post_mut() {
                    match target {
                        InputTarget::PostTitle => card.set_title(&text),
                        InputTarget::PostContent => card.set_content(&text),
                        _ => card.set_image_path(&text),
                    }
                }
            }
        }
    }

    /// Enter while typing
    pub fn submit_input(&mut self) {
        let Some(target) = self.input.target else {
            return;
        };
        match target {
            InputTarget::Composer => self.submit_comment(),
            InputTarget::CommentEdit(id) => {
                let Some(detail) = self.detail.as_mut() else {
                    return;
                };
                let Some(request) = detail.comment_mut(id).and_then(|c| c.submit_edit()) else {
                    return;
                };
                log_api_call!(self.log_config, "Updating comment {}", id);
                let backend = self.backend.clone();
                dispatch(&mut detail.scope, &self.tx, async move {
                    Completion::CommentEdited {
                        id,
                        result: request.perform(&backend).await,
                    }
                });
            }
            InputTarget::PostTitle | InputTarget::PostContent | InputTarget::PostImage => {
                let Some(detail) = self.detail.as_mut() else {
                    return;
                };
                let Some(request) = detail.post_mut().and_then(|c| c.submit_edit()) else {
                    return;
                };
                log_api_call!(
                    self.log_config,
                    "Updating post {} (new image: {})",
                    request.post_id,
                    request.image_path.is_some()
                );
                let backend = self.backend.clone();
                dispatch(&mut detail.scope, &self.tx, async move {
                    Completion::PostEdited(request.perform(&backend).await)
                });
            }
        }
    }

    /// Esc while typing. Edits in the middle of saving stay open.
    pub fn cancel_input(&mut self) {
        let Some(target) = self.input.target else {
            return;
        };
        let released = match (target, self.detail.as_mut()) {
            (InputTarget::Composer, _) | (_, None) => true,
            (InputTarget::CommentEdit(id), Some(detail)) => match detail.comment_mut(id) {
                Some(card) => card.cancel_edit(),
                None => true,
            },
            (_, Some(detail)) => match detail.post_mut() {
                Some(card) => card.cancel_edit(),
                None => true,
            },
        };
        if released {
            self.input.release();
        }
    }

    pub fn request_delete(&mut self) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        let target = match detail.focus() {
            Focus::Post if detail.post().is_some_and(|p| p.is_owner()) => {
                DeleteTarget::Post(detail.post_id())
            }
            Focus::Comment(_) => match detail.selected_comment() {
                Some(card) if card.is_owner() => DeleteTarget::Comment(card.id()),
                _ => return,
            },
            _ => return,
        };
        detail.confirm.open(target);
    }

    pub fn confirm_delete(&mut self) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        let Some(target) = detail.confirm.confirm() else {
            return;
        };
        log_api_call!(self.log_config, "Deleting {:?}", target);
        let backend = self.backend.clone();
        dispatch(&mut detail.scope, &self.tx, async move {
            Completion::Deleted {
                target,
                result: target.perform(&backend).await,
            }
        });
    }

    // Profiles

    /// Show the profile of whoever wrote the item under the cursor
    pub fn open_focused_profile(&mut self) {
        let id = match self.screen() {
            Screen::Feed => self.feed.selected().map(|card| card.profile_id()),
            Screen::PostDetail => self.detail.as_ref().and_then(|detail| match detail.focus() {
                Focus::Comment(_) => detail.selected_comment().map(|c| c.comment().profile_id),
                _ => detail.post().map(|card| card.profile_id()),
            }),
            Screen::Profile => None,
        };
        if let Some(id) = id {
            self.open_profile(id);
        }
    }

    pub fn open_profile(&mut self, id: ProfileId) {
        let mut screen = ProfileScreen::default();
        let request = screen.view.load(id);
        log_api_call!(self.log_config, "Loading profile {}", id);
        let backend = self.backend.clone();
        dispatch(&mut screen.scope, &self.tx, async move {
            Completion::ProfileLoaded {
                request,
                result: request.perform(&backend).await,
            }
        });
        self.profile = Some(screen);
    }

    pub fn close_profile(&mut self) {
        self.profile = None;
    }
}
