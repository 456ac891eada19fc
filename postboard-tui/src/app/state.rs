use postboard_types::{Comment, CommentId, Page, Post, PostId, Profile};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tui_textarea::TextArea;

use crate::api::{ApiResult, Backend};
use crate::auth::AuthContext;
use crate::components::{
    CancelToken, DeleteTarget, FeedView, LikeOutcome, Notice, PostDetailView, ProfileRequest,
    ProfileView, TaskScope,
};
use crate::logging::LogConfig;

/// Which screen is on top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Feed,
    PostDetail,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Navigation, // Browsing content, shortcuts active
    Typing,     // In text input, shortcuts disabled
}

/// The field the text area is currently bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Composer,
    CommentEdit(CommentId),
    PostTitle,
    PostContent,
    PostImage,
}

impl InputTarget {
    pub fn label(&self) -> &'static str {
        match self {
            InputTarget::Composer => "Comment",
            InputTarget::CommentEdit(_) => "Edit comment",
            InputTarget::PostTitle => "Title",
            InputTarget::PostContent => "Content",
            InputTarget::PostImage => "Image file (leave empty to keep)",
        }
    }
}

/// Shared text area, bound to one field at a time
pub struct InputState {
    pub target: Option<InputTarget>,
    pub textarea: TextArea<'static>,
    pub max_chars: Option<usize>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            target: None,
            textarea: TextArea::default(),
            max_chars: None,
        }
    }

    pub fn mode(&self) -> InputMode {
        match self.target {
            Some(_) => InputMode::Typing,
            None => InputMode::Navigation,
        }
    }

    pub fn bind(&mut self, target: InputTarget, text: &str, max_chars: Option<usize>) {
        let mut textarea = TextArea::from(text.lines());
        textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        textarea.move_cursor(tui_textarea::CursorMove::End);
        self.textarea = textarea;
        self.target = Some(target);
        self.max_chars = max_chars;
    }

    pub fn release(&mut self) {
        self.target = None;
        self.max_chars = None;
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn char_count(&self) -> usize {
        self.text().chars().count()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// The profile screen and the requests made for it
#[derive(Debug, Default)]
pub struct ProfileScreen {
    pub view: ProfileView,
    pub scope: TaskScope,
}

/// Which card a like request was made from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOrigin {
    Feed,
    Detail,
}

/// A finished request, to be applied on the event-loop thread
#[derive(Debug)]
pub enum Completion {
    FeedPage {
        seq: u64,
        result: ApiResult<Page<Post>>,
    },
    Like {
        origin: LikeOrigin,
        post: PostId,
        outcome: LikeOutcome,
    },
    PostLoaded(ApiResult<Post>),
    CommentsPage {
        seq: u64,
        result: ApiResult<Page<Comment>>,
    },
    PostEdited(ApiResult<Post>),
    CommentCreated(ApiResult<Comment>),
    CommentEdited {
        id: CommentId,
        result: ApiResult<Comment>,
    },
    Deleted {
        target: DeleteTarget,
        result: ApiResult<()>,
    },
    ProfileLoaded {
        request: ProfileRequest,
        result: ApiResult<Profile>,
    },
}

/// A completion together with the token of the scope that asked for it
#[derive(Debug)]
pub struct Envelope {
    pub token: CancelToken,
    pub completion: Completion,
}

pub struct App<B: Backend> {
    pub running: bool,
    pub backend: B,
    pub auth: AuthContext,
    pub log_config: LogConfig,
    pub feed: FeedView,
    pub detail: Option<Box<PostDetailView>>,
    pub profile: Option<ProfileScreen>,
    pub input: InputState,
    /// Transient error or status line
    pub notice: Notice,
    pub show_help: bool,
    pub(crate) tx: UnboundedSender<Envelope>,
    pub(crate) rx: UnboundedReceiver<Envelope>,
}

impl Completion {
    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            Completion::FeedPage { .. } => "feed page",
            Completion::Like { .. } => "like",
            Completion::PostLoaded(_) => "post",
            Completion::CommentsPage { .. } => "comments page",
            Completion::PostEdited(_) => "post edit",
            Completion::CommentCreated(_) => "comment create",
            Completion::CommentEdited { .. } => "comment edit",
            Completion::Deleted { .. } => "delete",
            Completion::ProfileLoaded { .. } => "profile",
        }
    }
}
