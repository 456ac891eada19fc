//! Feature components: each one owns the state of one piece of the screen and
//! turns key presses into requests for the shell to send.

pub mod comment;
pub mod comment_form;
pub mod confirm;
pub mod detail;
pub mod edit;
pub mod feed;
pub mod like;
pub mod menu;
pub mod notice;
pub mod pagination;
pub mod post;
pub mod profile;
pub mod scope;

pub use comment::{CommentCard, CommentEditRequest};
pub use comment_form::{CommentComposer, SubmitOutcome};
pub use confirm::{ConfirmationModal, DeleteTarget};
pub use detail::{Focus, PostDetailView};
pub use edit::{EditPhase, InlineEditor};
pub use feed::FeedView;
pub use like::{LikeClick, LikeOutcome, LikeRequest, LikeState, LikeToggle};
pub use menu::{MenuAction, OwnerMenu};
pub use notice::{Notice, NOTICE_DURATION};
pub use pagination::{PageRequest, PagedList};
pub use post::{PostCard, PostEditRequest, PostFields};
pub use profile::{ProfileRequest, ProfileView};
pub use scope::{CancelToken, TaskScope};
