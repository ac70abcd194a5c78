use pulseboard_common::{
    dashboard::{CycleFailure, DashboardState},
    image::{ImageKind, select_image},
    model::{
        post::PostWithComments,
        user::{RankedUser, User},
        view::ViewModel,
    },
};
use serde::Serialize;

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEntry {
    #[serde(flatten)]
    pub post: PostWithComments,
    pub comment_count: usize,
    pub author: Option<User>,
    pub image_url: String,
    pub author_avatar_url: String,
}

impl PostEntry {
    pub fn new(post: &PostWithComments, view: &ViewModel) -> Self {
        let user_id = post.post.user_id;

        Self {
            post: post.clone(),
            comment_count: post.comment_count(),
            author: view.user(user_id).cloned(),
            image_url: select_image(post.post.id, ImageKind::Post),
            author_avatar_url: select_image(user_id, ImageKind::User),
        }
    }

    pub fn list(posts: &[PostWithComments], view: &ViewModel) -> Vec<Self> {
        posts.iter().map(|post| Self::new(post, view)).collect()
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedUserEntry {
    #[serde(flatten)]
    pub ranked: RankedUser,
    pub avatar_url: String,
}

impl From<RankedUser> for RankedUserEntry {
    fn from(ranked: RankedUser) -> Self {
        let avatar_url = select_image(ranked.user.id, ImageKind::User);
        Self { ranked, avatar_url }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct ImageEntry {
    pub url: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureEntry {
    pub at: i64,
    pub message: String,
}

impl From<&CycleFailure> for FailureEntry {
    fn from(failure: &CycleFailure) -> Self {
        Self {
            at: failure.at.unix_timestamp(),
            message: failure.message.clone(),
        }
    }
}

/// Refresh bookkeeping, timestamps in unix seconds.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub refreshing: bool,
    pub cycles: u64,
    pub last_refreshed_at: Option<i64>,
    pub last_failure: Option<FailureEntry>,
}

impl From<&DashboardState> for StatusEntry {
    fn from(state: &DashboardState) -> Self {
        Self {
            refreshing: state.is_refreshing(),
            cycles: state.started_cycles(),
            last_refreshed_at: state
                .view()
                .map(|view| view.refreshed_at().unix_timestamp()),
            last_failure: state.last_failure().map(FailureEntry::from),
        }
    }
}
