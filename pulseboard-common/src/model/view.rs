use crate::{
    derive::{join_comments_to_posts, rank_users_by_comments, select_trending_posts, sort_feed},
    model::{
        Id,
        comment::Comment,
        post::{Post, PostWithComments},
        user::{RankedUser, User, UserMarker},
    },
};
use std::num::NonZeroUsize;
use time::UtcDateTime;

/// Everything the dashboard shows, derived from one fetch of all three collections.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ViewModel {
    refreshed_at: UtcDateTime,
    users: Vec<User>,
    feed: Vec<PostWithComments>,
    trending: Vec<PostWithComments>,
}

impl ViewModel {
    #[must_use]
    pub fn derive(
        users: Vec<User>,
        posts: Vec<Post>,
        comments: Vec<Comment>,
        refreshed_at: UtcDateTime,
    ) -> Self {
        let mut feed = join_comments_to_posts(posts, comments);
        let trending = select_trending_posts(&feed);
        sort_feed(&mut feed);

        Self {
            refreshed_at,
            users,
            feed,
            trending,
        }
    }

    #[must_use]
    pub fn refreshed_at(&self) -> UtcDateTime {
        self.refreshed_at
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// All posts with their comments, newest first.
    #[must_use]
    pub fn feed(&self) -> &[PostWithComments] {
        &self.feed
    }

    #[must_use]
    pub fn trending(&self) -> &[PostWithComments] {
        &self.trending
    }

    #[must_use]
    pub fn top_users(&self, limit: NonZeroUsize) -> Vec<RankedUser> {
        rank_users_by_comments(&self.users, &self.feed, limit)
    }

    #[must_use]
    pub fn user(&self, id: Id<UserMarker>) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }
}
