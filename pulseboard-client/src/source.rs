//! Fetch-then-derive operations over any source of the three collections.

use crate::client::{ApiClient, Result};
use pulseboard_common::{
    derive::{join_comments_to_posts, rank_users_by_comments, select_trending_posts},
    model::{
        comment::Comment,
        post::{Post, PostWithComments},
        user::{RankedUser, User},
        view::ViewModel,
    },
};
use std::{future::Future, num::NonZeroUsize};
use time::UtcDateTime;
use tracing::debug;

pub trait CollectionSource: Send + Sync {
    fn fetch_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send;

    fn fetch_posts(&self) -> impl Future<Output = Result<Vec<Post>>> + Send;

    fn fetch_comments(&self) -> impl Future<Output = Result<Vec<Comment>>> + Send;
}

impl CollectionSource for ApiClient {
    async fn fetch_users(&self) -> Result<Vec<User>> {
        ApiClient::fetch_users(self).await
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        ApiClient::fetch_posts(self).await
    }

    async fn fetch_comments(&self) -> Result<Vec<Comment>> {
        ApiClient::fetch_comments(self).await
    }
}

pub async fn posts_with_comments<S: CollectionSource>(
    source: &S,
) -> Result<Vec<PostWithComments>> {
    let (posts, comments) = tokio::try_join!(source.fetch_posts(), source.fetch_comments())?;

    Ok(join_comments_to_posts(posts, comments))
}

pub async fn top_users<S: CollectionSource>(
    source: &S,
    limit: NonZeroUsize,
) -> Result<Vec<RankedUser>> {
    let (users, posts) = tokio::try_join!(source.fetch_users(), posts_with_comments(source))?;

    Ok(rank_users_by_comments(&users, &posts, limit))
}

pub async fn trending_posts<S: CollectionSource>(source: &S) -> Result<Vec<PostWithComments>> {
    let posts = posts_with_comments(source).await?;

    Ok(select_trending_posts(&posts))
}

/// Fetches all three collections concurrently and derives the complete view.
///
/// Fails as soon as any fetch fails; no partial view is built.
pub async fn fetch_view_model<S: CollectionSource>(
    source: &S,
    refreshed_at: UtcDateTime,
) -> Result<ViewModel> {
    let (users, posts, comments) = tokio::try_join!(
        source.fetch_users(),
        source.fetch_posts(),
        source.fetch_comments()
    )?;
    debug!(
        users = users.len(),
        posts = posts.len(),
        comments = comments.len(),
        "Fetched all collections"
    );

    Ok(ViewModel::derive(users, posts, comments, refreshed_at))
}

#[cfg(test)]
mod tests {
    use crate::client::{Collection, FetchError, Result};
    use crate::source::{
        CollectionSource, fetch_view_model, posts_with_comments, top_users, trending_posts,
    };
    use pulseboard_common::model::{comment::Comment, post::Post, user::User};
    use reqwest::StatusCode;
    use std::num::NonZeroUsize;
    use time::macros::utc_datetime;

    #[derive(Clone, Debug, Default)]
    struct StaticSource {
        users: Vec<User>,
        posts: Vec<Post>,
        comments: Vec<Comment>,
        failing: Option<Collection>,
    }

    impl StaticSource {
        fn check(&self, collection: Collection) -> Result<()> {
            if self.failing == Some(collection) {
                Err(FetchError::Status {
                    operation: collection,
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                })
            } else {
                Ok(())
            }
        }
    }

    impl CollectionSource for StaticSource {
        async fn fetch_users(&self) -> Result<Vec<User>> {
            self.check(Collection::Users)?;
            Ok(self.users.clone())
        }

        async fn fetch_posts(&self) -> Result<Vec<Post>> {
            self.check(Collection::Posts)?;
            Ok(self.posts.clone())
        }

        async fn fetch_comments(&self) -> Result<Vec<Comment>> {
            self.check(Collection::Comments)?;
            Ok(self.comments.clone())
        }
    }

    fn scenario() -> StaticSource {
        StaticSource {
            users: [1, 2]
                .map(|id: u64| User {
                    id: id.into(),
                    ..User::default()
                })
                .to_vec(),
            posts: [(10, 1), (11, 2)]
                .map(|(id, user_id): (u64, u64)| Post {
                    id: id.into(),
                    user_id: user_id.into(),
                    ..Post::default()
                })
                .to_vec(),
            comments: [(1, 10), (2, 10), (3, 11)]
                .map(|(id, post_id): (u64, u64)| Comment {
                    id: id.into(),
                    post_id: post_id.into(),
                    ..Comment::default()
                })
                .to_vec(),
            failing: None,
        }
    }

    #[tokio::test]
    async fn top_users_scenario() {
        let top = top_users(&scenario(), NonZeroUsize::new(5).unwrap())
            .await
            .unwrap();

        let summary: Vec<(u64, usize)> = top
            .iter()
            .map(|ranked| (ranked.user.id.get(), ranked.comment_count))
            .collect();
        assert_eq!(summary, [(1, 2), (2, 1)]);
    }

    #[tokio::test]
    async fn trending_scenario() {
        let trending = trending_posts(&scenario()).await.unwrap();

        assert_eq!(trending.len(), 1);
        assert_eq!(trending[0].post.id.get(), 10);
    }

    #[tokio::test]
    async fn no_posts_yields_empty_views() {
        let source = StaticSource {
            posts: Vec::new(),
            ..scenario()
        };

        assert!(posts_with_comments(&source).await.unwrap().is_empty());
        assert!(trending_posts(&source).await.unwrap().is_empty());
        let top = top_users(&source, NonZeroUsize::MIN).await.unwrap();
        assert_eq!(top[0].comment_count, 0);

        let empty = StaticSource::default();
        assert!(top_users(&empty, NonZeroUsize::MIN).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn any_failure_aborts_the_cycle() {
        let source = StaticSource {
            failing: Some(Collection::Comments),
            ..scenario()
        };

        let error = fetch_view_model(&source, utc_datetime!(2025-01-01 00:00))
            .await
            .unwrap_err();
        assert_eq!(error.operation(), Collection::Comments);
        assert!(posts_with_comments(&source).await.is_err());
    }

    #[tokio::test]
    async fn view_model_combines_all_collections() {
        let view = fetch_view_model(&scenario(), utc_datetime!(2025-01-01 00:00))
            .await
            .unwrap();

        assert_eq!(view.users().len(), 2);
        assert_eq!(view.feed()[0].post.id.get(), 11);
        assert_eq!(view.trending()[0].comment_count(), 2);
    }
}
