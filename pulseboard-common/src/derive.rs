//! Pure derivations from the raw collections to the dashboard views.

use crate::model::{
    Id,
    comment::Comment,
    post::{Post, PostMarker, PostWithComments},
    user::{RankedUser, User, UserMarker},
};
use std::{cmp::Reverse, collections::HashMap, num::NonZeroUsize};

/// Attaches to every post the comments referencing it, in the order they arrived.
///
/// Every post appears exactly once and in input order. Comments referencing a post
/// that is not in `posts` are dropped. Post ids are expected to be unique.
#[must_use]
pub fn join_comments_to_posts(posts: Vec<Post>, comments: Vec<Comment>) -> Vec<PostWithComments> {
    let mut comments_by_post: HashMap<Id<PostMarker>, Vec<Comment>> = HashMap::new();
    for comment in comments {
        comments_by_post
            .entry(comment.post_id)
            .or_default()
            .push(comment);
    }

    posts
        .into_iter()
        .map(|post| {
            let comments = comments_by_post.remove(&post.id).unwrap_or_default();
            PostWithComments { post, comments }
        })
        .collect()
}

/// Ranks users by the total number of comments on their posts and keeps the first `limit`.
#[must_use]
pub fn rank_users_by_comments(
    users: &[User],
    posts: &[PostWithComments],
    limit: NonZeroUsize,
) -> Vec<RankedUser> {
    let mut counts: HashMap<Id<UserMarker>, usize> = HashMap::new();
    for post in posts {
        *counts.entry(post.post.user_id).or_default() += post.comment_count();
    }

    let mut ranked: Vec<RankedUser> = users
        .iter()
        .map(|user| RankedUser {
            user: user.clone(),
            comment_count: counts.get(&user.id).copied().unwrap_or_default(),
        })
        .collect();

    // sort_by_key is stable, so users with equal counts keep their source order.
    ranked.sort_by_key(|ranked| Reverse(ranked.comment_count));
    ranked.truncate(limit.get());
    ranked
}

/// Selects every post whose comment count equals the maximum, newest (highest id) first.
#[must_use]
pub fn select_trending_posts(posts: &[PostWithComments]) -> Vec<PostWithComments> {
    let max_comments = posts
        .iter()
        .map(PostWithComments::comment_count)
        .max()
        .unwrap_or_default();

    let mut trending: Vec<PostWithComments> = posts
        .iter()
        .filter(|post| post.comment_count() == max_comments)
        .cloned()
        .collect();
    sort_feed(&mut trending);
    trending
}

/// Orders posts the way the live feed shows them, highest id first.
pub fn sort_feed(posts: &mut [PostWithComments]) {
    posts.sort_by_key(|post| Reverse(post.post.id));
}
