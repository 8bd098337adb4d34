use std::collections::HashMap;

use crate::clients::x_api::{UpstreamPost, XUser};
use crate::models::{EngagementMetrics, PostAuthor, ScoredPost};

/// Weighted engagement: reposts and quotes signal the strongest spread,
/// replies slightly more than plain likes.
#[must_use]
pub fn engagement_score(metrics: EngagementMetrics) -> f64 {
    let like = metrics.like as f64;
    let repost = metrics.repost as f64;
    let reply = metrics.reply as f64;
    let quote = metrics.quote as f64;

    like + repost * 2.0 + reply * 1.5 + quote * 2.0
}

/// Canonical link for a post; falls back to the generic status URL when the
/// author's username is unknown.
#[must_use]
pub fn status_link(post_id: &str, username: &str) -> String {
    if username.is_empty() {
        format!("https://x.com/i/web/status/{post_id}")
    } else {
        format!("https://x.com/{username}/status/{post_id}")
    }
}

/// Score every post and order the result best-first.
///
/// The sort is stable: posts with equal scores keep their upstream relative
/// order. No truncation happens here.
#[must_use]
pub fn rank_posts(posts: Vec<UpstreamPost>, users: &HashMap<String, XUser>) -> Vec<ScoredPost> {
    let mut ranked: Vec<ScoredPost> = posts.into_iter().map(|p| score_post(p, users)).collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

fn score_post(post: UpstreamPost, users: &HashMap<String, XUser>) -> ScoredPost {
    let metrics = EngagementMetrics {
        like: post.public_metrics.like_count,
        repost: post.public_metrics.retweet_count,
        reply: post.public_metrics.reply_count,
        quote: post.public_metrics.quote_count,
    };

    let user = post.author_id.as_deref().and_then(|id| users.get(id));
    let username = user.map(|u| u.username.clone()).unwrap_or_default();
    let name = user.map(|u| u.name.clone()).unwrap_or_default();
    let link = status_link(&post.id, &username);

    ScoredPost {
        link,
        score: engagement_score(metrics),
        metrics,
        author: PostAuthor {
            id: post.author_id,
            username,
            name,
        },
        id: post.id,
        text: post.text,
        created_at: post.created_at,
        lang: post.lang,
    }
}
