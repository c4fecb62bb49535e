//! The merged engagement view of a post and the reaction summary it carries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    client::api::comments::CommentCount,
    meta::{PostId, ReactionKind},
};

/// Comment and reaction counts for a single post.
///
/// Built fresh for every request out of the answers of the Comments and Reactions
/// services; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    /// The post the counts belong to.
    pub post_id: PostId,
    /// Number of comments, as reported by the Comments service.
    pub comments: u64,
    /// Reaction summary, exactly as reported by the Reactions service.
    pub reactions: ReactionSummary,
}

impl Engagement {
    /// Assembles the two upstream answers. No transformation other than reading the
    /// comment count, where a missing count counts as `0`.
    pub(crate) fn merge(
        post_id: PostId,
        comments: &CommentCount,
        reactions: ReactionSummary,
    ) -> Self {
        if !reactions.is_consistent() {
            tracing::warn!(
                %post_id,
                total = reactions.total,
                sum = reactions.breakdown.sum(),
                "reaction summary total does not match its breakdown"
            );
        }

        Self {
            post_id,
            comments: comments.count(),
            reactions,
        }
    }
}

/// Reaction counts for a post, as answered by `GET /reactions/count`.
///
/// Only `total` and `breakdown` are required. Any other field the Reactions service
/// sends is kept in [`other`](Self::other) and written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    /// Post id echoed back by the Reactions service, if it sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,
    /// Total number of reactions.
    pub total: u64,
    /// Per-kind counts.
    pub breakdown: Breakdown,
    /// Fields of the payload not covered above.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ReactionSummary {
    /// Whether `total` equals the sum of the breakdown.
    ///
    /// The Reactions service guarantees this; the aggregation only reports on it and
    /// never rejects a summary for it.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total == self.breakdown.sum()
    }
}

/// Per-kind reaction counts.
///
/// Kinds missing from a payload count as `0`. Kinds outside of [`ReactionKind`] are
/// kept as-is in `other` but take no part in [`sum`](Self::sum).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[expect(missing_docs, reason = "one counter per `ReactionKind`")]
pub struct Breakdown {
    pub like: u64,
    pub love: u64,
    pub laugh: u64,
    pub wow: u64,
    pub sad: u64,
    pub angry: u64,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Breakdown {
    /// Returns the count for `kind`.
    #[must_use]
    pub fn get(&self, kind: ReactionKind) -> u64 {
        match kind {
            ReactionKind::Like => self.like,
            ReactionKind::Love => self.love,
            ReactionKind::Laugh => self.laugh,
            ReactionKind::Wow => self.wow,
            ReactionKind::Sad => self.sad,
            ReactionKind::Angry => self.angry,
        }
    }

    /// Iterates every kind with its count, in [`ReactionKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ReactionKind, u64)> + '_ {
        ReactionKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Sum of all counts.
    #[must_use]
    pub fn sum(&self) -> u64 {
        self.iter()
            .fold(0_u64, |acc, (_, count)| acc.saturating_add(count))
    }
}
