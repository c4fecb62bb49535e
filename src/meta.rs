//! Contains the small value types shared by the client, the aggregation and the gateway.

use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// An error that can occur when turning user input into a [`PostId`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not a valid post id, should be a positive integer")]
pub struct InvalidPostId(String);

/// Identifier of a post, as understood by the Comments and Reactions services.
///
/// Always positive. The gateway receives it as a path segment, so the main way of
/// getting one is through [`FromStr`]:
///
/// ```
/// # use engagement::PostId;
/// let id: PostId = "7".parse()?;
/// assert_eq!(7, id.get());
///
/// assert!("0".parse::<PostId>().is_err());
/// assert!("seven".parse::<PostId>().is_err());
/// # Ok::<(), engagement::meta::InvalidPostId>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(u64);

impl PostId {
    /// Creates a `PostId`, rejecting `0`.
    pub fn new(id: u64) -> Result<Self, InvalidPostId> {
        if id == 0 {
            return Err(InvalidPostId(id.to_string()));
        }

        Ok(Self(id))
    }

    /// Returns the numeric value of the id.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for PostId {
    type Err = InvalidPostId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `u64::from_str` accepts a leading `+`, which isn't a valid segment here.
        if s.is_empty() || !s.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(InvalidPostId(s.to_owned()));
        }

        let id = s.parse::<u64>().map_err(|_err| InvalidPostId(s.to_owned()))?;

        Self::new(id).map_err(|_err| InvalidPostId(s.to_owned()))
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<u64> for PostId {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

/// The upstream services the aggregation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Owns comments; answers `GET /comments/count`.
    Comments,
    /// Owns reactions; answers `GET /reactions/count`.
    Reactions,
}

impl Service {
    /// Path of the count endpoint on the service.
    pub(crate) fn count_path(self) -> &'static str {
        match self {
            Self::Comments => "comments/count",
            Self::Reactions => "reactions/count",
        }
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Self::Comments => "comments",
            Self::Reactions => "reactions",
        };

        write!(f, "{str}")
    }
}

/// An error that can occur when parsing a [`ReactionKind`].
#[derive(Debug, Error)]
#[error(
    "failed to parse `{0}` into `ReactionKind` should be one of `like`, `love`, `laugh`, `wow`, `sad`, `angry`"
)]
pub struct ParseReactionKindError(String);

/// The closed set of reactions a user can leave on a post.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    /// 👍
    Like,
    /// ❤️
    Love,
    /// 😂
    Laugh,
    /// 😮
    Wow,
    /// 😢
    Sad,
    /// 😡
    Angry,
}

impl ReactionKind {
    /// Every kind, in the order the Reactions service reports them.
    pub const ALL: [Self; 6] = [
        Self::Like,
        Self::Love,
        Self::Laugh,
        Self::Wow,
        Self::Sad,
        Self::Angry,
    ];

    /// Lowercase name as used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Love => "love",
            Self::Laugh => "laugh",
            Self::Wow => "wow",
            Self::Sad => "sad",
            Self::Angry => "angry",
        }
    }
}

impl FromStr for ReactionKind {
    type Err = ParseReactionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "love" => Ok(Self::Love),
            "laugh" => Ok(Self::Laugh),
            "wow" => Ok(Self::Wow),
            "sad" => Ok(Self::Sad),
            "angry" => Ok(Self::Angry),
            _ => Err(ParseReactionKindError(s.to_owned())),
        }
    }
}

impl Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_parse_positive_post_ids() {
        let id: PostId = "7".parse().unwrap();
        assert_eq!(id, 7);

        let id: PostId = "18446744073709551615".parse().unwrap();
        assert_eq!(id, u64::MAX);
    }

    #[test]
    fn should_reject_invalid_post_ids() {
        for input in ["", "0", "-1", "+1", "1.5", "abc", "7a", " 7", "18446744073709551616"] {
            assert!(
                input.parse::<PostId>().is_err(),
                "`{input}` should not be a valid post id"
            );
        }
    }

    #[test]
    fn should_reject_zero_post_id() {
        assert_eq!(PostId::new(0), Err(InvalidPostId("0".to_owned())));
    }

    #[test]
    fn should_roundtrip_reaction_kind_names() {
        for kind in ReactionKind::ALL {
            assert_eq!(kind, kind.as_str().parse::<ReactionKind>().unwrap());
            assert_eq!(kind.as_str(), kind.to_string());
        }

        assert!("dislike".parse::<ReactionKind>().is_err());
    }

    #[test]
    fn service_should_point_at_count_endpoints() {
        assert_eq!("comments/count", Service::Comments.count_path());
        assert_eq!("reactions/count", Service::Reactions.count_path());
        assert_eq!("reactions", Service::Reactions.to_string());
    }
}
