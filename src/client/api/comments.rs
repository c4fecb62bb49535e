use serde::Deserialize;

use crate::stdx::serde::lenient_count;

/// Body of `GET /comments/count`.
///
/// Only `count` is read; the echoed `postId` is ignored.
#[derive(Deserialize, Debug)]
pub struct CommentCount {
    #[serde(default, deserialize_with = "lenient_count")]
    count: Option<u64>,
}

impl CommentCount {
    /// A missing or `null` count is `0`.
    pub fn count(&self) -> u64 {
        self.count.unwrap_or(0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_read_count() {
        let count: CommentCount = serde_json::from_str(r#"{"postId":7,"count":3}"#).unwrap();
        assert_eq!(3, count.count());
    }

    #[test]
    fn should_default_missing_or_null_count_to_zero() {
        let missing: CommentCount = serde_json::from_str(r#"{"postId":7}"#).unwrap();
        assert_eq!(0, missing.count());

        let null: CommentCount = serde_json::from_str(r#"{"postId":7,"count":null}"#).unwrap();
        assert_eq!(0, null.count());
    }

    #[test]
    fn should_accept_count_as_string() {
        let count: CommentCount = serde_json::from_str(r#"{"count":"12"}"#).unwrap();
        assert_eq!(12, count.count());
    }

    #[test]
    fn should_reject_negative_or_garbage_count() {
        assert!(serde_json::from_str::<CommentCount>(r#"{"count":-1}"#).is_err());
        assert!(serde_json::from_str::<CommentCount>(r#"{"count":"many"}"#).is_err());
        assert!(serde_json::from_str::<CommentCount>(r#"{"count":1.5}"#).is_err());
    }
}
