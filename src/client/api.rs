//! Raw payloads returned by the upstream services.
//!
//! `GET /reactions/count` is read straight into [`ReactionSummary`](crate::ReactionSummary),
//! since it is handed back to callers untouched.

pub(crate) mod comments;
