//! A wildcard-aware hierarchical path matcher.
//!
//! This crate stores a set of slash-delimited paths — each an ordered
//! sequence of name tokens, tokens possibly carrying shell-style wildcards —
//! and answers, for any concrete input path, whether it is an exact member,
//! an ancestor of a member, a descendant of a member, or unrelated.
//!
//! # Example
//!
//! ```rust
//! use pathmatcher::{MatchFlags, PathMatcher};
//!
//! let mut matcher = PathMatcher::new();
//! matcher.insert("/scene/.../geo*");
//!
//! assert_eq!(matcher.match_path("/scene/group/geo1"), MatchFlags::EXACT_MATCH);
//! assert_eq!(matcher.match_path("/scene/group"), MatchFlags::DESCENDANT_MATCH);
//! ```
//!
//! # Syntax
//!
//! Paths are split on `/`; leading, trailing, and duplicated separators
//! collapse (`"a//b/"` tokenizes the same as `"a/b"`). Each token may be:
//!
//! * A literal name, matching only itself.
//! * A glob: `*` matches any run of characters (including none), `?`
//!   matches exactly one character, `[abc]`/`[a-z]` match a character
//!   class, and `[!abc]` negates it.
//! * The literal token `...`, matching any (possibly empty) span of
//!   intermediate tokens.
//!
//! # Comparing to a flat set of paths
//!
//! A `HashSet<String>` can answer "is this path a member", but not "is this
//! path an ancestor or descendant of a member" without a full scan, and
//! can't express wildcards at all. This crate trades that simplicity for a
//! prefix tree that answers all three questions, plus set-wise union and
//! difference against another matcher, in time proportional to path depth.

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(unused_crate_dependencies)]

mod error;
mod flags;
mod matcher;
mod node;
mod pattern;
mod token;

pub use self::{
    error::MatcherError,
    flags::MatchFlags,
    matcher::PathMatcher,
    token::{Token, tokenize},
};
