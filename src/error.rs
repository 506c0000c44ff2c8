use std::ffi::OsString;

use thiserror::Error;

/// Errors surfaced at the one fallible seam of this crate: converting
/// externally-sourced, OS-provided path data into token sequences.
///
/// Every other operation on [`crate::PathMatcher`] is total (see spec §4.5):
/// once a path has been reduced to a sequence of [`crate::Token`]s, it always
/// succeeds.
#[derive(Debug, Error)]
pub enum MatcherError {
    /// A path component could not be converted to UTF-8.
    ///
    /// The tokenizer operates on `str`, so components coming from
    /// [`std::ffi::OsStr`] on platforms with non-UTF-8 filenames must be
    /// rejected here rather than silently lossy-converted, since a lossy
    /// conversion could make two distinct stored paths collide.
    #[error("path component is not valid UTF-8: {0:?}")]
    NotUtf8(OsString),
}
