use std::ffi::OsStr;

use crate::{
    error::MatcherError,
    flags::MatchFlags,
    node::Node,
    token::{Token, join_path, tokenize},
};

/// A set of slash-delimited, wildcard-aware paths, stored as a prefix tree.
///
/// See the crate documentation for the full semantics. In short: tokens may
/// carry shell-style glob metacharacters (`*`, `?`, `[abc]`, `[!abc]`), and
/// the distinguished token `...` matches any, possibly empty, span of
/// intermediate tokens.
///
/// All operations are synchronous, infallible given well-formed input, and
/// either succeed outright or are no-ops — there is no partially-updated
/// state on failure (there is no failure).
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    root: Node,
}

impl PathMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matcher from an iterator of path strings.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matcher = Self::new();
        for path in paths {
            matcher.insert(path.as_ref());
        }
        matcher
    }

    /// Build a matcher from OS-provided paths, rejecting any component that
    /// is not valid UTF-8. The only fallible constructor in this crate — see
    /// [`MatcherError`].
    pub fn try_from_os_paths<I, S>(paths: I) -> Result<Self, MatcherError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut matcher = Self::new();
        for path in paths {
            let path = path.as_ref();
            let path_str = path
                .to_str()
                .ok_or_else(|| MatcherError::NotUtf8(path.to_os_string()))?;
            matcher.insert(path_str);
        }
        Ok(matcher)
    }

    /// Insert `path`, tokenizing on `/`. Returns `true` iff the path was not
    /// already a member.
    pub fn insert(&mut self, path: &str) -> bool {
        self.insert_tokens(&tokenize(path))
    }

    /// Insert a pre-tokenized path. The empty token sequence (as produced by
    /// tokenizing `"/"`) sets the root's terminator.
    pub fn insert_tokens(&mut self, tokens: &[Token]) -> bool {
        let mut node = &mut self.root;
        for token in tokens {
            node = if token.is_ellipsis() {
                node.ellipsis
                    .get_or_insert_with(|| Box::new(Node::new()))
                    .as_mut()
            } else {
                node.child_or_insert(token)
            };
        }
        let was_terminator = node.terminator;
        node.terminator = true;
        !was_terminator
    }

    /// Remove `path` if it is an exact member. Returns `true` iff it was.
    pub fn remove(&mut self, path: &str) -> bool {
        self.remove_tokens(&tokenize(path))
    }

    pub fn remove_tokens(&mut self, tokens: &[Token]) -> bool {
        remove_walk(&mut self.root, tokens, false)
    }

    /// Remove `path` and every path of which it is a prefix. Returns `true`
    /// iff anything changed.
    pub fn prune(&mut self, path: &str) -> bool {
        self.prune_tokens(&tokenize(path))
    }

    pub fn prune_tokens(&mut self, tokens: &[Token]) -> bool {
        remove_walk(&mut self.root, tokens, true)
    }

    /// Merge every path of `other` into `self`. Returns `true` iff `self`
    /// changed.
    pub fn union_from(&mut self, other: &PathMatcher) -> bool {
        union_walk(&mut self.root, &other.root)
    }

    /// Remove every path of `other` that is also present in `self`. Returns
    /// `true` iff `self` changed. Paths present in `other` but not in `self`
    /// are silently skipped — this removes only what is present.
    pub fn difference_from(&mut self, other: &PathMatcher) -> bool {
        difference_walk(&mut self.root, &other.root)
    }

    /// Classify `path` against the stored set. See [`MatchFlags`].
    pub fn match_path(&self, path: &str) -> MatchFlags {
        self.match_tokens(&tokenize(path))
    }

    pub fn match_tokens(&self, tokens: &[Token]) -> MatchFlags {
        let mut flags = MatchFlags::NO_MATCH;
        match_walk(&self.root, tokens, &mut flags);
        flags
    }

    /// All stored paths, as `/`-prefixed strings. Order is unspecified.
    pub fn enumerate(&self) -> Vec<String> {
        let mut paths = Vec::new();
        let mut prefix = Vec::new();
        enumerate_walk(&self.root, &mut prefix, &mut paths);
        paths
    }

    /// Replace the matcher with a fresh, empty one.
    pub fn clear(&mut self) {
        self.root = Node::new();
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl PartialEq for PathMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.root.equal(&other.root)
    }
}

impl Eq for PathMatcher {}

impl FromIterator<String> for PathMatcher {
    fn from_iter<I: IntoIterator<Item = String>>(paths: I) -> Self {
        Self::from_paths(paths)
    }
}

fn remove_walk(node: &mut Node, tokens: &[Token], prune: bool) -> bool {
    let Some((first, rest)) = tokens.split_first() else {
        let mut removed = false;
        if prune {
            removed = node.clear_children();
        }
        removed = removed || node.terminator;
        node.terminator = false;
        return removed;
    };

    if first.is_ellipsis() {
        let removed;
        let should_drop;
        {
            let Some(child) = node.ellipsis.as_deref_mut() else {
                return false;
            };
            removed = remove_walk(child, rest, prune);
            should_drop = child.is_empty();
        }
        if should_drop {
            node.ellipsis = None;
        }
        removed
    } else {
        let removed;
        let should_drop;
        {
            let Some(child) = node.find_child_exact_mut(first) else {
                return false;
            };
            removed = remove_walk(child, rest, prune);
            should_drop = child.is_empty();
        }
        if should_drop {
            node.remove_child_exact(first);
        }
        removed
    }
}

fn union_walk(dest: &mut Node, src: &Node) -> bool {
    let mut changed = false;

    if src.terminator && !dest.terminator {
        dest.terminator = true;
        changed = true;
    }

    for (token, src_child) in src.children_iter() {
        if let Some(dest_child) = dest.find_child_exact_mut(token) {
            changed = union_walk(dest_child, src_child) || changed;
        } else {
            // Invariant I1 guarantees src_child contains a terminator
            // somewhere below it, so copying it in is always a change.
            dest.insert_cloned_child(token, src_child);
            changed = true;
        }
    }

    if let Some(src_ellipsis) = &src.ellipsis {
        if let Some(dest_ellipsis) = dest.ellipsis.as_deref_mut() {
            changed = union_walk(dest_ellipsis, src_ellipsis) || changed;
        } else {
            dest.ellipsis = Some(Box::new(src_ellipsis.as_ref().clone()));
            changed = true;
        }
    }

    changed
}

fn difference_walk(dest: &mut Node, src: &Node) -> bool {
    let mut changed = false;

    if dest.terminator && src.terminator {
        dest.terminator = false;
        changed = true;
    }

    let mut to_drop = Vec::new();
    for (token, src_child) in src.children_iter() {
        let modified;
        let should_drop;
        {
            let Some(dest_child) = dest.find_child_exact_mut(token) else {
                continue;
            };
            modified = difference_walk(dest_child, src_child);
            should_drop = dest_child.is_empty();
        }
        changed = modified || changed;
        if should_drop {
            to_drop.push(token.clone());
        }
    }
    for token in to_drop {
        dest.remove_child_exact(&token);
    }

    if let Some(src_ellipsis) = &src.ellipsis {
        let mut should_drop = false;
        if let Some(dest_ellipsis) = dest.ellipsis.as_deref_mut() {
            if difference_walk(dest_ellipsis, src_ellipsis) {
                changed = true;
            }
            should_drop = dest_ellipsis.is_empty();
        }
        if should_drop {
            dest.ellipsis = None;
        }
    }

    changed
}

fn match_walk(node: &Node, remaining: &[Token], flags: &mut MatchFlags) {
    let Some((first, rest)) = remaining.split_first() else {
        if node.terminator {
            *flags |= MatchFlags::EXACT_MATCH;
        }
        if node.children_len() > 0 {
            *flags |= MatchFlags::DESCENDANT_MATCH;
        }
        if let Some(ellipsis) = &node.ellipsis {
            *flags |= MatchFlags::DESCENDANT_MATCH;
            if ellipsis.terminator {
                *flags |= MatchFlags::EXACT_MATCH;
            }
        }
        return;
    };

    if node.terminator {
        *flags |= MatchFlags::ANCESTOR_MATCH;
    }

    for child in node.matching_children(first.as_str()) {
        match_walk(child, rest, flags);
        if *flags == MatchFlags::EVERY_MATCH {
            return;
        }
    }

    if let Some(ellipsis) = &node.ellipsis {
        *flags |= MatchFlags::DESCENDANT_MATCH;
        if ellipsis.terminator {
            *flags |= MatchFlags::EXACT_MATCH;
        }

        // The ellipsis consumes 0..=n-1 of the remaining tokens here; the
        // case where it consumes all n (leaving nothing) is the branch
        // directly above, which is why this loop never hands it an empty
        // slice. Exact byte-for-byte replica of the conservative
        // over-approximation described in spec §9: DESCENDANT_MATCH is set
        // above even when the only "descendant" is the empty tail.
        for start in 0..remaining.len() {
            match_walk(ellipsis, &remaining[start..], flags);
            if *flags == MatchFlags::EVERY_MATCH {
                return;
            }
        }
    }
}

fn enumerate_walk(node: &Node, prefix: &mut Vec<Token>, out: &mut Vec<String>) {
    if node.terminator {
        out.push(join_path(prefix));
    }

    for (token, child) in node.children_iter() {
        prefix.push(token.clone());
        enumerate_walk(child, prefix, out);
        prefix.pop();
    }

    if let Some(ellipsis) = &node.ellipsis {
        prefix.push(Token::new(Token::ELLIPSIS));
        enumerate_walk(ellipsis, prefix, out);
        prefix.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_novelty() {
        let mut m = PathMatcher::new();
        assert!(m.insert("/a/b/c"));
        assert!(!m.insert("/a/b/c"));
    }

    #[test]
    fn remove_reports_whether_it_existed() {
        let mut m = PathMatcher::new();
        m.insert("/a/b");
        assert!(m.remove("/a/b"));
        assert!(!m.remove("/a/b"));
    }

    #[test]
    fn empty_matcher_has_no_matches() {
        let m = PathMatcher::new();
        assert_eq!(m.match_path("/a"), MatchFlags::NO_MATCH);
        assert!(m.enumerate().is_empty());
    }

    #[test]
    fn exact_ancestor_descendant() {
        let mut m = PathMatcher::new();
        m.insert("/a/b/c");

        assert_eq!(m.match_path("/a/b/c"), MatchFlags::EXACT_MATCH);
        assert_eq!(m.match_path("/a/b"), MatchFlags::DESCENDANT_MATCH);
        assert_eq!(m.match_path("/a/b/c/d"), MatchFlags::ANCESTOR_MATCH);
        assert_eq!(m.match_path("/x"), MatchFlags::NO_MATCH);
    }

    #[test]
    fn wildcard_token_matches() {
        let mut m = PathMatcher::new();
        m.insert("/a/*/c");

        assert_eq!(m.match_path("/a/b/c"), MatchFlags::EXACT_MATCH);
        assert_eq!(m.match_path("/a/bb/c"), MatchFlags::EXACT_MATCH);
        assert_eq!(m.match_path("/a/b/d"), MatchFlags::NO_MATCH);
    }

    #[test]
    fn ellipsis_matches_empty_and_nonempty_spans() {
        let mut m = PathMatcher::new();
        m.insert("/a/.../z");

        // The ellipsis node is reached on every one of these queries, so
        // DescendantMatch is set alongside ExactMatch (see the comment in
        // `match_walk`'s recursive case) even though the query is itself an
        // exact member.
        assert!(m.match_path("/a/z").contains(MatchFlags::EXACT_MATCH));
        assert!(m.match_path("/a/b/z").contains(MatchFlags::EXACT_MATCH));
        assert!(m.match_path("/a/b/c/z").contains(MatchFlags::EXACT_MATCH));
        assert_eq!(m.match_path("/a/b"), MatchFlags::DESCENDANT_MATCH);
    }

    #[test]
    fn union_and_difference() {
        let mut m1 = PathMatcher::from_paths(["/a", "/b"]);
        let m2 = PathMatcher::from_paths(["/b", "/c"]);

        assert!(m1.union_from(&m2));
        let mut enumerated: Vec<_> = m1.enumerate();
        enumerated.sort();
        assert_eq!(enumerated, vec!["/a", "/b", "/c"]);

        let to_remove = PathMatcher::from_paths(["/b"]);
        assert!(m1.difference_from(&to_remove));
        let mut enumerated: Vec<_> = m1.enumerate();
        enumerated.sort();
        assert_eq!(enumerated, vec!["/a", "/c"]);
    }

    #[test]
    fn prune_removes_subtree() {
        let mut m = PathMatcher::from_paths(["/a/b", "/a/b/c", "/a/d"]);

        assert!(m.prune("/a/b"));
        let mut enumerated: Vec<_> = m.enumerate();
        enumerated.sort();
        assert_eq!(enumerated, vec!["/a/d"]);
        assert_eq!(m.match_path("/a/b"), MatchFlags::NO_MATCH);
        assert_eq!(m.match_path("/a"), MatchFlags::DESCENDANT_MATCH);
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut original = PathMatcher::from_paths(["/a/b"]);
        let clone = original.clone();
        original.insert("/a/c");

        assert_ne!(original, clone);
        assert_eq!(clone.enumerate(), vec!["/a/b".to_string()]);
    }

    #[test]
    fn equal_matchers_compare_equal() {
        let m1 = PathMatcher::from_paths(["/a/b", "/a/c"]);
        let m2 = PathMatcher::from_paths(["/a/c", "/a/b"]);
        assert_eq!(m1, m2);
    }

    #[test]
    fn root_terminator_from_slash() {
        let mut m = PathMatcher::new();
        assert!(m.insert("/"));
        assert_eq!(m.match_path("/"), MatchFlags::EXACT_MATCH);
    }
}
