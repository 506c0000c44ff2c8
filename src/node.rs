use crate::{
    pattern::{CompiledPattern, compile_pattern, pattern_matches},
    token::Token,
};

/// A single named child of a [`Node`]: the stored token, its pattern
/// compiled once at insertion time, and the subtree reached through it.
#[derive(Debug, Clone)]
struct Child {
    token: Token,
    pattern: CompiledPattern,
    node: Box<Node>,
}

/// A single node of the trie.
///
/// Mirrors `PathMatcher::Node` in the source: a terminator flag, a set of
/// named children keyed by pattern token, and a distinguished ellipsis
/// successor. Children are kept in a flat vector rather than an ordered
/// multimap — see DESIGN.md — since the expected fan-out (tens of children
/// per node) makes the ordering a micro-optimization the spec itself
/// describes as unobservable.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub terminator: bool,
    children: Vec<Child>,
    pub ellipsis: Option<Box<Node>>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// The unique child whose stored key equals `token` as a string
    /// (invariant I2: no two children share the exact same token).
    pub fn find_child_exact(&self, token: &Token) -> Option<&Node> {
        self.children
            .iter()
            .find(|child| &child.token == token)
            .map(|child| child.node.as_ref())
    }

    pub fn find_child_exact_mut(&mut self, token: &Token) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .find(|child| &child.token == token)
            .map(|child| child.node.as_mut())
    }

    /// Get the existing exact-key child for `token`, or create and insert a
    /// fresh one.
    pub fn child_or_insert(&mut self, token: &Token) -> &mut Node {
        if let Some(index) = self.children.iter().position(|child| &child.token == token) {
            return self.children[index].node.as_mut();
        }

        let pattern = compile_pattern(token);
        self.children.push(Child {
            token: token.clone(),
            pattern,
            node: Box::new(Node::new()),
        });
        self.children.last_mut().unwrap().node.as_mut()
    }

    /// Insert a deep copy of `src_child` keyed by `token`, without checking
    /// whether an exact-key child already exists. Used by
    /// [`crate::PathMatcher::union_from`] to splice in an entire subtree
    /// from another matcher in one step.
    pub fn insert_cloned_child(&mut self, token: &Token, src_child: &Node) {
        let pattern = compile_pattern(token);
        self.children.push(Child {
            token: token.clone(),
            pattern,
            node: Box::new(src_child.clone()),
        });
    }

    /// Every child whose stored pattern token may match `literal` under
    /// [`crate::pattern::pattern_matches`]. Several children may match the
    /// same query token (e.g. both `foo` and `f*`); every one of them
    /// contributes a branch to the traversal.
    pub fn matching_children(&self, literal: &str) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(move |child| {
            pattern_matches(&child.pattern, child.token.as_str(), literal)
                .then_some(child.node.as_ref())
        })
    }

    pub fn children_len(&self) -> usize {
        self.children.len()
    }

    pub fn children_iter(&self) -> impl Iterator<Item = (&Token, &Node)> {
        self.children.iter().map(|child| (&child.token, child.node.as_ref()))
    }

    /// Drop all children and the ellipsis successor. Returns whether
    /// anything was actually dropped.
    pub fn clear_children(&mut self) -> bool {
        let had_anything = !self.children.is_empty() || self.ellipsis.is_some();
        self.children.clear();
        self.ellipsis = None;
        had_anything
    }

    /// Remove the exact-key child for `token`, if present.
    pub fn remove_child_exact(&mut self, token: &Token) {
        self.children.retain(|child| &child.token != token);
    }

    /// Invariant I1: whether this node would be pruned from its parent.
    pub fn is_empty(&self) -> bool {
        !self.terminator && self.children.is_empty() && self.ellipsis.is_none()
    }

    /// Deep structural comparison: terminator, ellipsis presence/equality,
    /// and every child (matched by stored key) recursively.
    pub fn equal(&self, other: &Node) -> bool {
        if self.terminator != other.terminator {
            return false;
        }

        if self.children.len() != other.children.len() {
            return false;
        }

        for child in &self.children {
            let Some(other_node) = other.find_child_exact(&child.token) else {
                return false;
            };
            if !child.node.equal(other_node) {
                return false;
            }
        }

        match (&self.ellipsis, &other.ellipsis) {
            (None, None) => true,
            (Some(a), Some(b)) => a.equal(b),
            _ => false,
        }
    }
}
