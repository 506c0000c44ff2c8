use bitflags::bitflags;

bitflags! {
    /// Categories of relationship a query path can have to the members of a
    /// [`crate::PathMatcher`](crate::PathMatcher), returned by
    /// [`PathMatcher::match_path`](crate::PathMatcher::match_path).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MatchFlags: u8 {
        /// The query path is itself a member of the stored set.
        const EXACT_MATCH = 1 << 0;
        /// Some strict ancestor of the query path is a member.
        const ANCESTOR_MATCH = 1 << 1;
        /// Some strict descendant of the query path is a member.
        const DESCENDANT_MATCH = 1 << 2;
    }
}

impl MatchFlags {
    /// The zero value: the query path is unrelated to every member.
    pub const NO_MATCH: Self = Self::empty();

    /// All three match categories set, used to short-circuit traversal once
    /// nothing further can be learned.
    pub const EVERY_MATCH: Self =
        Self::EXACT_MATCH.union(Self::ANCESTOR_MATCH).union(Self::DESCENDANT_MATCH);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_match_is_all_three_bits() {
        assert_eq!(
            MatchFlags::EVERY_MATCH,
            MatchFlags::EXACT_MATCH | MatchFlags::ANCESTOR_MATCH | MatchFlags::DESCENDANT_MATCH
        );
    }

    #[test]
    fn no_match_is_empty() {
        assert!(MatchFlags::NO_MATCH.is_empty());
        assert_eq!(MatchFlags::default(), MatchFlags::NO_MATCH);
    }
}
