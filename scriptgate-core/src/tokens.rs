use std::collections::HashSet;

/// An unordered set of opaque bearer tokens.
///
/// Parsed from newline-delimited text: each line is trimmed, blank lines are
/// skipped and duplicates collapse. A `TokenSet` is never patched in place;
/// a reload builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: HashSet<String>,
}

impl TokenSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a token file's contents.
    ///
    /// # Complexity
    /// O(n) in the length of `text`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Returns `true` if `token` is a member of the set.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the set holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<String> for TokenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self { tokens: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_skips_blank_lines() {
        let set = TokenSet::parse("  abc  \n\n\t\ndef\r\n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("abc"));
        assert!(set.contains("def"));
        assert!(!set.contains("  abc  "), "lookup is on trimmed values only");
    }

    #[test]
    fn parse_collapses_duplicates() {
        let set = TokenSet::parse("abc\nabc\n abc\n");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_text_yields_empty_set() {
        assert!(TokenSet::parse("").is_empty());
        assert!(TokenSet::parse("\n  \n").is_empty());
        assert!(!TokenSet::parse("\n  \n").contains(""));
    }

    proptest::proptest! {
        #[test]
        fn proptest_every_listed_token_is_contained(
            tokens in proptest::collection::vec("[A-Za-z0-9_-]{1,24}", 0..32usize),
        ) {
            let text = tokens.join("\n");
            let set = TokenSet::parse(&text);
            for t in &tokens {
                proptest::prop_assert!(set.contains(t), "token {t} must be present");
            }
            proptest::prop_assert!(set.len() <= tokens.len());
        }

        #[test]
        fn proptest_unlisted_token_is_absent(
            tokens in proptest::collection::vec("[a-z]{1,12}", 0..16usize),
            probe in "[A-Z]{1,12}",
        ) {
            let set = TokenSet::parse(&tokens.join("\n"));
            proptest::prop_assert!(!set.contains(&probe));
        }
    }
}
