use std::fmt;

use regex::Regex;

use crate::Result;

/// Which archive entries an operation applies to.
#[derive(Clone, Debug, Default)]
pub enum Selector {
    /// The first entry whose name equals this string exactly.
    Exact(String),
    /// Every entry whose name contains a match for the expression.
    Pattern(Regex),
    /// Every entry.
    #[default]
    All,
}

impl Selector {
    /// Compile `pattern` into a [`Selector::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    pub fn matches(&self, full_name: &str) -> bool {
        match self {
            Self::Exact(name) => name == full_name,
            Self::Pattern(regex) => regex.is_match(full_name),
            Self::All => true,
        }
    }

    /// Exact lookups end the scan at their first hit.
    pub fn stops_at_first_match(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            Self::All => f.write_str("/.*/"),
        }
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Self::Exact(name.to_owned())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Self::Exact(name)
    }
}

impl From<&String> for Selector {
    fn from(name: &String) -> Self {
        Self::Exact(name.clone())
    }
}

impl From<Regex> for Selector {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_is_full_equality() {
        let selector = Selector::from("testing1.md");
        assert!(selector.matches("testing1.md"));
        assert!(!selector.matches("docs/testing1.md"));
        assert!(!selector.matches("Testing1.md"));
        assert!(selector.stops_at_first_match());
    }

    #[test]
    fn pattern_is_unanchored() {
        let selector = Selector::pattern(r"testing\d\.md").unwrap();
        assert!(selector.matches("testing1.md"));
        assert!(selector.matches("docs/testing2.md"));
        assert!(!selector.matches("testing.md"));
        assert!(!selector.stops_at_first_match());
    }

    #[test]
    fn all_matches_everything() {
        let selector = Selector::default();
        assert!(selector.matches(""));
        assert!(selector.matches("any/thing"));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Selector::from("foobarbaz").to_string(), "foobarbaz");
        assert_eq!(
            Selector::pattern(r"drunken/noodle").unwrap().to_string(),
            "/drunken/noodle/"
        );
        assert_eq!(Selector::All.to_string(), "/.*/");
    }

    #[test]
    fn invalid_pattern() {
        assert!(matches!(
            Selector::pattern("("),
            Err(crate::Error::InvalidPattern(_))
        ));
    }
}
