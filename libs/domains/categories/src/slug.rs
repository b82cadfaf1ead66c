//! URL slug derivation for category names.

use regex::Regex;
use std::sync::LazyLock;

static NON_ALPHANUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Derive the URL slug for a category name.
///
/// Apostrophes are dropped so possessives stay one word, the rest is
/// lowercased, every run of characters outside `[a-z0-9]` becomes a single
/// `-`, and leading/trailing hyphens are trimmed.
///
/// ```
/// use domain_categories::slug::derive_slug;
///
/// assert_eq!(derive_slug("Men's Shoes!!"), "mens-shoes");
/// ```
///
/// The result can be empty when the name has no ASCII alphanumerics.
pub fn derive_slug(name: &str) -> String {
    let without_apostrophes: String = name
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}'))
        .collect();
    let lowered = without_apostrophes.to_lowercase();

    NON_ALPHANUMERIC_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_possessive_and_punctuation() {
        assert_eq!(derive_slug("Men's Shoes!!"), "mens-shoes");
        assert_eq!(derive_slug("Women\u{2019}s Bags"), "womens-bags");
    }

    #[test]
    fn test_runs_collapse_to_single_hyphen() {
        assert_eq!(derive_slug("Home  &  Garden"), "home-garden");
        assert_eq!(derive_slug("TV / Audio -- Video"), "tv-audio-video");
    }

    #[test]
    fn test_edges_are_trimmed() {
        assert_eq!(derive_slug("  --Books--  "), "books");
        assert_eq!(derive_slug("(Kids)"), "kids");
    }

    #[test]
    fn test_digits_are_kept() {
        assert_eq!(derive_slug("4K TVs 2024"), "4k-tvs-2024");
    }

    #[test]
    fn test_no_alphanumerics_yields_empty() {
        assert_eq!(derive_slug("!!!"), "");
        assert_eq!(derive_slug("   "), "");
    }

    #[test]
    fn test_idempotent() {
        for name in ["Men's Shoes!!", "Home & Garden", "  a--b  ", "4K TVs", "x"] {
            let once = derive_slug(name);
            assert_eq!(derive_slug(&once), once, "not idempotent for {:?}", name);
        }
    }
}
