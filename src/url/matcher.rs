use regex::Regex;

/// Translates a robots.txt wildcard into an anchored regular expression
///
/// `*` matches any run of characters, `?` matches exactly one character and
/// everything else is matched literally.
///
/// # Examples
///
/// ```
/// use wiki_ripple::url::wildcard_to_regex;
///
/// assert_eq!(wildcard_to_regex("*bot*"), "^.*bot.*$");
/// assert_eq!(wildcard_to_regex("a.c"), "^a\\.c$");
/// ```
pub fn wildcard_to_regex(wildcard: &str) -> String {
    let mut pattern = String::with_capacity(wildcard.len() + 2);
    pattern.push('^');
    for ch in wildcard.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    pattern
}

/// Checks whether `candidate` matches the wildcard `pattern` in full
///
/// Matching is case-sensitive.
///
/// # Examples
///
/// ```
/// use wiki_ripple::url::matches_wildcard;
///
/// assert!(matches_wildcard("*bot*", "examplebot"));
/// assert!(matches_wildcard("a?c", "abc"));
/// assert!(!matches_wildcard("a?c", "abbc"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    Regex::new(&wildcard_to_regex(pattern))
        .map(|re| re.is_match(candidate))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_matches_any_run() {
        assert!(matches_wildcard("*bot*", "examplebot"));
        assert!(matches_wildcard("*bot*", "bot"));
        assert!(matches_wildcard("*bot*", "robotics"));
        assert!(matches_wildcard("*", ""));
        assert!(matches_wildcard("*", "wiki-ripple"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        assert!(matches_wildcard("a?c", "abc"));
        assert!(!matches_wildcard("a?c", "ac"));
        assert!(!matches_wildcard("a?c", "abbc"));
    }

    #[test]
    fn test_anchored_at_both_ends() {
        assert!(!matches_wildcard("bot", "examplebot"));
        assert!(!matches_wildcard("bot", "bots"));
        assert!(matches_wildcard("bot", "bot"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        assert!(matches_wildcard("a.c", "a.c"));
        assert!(!matches_wildcard("a.c", "abc"));
        assert!(matches_wildcard("bot(1)+", "bot(1)+"));
        assert!(!matches_wildcard("bot(1)+", "bot11"));
        assert!(matches_wildcard("[x]|$^", "[x]|$^"));
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(!matches_wildcard("Googlebot", "googlebot"));
    }

    #[test]
    fn test_wildcard_to_regex_shape() {
        assert_eq!(wildcard_to_regex("*"), "^.*$");
        assert_eq!(wildcard_to_regex("a?c"), "^a.c$");
        assert_eq!(wildcard_to_regex("x+y"), "^x\\+y$");
    }
}
