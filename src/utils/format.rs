use std::cmp::Ordering;

/// Case-insensitive ordering for list sorting
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Case-insensitive substring match for in-memory filtering
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Redact a bearer token for display: first 8 characters, then ellipsis.
/// Tokens never appear whole in logs or status output.
pub fn redact_token(token: &str) -> String {
    truncate(token, 11)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_ignore_case() {
        assert_eq!(cmp_ignore_case("apple", "Banana"), Ordering::Less);
        assert_eq!(cmp_ignore_case("Zebra", "apple"), Ordering::Greater);
        assert_eq!(cmp_ignore_case("Word", "word"), Ordering::Equal);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Serendipity", "DIP"));
        assert!(!contains_ignore_case("Serendipity", "xyz"));
        assert!(contains_ignore_case("anything", ""));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
    }

    #[test]
    fn test_redact_token_never_shows_whole_token() {
        let redacted = redact_token("eyJhbGciOiJIUzI1NiJ9.payload.sig");
        assert!(redacted.ends_with("..."));
        assert!(!redacted.contains("payload"));
    }
}
