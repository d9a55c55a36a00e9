/// Prefixes `https://` when the user typed a bare domain.
///
/// Callers apply this before invoking the extraction pipeline; the pipeline
/// itself fetches exactly the URL it is given.
#[must_use]
pub fn normalize_site_url(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domain_gets_https() {
        assert_eq!(
            normalize_site_url("example-shop.test"),
            "https://example-shop.test"
        );
    }

    #[test]
    fn existing_scheme_is_kept() {
        assert_eq!(
            normalize_site_url("http://example.com/about"),
            "http://example.com/about"
        );
        assert_eq!(
            normalize_site_url("HTTPS://Example.com"),
            "HTTPS://Example.com"
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize_site_url("  shop.fr \n"), "https://shop.fr");
    }
}
