// Canonical identity keys for domains and crypto addresses

/// Normalize a raw domain string into its identity key.
///
/// Lowercases, trims, drops an `http://` or `https://` prefix and a leading
/// `www.`, then one trailing `/`. An empty string means "no entity".
pub fn normalize_domain(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);

    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);

    let key = without_www.strip_suffix('/').unwrap_or(without_www);
    key.trim().to_string()
}

/// Normalize an optional cell; absent cells map to the empty key.
pub fn normalize_optional_domain(raw: Option<&str>) -> String {
    raw.map(normalize_domain).unwrap_or_default()
}

/// Crypto addresses keep their case, many chains encode checksums in it.
pub fn normalize_crypto_address(raw: &str) -> String {
    raw.trim().to_string()
}

/// Split a comma-separated domain cell into normalized, non-empty keys.
pub fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_domain)
        .filter(|domain| !domain.is_empty())
        .collect()
}

/// Split a comma-separated address cell into trimmed, non-empty addresses.
pub fn parse_crypto_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_crypto_address)
        .filter(|address| !address.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_www_and_trailing_slash() {
        assert_eq!(normalize_domain("HTTPS://WWW.Example.com/"), "example.com");
        assert_eq!(normalize_domain("http://example.com"), "example.com");
        assert_eq!(normalize_domain("  www.example.com  "), "example.com");
    }

    #[test]
    fn only_one_trailing_slash_is_removed() {
        assert_eq!(normalize_domain("example.com//"), "example.com/");
    }

    #[test]
    fn empty_and_blank_inputs_have_no_identity() {
        assert_eq!(normalize_domain(""), "");
        assert_eq!(normalize_domain("   "), "");
        assert_eq!(normalize_domain("https://"), "");
        assert_eq!(normalize_optional_domain(None), "");
    }

    #[test]
    fn crypto_addresses_keep_case() {
        assert_eq!(normalize_crypto_address("  1A2b3C "), "1A2b3C");
        assert_eq!(parse_crypto_list("1A2b3C, ,0xAbC"), vec!["1A2b3C", "0xAbC"]);
    }
}
