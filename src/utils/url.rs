//! URL helpers for building chat service endpoints.

/// Strip trailing slashes so endpoint paths can be appended safely.
///
/// ```
/// use parley::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// ```
/// use parley::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/chat"),
///     "http://localhost:8000/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        normalize_base_url(base_url),
        endpoint.trim_start_matches('/')
    )
}

/// Check that a user-supplied base URL is an absolute http(s) URL.
pub fn validate_base_url(base_url: &str) -> Result<String, String> {
    let normalized = normalize_base_url(base_url);
    let parsed = reqwest::Url::parse(&normalized)
        .map_err(|err| format!("invalid URL '{base_url}': {err}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(normalized),
        other => Err(format!(
            "unsupported URL scheme '{other}' in '{base_url}' (expected http or https)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_every_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:8000///"),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("  https://chat.example.com/api/ "),
            "https://chat.example.com/api"
        );
        assert_eq!(normalize_base_url("/"), "");
    }

    #[test]
    fn construct_joins_with_single_slash() {
        assert_eq!(
            construct_api_url("http://localhost:8000", "chat"),
            "http://localhost:8000/chat"
        );
        assert_eq!(
            construct_api_url("https://chat.example.com/api/", "//health"),
            "https://chat.example.com/api/health"
        );
    }

    #[test]
    fn validate_accepts_http_and_https() {
        assert_eq!(
            validate_base_url("http://127.0.0.1:8000/").as_deref(),
            Ok("http://127.0.0.1:8000")
        );
        assert!(validate_base_url("https://chat.example.com").is_ok());
    }

    #[test]
    fn validate_rejects_relative_and_foreign_schemes() {
        assert!(validate_base_url("localhost:8000/chat").is_err());
        assert!(validate_base_url("not a url").is_err());
        let err = validate_base_url("ftp://files.example.com").unwrap_err();
        assert!(err.contains("ftp"));
    }
}
