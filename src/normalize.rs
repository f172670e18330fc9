use url::Url;

use crate::template::{Method, TargetProbeSpec};

const HTTPS_PORT: &str = "443";
const DEFAULT_PORT: &str = "80";

/// Parse a free-text URL into a structured probe target.
///
/// The port falls back to 443 for `https` and to 80 for every other scheme.
/// A non-default port written in the URL stays on the host part of `url`.
/// Query string and fragment are dropped.
pub fn normalize(raw: &str) -> Result<TargetProbeSpec, url::ParseError> {
    normalize_with_method(raw, Method::default())
}

/// Same as [`normalize`], carrying over the method chosen by the operator
pub fn normalize_with_method(raw: &str, method: Method) -> Result<TargetProbeSpec, url::ParseError> {
    let parsed = Url::parse(raw.trim())?;

    let protocol = parsed.scheme().to_string();
    let host = match parsed.port() {
        Some(port) => format!("{}:{}", parsed.host_str().unwrap_or_default(), port),
        None => parsed.host_str().unwrap_or_default().to_string(),
    };
    let port = match parsed.port() {
        Some(port) => port.to_string(),
        None if protocol == "https" => HTTPS_PORT.to_string(),
        None => DEFAULT_PORT.to_string(),
    };

    Ok(TargetProbeSpec {
        url: format!("{}{}", host, parsed.path()),
        method,
        port,
        protocol,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_default_port() {
        let spec = normalize("https://a.b/p").unwrap();
        assert_eq!(spec.protocol, "https");
        assert_eq!(spec.url, "a.b/p");
        assert_eq!(spec.port, "443");
    }

    #[test]
    fn test_explicit_port() {
        let spec = normalize("http://a.b:8080/p").unwrap();
        assert_eq!(spec.protocol, "http");
        assert_eq!(spec.url, "a.b:8080/p");
        assert_eq!(spec.port, "8080");
    }

    #[test]
    fn test_non_https_schemes_default_to_80() {
        assert_eq!(normalize("ftp://a.b/p").unwrap().port, "80");
        assert_eq!(normalize("http://a.b/p").unwrap().port, "80");
        assert_eq!(normalize("ws://a.b/").unwrap().port, "80");
    }

    #[test]
    fn test_default_port_written_out_is_dropped_from_url() {
        let spec = normalize("https://a.b:443/p").unwrap();
        assert_eq!(spec.url, "a.b/p");
        assert_eq!(spec.port, "443");
    }

    #[test]
    fn test_query_and_fragment_dropped() {
        let spec = normalize("https://a.b/search?q=1#top").unwrap();
        assert_eq!(spec.url, "a.b/search");
    }

    #[test]
    fn test_bare_host_gets_root_path() {
        assert_eq!(normalize("https://example.com").unwrap().url, "example.com/");
    }

    #[test]
    fn test_invalid_url() {
        assert!(normalize("not a url").is_err());
        assert!(normalize("").is_err());
    }

    #[test]
    fn test_method_carried_over() {
        let spec = normalize_with_method("https://a.b", Method::Post).unwrap();
        assert_eq!(spec.method, Method::Post);
    }
}
