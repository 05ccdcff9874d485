use crate::UrlError;
use url::Url;

/// Reduces a URL to its canonical form: scheme, host, port and path
///
/// Query and fragment are dropped. The canonical form is the key for the
/// shared visited set and for frontier entries.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wiki_ripple::url::canonicalize;
///
/// let url = Url::parse("https://en.wikipedia.org/wiki/Rust?oldid=1#History").unwrap();
/// assert_eq!(canonicalize(&url), "https://en.wikipedia.org/wiki/Rust");
/// ```
pub fn canonicalize(url: &Url) -> String {
    let mut canonical = url.clone();
    canonical.set_query(None);
    canonical.set_fragment(None);
    canonical.to_string()
}

/// Parses a URL and checks that it is HTTP(S) with a host
pub fn parse_http_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Decodes a percent-encoded path the way form data is decoded
///
/// `+` becomes a space and `%XX` escapes become bytes. Byte sequences that are
/// not valid UTF-8 are replaced with U+FFFD instead of failing.
///
/// # Examples
///
/// ```
/// use wiki_ripple::url::decode_path;
///
/// assert_eq!(decode_path("/wiki/A+B"), "/wiki/A B");
/// assert_eq!(decode_path("/wiki/C%2B%2B"), "/wiki/C++");
/// ```
pub fn decode_path(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}
