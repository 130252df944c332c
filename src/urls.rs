/// URL admission rules and internal marker pages
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static HTTP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("static regex"));

/// Page shown as the last tab of every opened batch
pub const BATCH_END_PAGE: &str = "/html/batchEnd.html";

/// Page that displays the `message` query parameter
pub const MESSAGE_PAGE: &str = "/html/messagePage.html";

pub const END_OF_STASH_MESSAGE: &str = "End of Stash";

/// Permissive check used when filtering lists: the string only has to
/// begin with "http://" or "https://".
pub fn is_url(s: &str) -> bool {
    !s.is_empty() && HTTP_PREFIX.is_match(s)
}

/// Strict check used when admitting a single URL into the Stash.
///
/// The string must parse as an absolute URL with an http(s) scheme and a host.
pub fn is_well_formed_url(s: &str) -> bool {
    if !is_url(s) {
        return false;
    }

    match Url::parse(s) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.has_host(),
        Err(_) => false,
    }
}

/// Strip the query string (and anything after it) from a URL
pub fn sanitize_url(s: &str) -> String {
    match s.split_once('?') {
        Some((head, _)) => head.to_string(),
        None => s.to_string(),
    }
}

/// Remove duplicates, keeping the first occurrence of each entry
pub fn deduplicate(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Marker URL telling the user they reached the end of batch `batch`
pub fn batch_end_url(batch: u32) -> String {
    format!("{}?batch={}", BATCH_END_PAGE, batch)
}

/// Marker URL for the message page
pub fn message_page_url(message: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("message", message)
        .finish();
    format!("{}?{}", MESSAGE_PAGE, query)
}

pub fn end_of_stash_url() -> String {
    message_page_url(END_OF_STASH_MESSAGE)
}

/// Read one query parameter out of a page search string like "?batch=3"
pub fn query_param(search: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
