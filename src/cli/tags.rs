//! Parsing of comma-separated `key=value` tag flags

use std::collections::HashMap;

/// Split a tag flag such as `host=localhost,region=eu` into a map.
///
/// Empty segments are skipped. If any segment is not exactly one `key=value`
/// pair with a non-empty key, the whole flag is rejected and the map is empty.
///
/// # Examples
///
/// ```
/// use nodeflags::cli::tags::split_tags_flag;
///
/// let tags = split_tags_flag("host=localhost,bzzkey=123");
/// assert_eq!(tags.get("host").map(String::as_str), Some("localhost"));
/// assert_eq!(tags.get("bzzkey").map(String::as_str), Some("123"));
///
/// assert!(split_tags_flag("smth=smthelse=123").is_empty());
/// ```
pub fn split_tags_flag(tags_flag: &str) -> HashMap<String, String> {
    let mut tags = HashMap::new();

    for segment in tags_flag.split(',').filter(|s| !s.is_empty()) {
        let mut parts = segment.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) if !key.is_empty() => {
                tags.insert(key.to_string(), value.to_string());
            }
            _ => return HashMap::new(),
        }
    }

    tags
}
