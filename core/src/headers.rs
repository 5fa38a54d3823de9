//! Header maps for both directions of the exchange.
//!
//! # Design
//! Header names are case-insensitive on the wire. Every lookup and insertion
//! goes through [`normalize_name`] so the outgoing map and the response map
//! can never disagree about what "the same header" means.
//!
//! Outgoing headers hold exactly one value per name (a later `set` replaces
//! the earlier one) and render with the name as the caller last spelled it.
//! Neither part may contain a line break. Response headers may legally repeat (`Set-Cookie`), so
//! they are stored as a [`HeaderValue`]: a single value until the name is
//! seen a second time, then an ordered list.

use std::fmt;

use indexmap::IndexMap;

use crate::error::HttpError;

/// Trim and lower-case a header name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// A response header value: one occurrence or several, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Single(String),
    Multiple(Vec<String>),
}

impl HeaderValue {
    /// Record another occurrence, promoting a single value to a list.
    pub fn push(&mut self, value: String) {
        match self {
            HeaderValue::Single(first) => {
                let first = std::mem::take(first);
                *self = HeaderValue::Multiple(vec![first, value]);
            }
            HeaderValue::Multiple(values) => values.push(value),
        }
    }

    /// The value when the header was seen exactly once.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            HeaderValue::Single(value) => Some(value),
            HeaderValue::Multiple(_) => None,
        }
    }

    /// Every occurrence in arrival order. A single value yields a one-element list.
    pub fn values(&self) -> Vec<&str> {
        match self {
            HeaderValue::Single(value) => vec![value.as_str()],
            HeaderValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// The most recent occurrence.
    pub fn last(&self) -> &str {
        match self {
            HeaderValue::Single(value) => value,
            HeaderValue::Multiple(values) => values.last().map(String::as_str).unwrap_or(""),
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Single(value) => f.write_str(value),
            HeaderValue::Multiple(values) => f.write_str(&values.join(", ")),
        }
    }
}

/// Headers received with a response, keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    map: IndexMap<String, HeaderValue>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `name`. Both name and value are trimmed.
    pub fn add(&mut self, name: &str, value: &str) {
        let name = normalize_name(name);
        let value = value.trim().to_string();
        match self.map.get_mut(&name) {
            Some(existing) => existing.push(value),
            None => {
                self.map.insert(name, HeaderValue::Single(value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.map.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&normalize_name(name))
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterate in first-arrival order of each name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.map.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Headers to send with a request, one value per normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    // normalized name -> (name as given, value)
    map: IndexMap<String, (String, String)>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any earlier value in place.
    ///
    /// Fails with [`HttpError::InvalidHeader`] when the name is empty or
    /// contains `:`, or when either part contains CR or LF.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), HttpError> {
        let value = value.into();
        check_line(name, &value)?;
        self.insert(name, value);
        Ok(())
    }

    /// Unchecked `set`, for values the request builder computes itself.
    pub(crate) fn insert(&mut self, name: &str, value: String) {
        self.map
            .insert(normalize_name(name), (name.trim().to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&normalize_name(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&normalize_name(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.map
            .shift_remove(&normalize_name(name))
            .map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// `(name as given, value)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map
            .values()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render the header block, one `Name: value\r\n` line per header.
    pub fn render(&self) -> String {
        let mut block = String::new();
        for (name, value) in self.iter() {
            block.push_str(name);
            block.push_str(": ");
            block.push_str(value);
            block.push_str("\r\n");
        }
        block
    }
}

fn check_line(name: &str, value: &str) -> Result<(), HttpError> {
    let name = name.trim();
    if name.is_empty() || name.contains(|c: char| matches!(c, ':' | '\r' | '\n')) {
        return Err(HttpError::InvalidHeader(format!("bad header name {name:?}")));
    }
    if value.contains(|c: char| matches!(c, '\r' | '\n')) {
        return Err(HttpError::InvalidHeader(format!("line break in value of {name}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_name("  Content-Type "), "content-type");
        assert_eq!(normalize_name("SET-COOKIE"), "set-cookie");
    }

    #[test]
    fn repeated_response_header_is_promoted_to_list() {
        let mut headers = ResponseHeaders::new();
        headers.add("Set-Cookie", " a=1");
        assert_eq!(headers.get("set-cookie"), Some(&HeaderValue::Single("a=1".to_string())));

        headers.add("set-cookie", "b=2 ");
        headers.add("SET-COOKIE", "c=3");
        assert_eq!(
            headers.get("Set-Cookie"),
            Some(&HeaderValue::Multiple(vec![
                "a=1".to_string(),
                "b=2".to_string(),
                "c=3".to_string()
            ]))
        );
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn header_value_accessors() {
        let single = HeaderValue::Single("x".to_string());
        assert_eq!(single.as_single(), Some("x"));
        assert_eq!(single.values(), vec!["x"]);
        assert_eq!(single.last(), "x");

        let multiple = HeaderValue::Multiple(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(multiple.as_single(), None);
        assert_eq!(multiple.values(), vec!["x", "y"]);
        assert_eq!(multiple.last(), "y");
        assert_eq!(multiple.to_string(), "x, y");
    }

    #[test]
    fn request_header_overwrites_case_insensitively() {
        let mut headers = RequestHeaders::new();
        headers.set("Accept", "text/html").unwrap();
        headers.set("User-Agent", "test").unwrap();
        headers.set("ACCEPT", "application/json").unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("accept"), Some("application/json"));
        assert_eq!(headers.render(), "ACCEPT: application/json\r\nUser-Agent: test\r\n");
    }

    #[test]
    fn request_header_remove_keeps_order_of_the_rest() {
        let mut headers = RequestHeaders::new();
        headers.set("a", "1").unwrap();
        headers.set("b", "2").unwrap();
        headers.set("c", "3").unwrap();
        assert_eq!(headers.remove("B"), Some("2".to_string()));
        assert_eq!(headers.render(), "a: 1\r\nc: 3\r\n");
        assert_eq!(headers.remove("missing"), None);
    }

    #[test]
    fn request_header_rejects_line_breaks() {
        let mut headers = RequestHeaders::new();
        headers.set("Host", "example.com").unwrap();

        for (name, value) in [
            ("X-A", "1\r\nHost: evil.example"),
            ("X-A", "1\nHost: evil.example"),
            ("X-A\r\nHost", "evil.example"),
            ("X-A: b", "1"),
            ("  ", "1"),
        ] {
            assert!(
                matches!(headers.set(name, value), Err(HttpError::InvalidHeader(_))),
                "{name:?}: {value:?}"
            );
        }
        assert_eq!(headers.render(), "Host: example.com\r\n");
    }

    #[test]
    fn request_header_names_keep_their_spelling() {
        let mut headers = RequestHeaders::new();
        headers.set(" X-Trace-ID ", "1").unwrap();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec![("X-Trace-ID", "1")]);
        assert_eq!(headers.get("x-trace-id"), Some("1"));
    }
}
