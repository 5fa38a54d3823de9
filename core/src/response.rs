//! Inbound response model.
//!
//! # Design
//! An `HttpResponse` is created per request and filled once from the raw
//! lines the transport received: status lines (`HTTP/1.1 200 OK`) and header
//! lines (`Name: value`). When the transport followed redirects, the lines of
//! every hop arrive in order, so the last status line wins. Nothing here ever
//! fails: a line that is neither a status line nor a header is skipped.
//!
//! The body is `None` until content is set, which keeps "nothing received"
//! apart from "received an empty body".

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::headers::{HeaderValue, ResponseHeaders};
use crate::status::reason_phrase;

static STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^HTTP/[0-9.]+\s+([0-9]+)").expect("status line pattern is valid")
});

/// Status code carried by a status line, if `line` is one.
fn parse_status_line(line: &str) -> Option<u16> {
    STATUS_LINE
        .captures(line.trim_start())
        .and_then(|caps| caps.get(1))
        .and_then(|code| code.as_str().parse().ok())
}

/// A received HTTP response: status, headers and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    status: Option<u16>,
    headers: ResponseHeaders,
    content: Option<String>,
}

impl HttpResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace status and headers with those found in `lines`.
    pub fn set_headers<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reset_headers();
        self.status = None;
        for line in lines {
            let line = line.as_ref();
            if let Some(code) = parse_status_line(line) {
                self.status = Some(code);
                continue;
            }
            match line.split_once(':') {
                Some((name, value)) if !name.trim().is_empty() => self.add_header(name, value),
                _ => tracing::trace!(line, "skipping unrecognized header line"),
            }
        }
    }

    /// Add one occurrence of a header. A repeated name becomes a list.
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.add(name, value);
    }

    pub fn reset_headers(&mut self) {
        self.headers.clear();
    }

    /// Status code from the last status line, `None` if none was seen.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    /// Stored value for `name` (case-insensitive): a single value, or the list
    /// when the header was repeated.
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Every value for `name`. A header seen once yields a one-element list.
    pub fn header_as_list(&self, name: &str) -> Option<Vec<&str>> {
        self.header(name).map(HeaderValue::values)
    }

    /// `Set-Cookie` values in arrival order.
    pub fn cookies(&self) -> Vec<&str> {
        self.header_as_list("set-cookie").unwrap_or_default()
    }

    /// Declared `Content-Length`, else the body length, else 0 when no body
    /// was ever set.
    pub fn content_length(&self) -> u64 {
        if let Some(declared) = self.header("content-length") {
            match declared.last().trim().parse() {
                Ok(length) => return length,
                Err(_) => tracing::debug!(value = %declared, "ignoring invalid content-length"),
            }
        }
        self.content.as_ref().map_or(0, |content| content.len() as u64)
    }

    /// Reason phrase for the current status, `""` when unknown or unset.
    pub fn reason_phrase(&self) -> &'static str {
        self.status.map_or("", reason_phrase)
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    /// Append a chunk, starting from an empty body if none was set.
    pub fn append_content(&mut self, chunk: &str) {
        self.content.get_or_insert_with(String::new).push_str(chunk);
    }

    pub fn reset_content(&mut self) {
        self.content = None;
    }

    pub fn body(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.body().unwrap_or(""))
    }
}
