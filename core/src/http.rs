//! Transport-facing data types for the host-does-IO pattern.
//!
//! # Design
//! The core renders a [`RequestContext`] and hands it to a host-provided
//! [`Transport`](crate::Transport). The transport performs the exchange and
//! returns the raw lines and body it received, which the core then parses.
//! Nothing here touches the network.

use std::fmt;
use std::str::FromStr;

use crate::error::HttpError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = HttpError;

    /// Case-insensitive. Anything but GET or POST is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(HttpError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Bytes moved so far, reported by the transport during a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub transferred: u64,
    /// Expected total, when the peer announced one.
    pub total: Option<u64>,
}

impl TransferProgress {
    /// Percentage complete (0-100), if the total is known.
    pub fn percent(&self) -> Option<u8> {
        self.total.map(|total| {
            if total == 0 {
                100
            } else {
                (self.transferred.min(total) * 100 / total) as u8
            }
        })
    }
}

/// Progress callback invoked by the transport while transferring.
pub type ProgressFn = dyn FnMut(TransferProgress) + Send;

/// Everything a transport needs to perform one exchange.
pub struct RequestContext<'a> {
    pub method: HttpMethod,
    /// Canonical target URL.
    pub url: String,
    /// Header block, one `name: value\r\n` line per header.
    pub header: String,
    pub body: String,
    pub protocol_version: &'static str,
    pub follow_location: bool,
    pub max_redirects: u32,
    pub progress: Option<&'a mut ProgressFn>,
}

impl RequestContext<'_> {
    /// The header block split back into `(name, value)` pairs.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header.split("\r\n").filter_map(|line| {
            line.split_once(':')
                .map(|(name, value)| (name.trim(), value.trim()))
        })
    }

    /// Forward a progress report to the callback, if one is registered.
    pub fn notify(&mut self, progress: TransferProgress) {
        if let Some(callback) = self.progress.as_deref_mut() {
            callback(progress);
        }
    }
}

impl fmt::Debug for RequestContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("header", &self.header)
            .field("body", &self.body)
            .field("protocol_version", &self.protocol_version)
            .field("follow_location", &self.follow_location)
            .field("max_redirects", &self.max_redirects)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// What the transport received: raw status/header lines and the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// Status and header lines exactly as received, across every redirect hop.
    pub header_lines: Vec<String>,
    pub body: String,
}

/// Result of a transport exchange that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    Received(RawResponse),
    /// The transport completed but produced nothing at all. Distinct from an
    /// empty body.
    NoData,
}
