//! I/O-free core of a small HTTP client.
//!
//! # Overview
//! Models one outbound HTTP(S) exchange with three value types: a structured
//! [`Url`], an outgoing [`HttpRequest`] builder, and an inbound
//! [`HttpResponse`] parser. The network exchange itself is performed by a
//! host-provided [`Transport`] (host-does-IO pattern), so the core is fully
//! deterministic and testable.
//!
//! # Design
//! - `HttpRequest::send` renders a [`RequestContext`] (method, target URL,
//!   header block, body, redirect policy), hands it to the transport, and
//!   feeds the raw status/header lines it gets back into a new `HttpResponse`.
//! - Header names are normalized by one function, [`normalize_name`], for
//!   both directions.
//! - Repeated response headers are a [`HeaderValue::Multiple`], never a
//!   silently overwritten value.
//! - Diagnostics go through a [`Logger`] owned by each request; there is no
//!   global debug state.
//!
//! ```
//! use minihttp_core::{HttpMethod, HttpRequest, RawResponse, RequestContext,
//!     TransportFailure, TransportOutcome};
//!
//! fn canned(_: RequestContext<'_>) -> Result<TransportOutcome, TransportFailure> {
//!     Ok(TransportOutcome::Received(RawResponse {
//!         header_lines: vec!["HTTP/1.1 200 OK".into(), "Content-Length: 2".into()],
//!         body: "hi".into(),
//!     }))
//! }
//!
//! let mut request = HttpRequest::with_url("http://www.example.com/", HttpMethod::Get)?;
//! let response = request.send(&canned)?;
//! assert_eq!(response.status(), Some(200));
//! assert_eq!(response.reason_phrase(), "OK");
//! assert_eq!(response.content_length(), 2);
//! # Ok::<(), minihttp_core::HttpError>(())
//! ```

pub mod client;
pub mod config;
pub mod debug;
pub mod error;
pub mod headers;
pub mod http;
pub mod query;
pub mod response;
pub mod status;
pub mod transport;
pub mod url;

pub use client::{HttpRequest, FORM_CONTENT_TYPE};
pub use config::RequestConfig;
pub use debug::{DebugChannel, Logger, Severity};
pub use error::HttpError;
pub use headers::{normalize_name, HeaderValue, RequestHeaders, ResponseHeaders};
pub use http::{HttpMethod, ProgressFn, RawResponse, RequestContext, TransferProgress, TransportOutcome};
pub use query::{encode_component, encode_pairs, QueryEncoding};
pub use response::HttpResponse;
pub use status::reason_phrase;
pub use transport::{Transport, TransportFailure};
pub use url::{default_port, is_supported_scheme, IntoUrl, Url};
