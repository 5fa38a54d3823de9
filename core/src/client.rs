//! Outgoing request builder.
//!
//! # Design
//! `HttpRequest` owns the target [`Url`], the method, the outgoing headers,
//! the body and the redirect policy. [`HttpRequest::send`] renders them into a
//! [`RequestContext`], hands it to a host-provided [`Transport`], and parses
//! what comes back into a fresh [`HttpResponse`]. The previous response is
//! discarded on every send and on every configuration change.
//!
//! `Content-Length` always matches the current body: every body mutation
//! rewrites it, and removing headers never drops it. `Host` is computed from
//! the URL right before dispatch, after the URL has been checked.

use std::fmt;

use crate::config::RequestConfig;
use crate::debug::Logger;
use crate::error::HttpError;
use crate::headers::RequestHeaders;
use crate::http::{HttpMethod, ProgressFn, RequestContext, TransferProgress, TransportOutcome};
use crate::query::{encode_pairs, QueryEncoding};
use crate::response::HttpResponse;
use crate::transport::Transport;
use crate::url::{is_supported_scheme, IntoUrl, Url};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A single outbound HTTP request and, once sent, its response.
pub struct HttpRequest {
    url: Option<Url>,
    method: HttpMethod,
    headers: RequestHeaders,
    content: String,
    config: RequestConfig,
    progress: Option<Box<ProgressFn>>,
    logger: Logger,
    response: Option<HttpResponse>,
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRequest {
    /// A GET request with no URL, no headers and an empty body.
    pub fn new() -> Self {
        let mut request = Self {
            url: None,
            method: HttpMethod::Get,
            headers: RequestHeaders::new(),
            content: String::new(),
            config: RequestConfig::default(),
            progress: None,
            logger: Logger::default(),
            response: None,
        };
        request.set_content("");
        request
    }

    pub fn with_url(url: impl IntoUrl, method: HttpMethod) -> Result<Self, HttpError> {
        let mut request = Self::new();
        request.set_url(url)?;
        request.set_http_method(method);
        Ok(request)
    }

    /// Replace the diagnostic logger.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    // -- url ------------------------------------------------------------

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Set the target from a string (parsed) or a `Url`.
    pub fn set_url(&mut self, url: impl IntoUrl) -> Result<(), HttpError> {
        let url = url.into_url()?;
        self.logger.info(&format!("url set to {url}"));
        self.url = Some(url);
        self.response = None;
        Ok(())
    }

    // -- method ---------------------------------------------------------

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Set the method by name, case-insensitively. Only GET and POST are accepted.
    pub fn set_method(&mut self, method: &str) -> Result<(), HttpError> {
        let method = method.parse()?;
        self.set_http_method(method);
        Ok(())
    }

    /// POST also sets a form `Content-Type` unless one is already present.
    pub fn set_http_method(&mut self, method: HttpMethod) {
        self.logger.info(&format!("setting method to {method}"));
        if method == HttpMethod::Post && !self.headers.contains("content-type") {
            self.headers
                .insert("Content-Type", FORM_CONTENT_TYPE.to_string());
        }
        self.method = method;
        self.response = None;
    }

    // -- headers --------------------------------------------------------

    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Fails with [`HttpError::InvalidHeader`] if the header would not fit on
    /// one line; the header set is left unchanged.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) -> Result<(), HttpError> {
        let value = value.into();
        if let Err(e) = self.headers.set(name, value.as_str()) {
            self.logger.error(&format!("rejected header {name:?}: {e}"));
            return Err(e);
        }
        self.logger.info(&format!("setting header: {name}: {value}"));
        self.response = None;
        Ok(())
    }

    /// Set several headers at once. Later pairs win over earlier ones; the
    /// first invalid pair stops the walk.
    pub fn set_headers<I, K, V>(&mut self, headers: I) -> Result<(), HttpError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.set_header(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Remove one header. `Content-Length` is tied to the body and stays.
    pub fn remove_header(&mut self, name: &str) {
        self.headers.remove(name);
        self.sync_content_length();
        self.response = None;
    }

    /// Drop every header except `Content-Length`.
    pub fn reset_headers(&mut self) {
        self.headers.clear();
        self.sync_content_length();
        self.response = None;
    }

    pub fn set_content_type(&mut self, content_type: &str) -> Result<(), HttpError> {
        self.set_header("Content-Type", content_type)
    }

    pub fn set_user_agent(&mut self, user_agent: &str) -> Result<(), HttpError> {
        self.set_header("User-Agent", user_agent)
    }

    // -- body -----------------------------------------------------------

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Set the body and rewrite `Content-Length` to its byte length.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.sync_content_length();
        self.response = None;
    }

    fn sync_content_length(&mut self) {
        self.headers
            .insert("Content-Length", self.content.len().to_string());
    }

    /// Form-encode `values` (space as `+`) and use the result as the body.
    pub fn set_post_values<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.set_content(encode_pairs(values, QueryEncoding::Rfc1738));
    }

    // -- configuration --------------------------------------------------

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Set one configuration key, e.g. `set_config("follow_redirects", true)`.
    pub fn set_config(
        &mut self,
        name: &str,
        value: impl Into<serde_json::Value>,
    ) -> Result<(), HttpError> {
        self.config.set(name, &value.into())?;
        self.response = None;
        Ok(())
    }

    /// Set every key of a JSON object.
    pub fn set_configs(&mut self, values: &serde_json::Value) -> Result<(), HttpError> {
        self.config.set_all(values)?;
        self.response = None;
        Ok(())
    }

    pub fn apply_config(&mut self, config: RequestConfig) {
        self.config = config;
        self.response = None;
    }

    /// Register a callback the transport invokes while transferring.
    pub fn set_progress_callback<F>(&mut self, callback: F)
    where
        F: FnMut(TransferProgress) + Send + 'static,
    {
        self.progress = Some(Box::new(callback));
    }

    pub fn clear_progress_callback(&mut self) {
        self.progress = None;
    }

    // -- exchange -------------------------------------------------------

    /// The response from the last successful `send`, if still current.
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    /// Check the URL, set `Host` from it and render the transport context.
    ///
    /// A URL assembled from parts may still lack a supported scheme or a
    /// host; such a request never reaches the transport.
    pub fn render(&mut self) -> Result<RequestContext<'_>, HttpError> {
        let url = self.url.as_ref().ok_or(HttpError::NoUrl)?;
        if !is_supported_scheme(url.scheme()) {
            return Err(HttpError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host().is_empty() {
            return Err(HttpError::MalformedUrl(format!("missing host in url ({url})")));
        }
        self.headers.set("Host", host_header(url))?;

        Ok(RequestContext {
            method: self.method,
            url: url.url(),
            header: self.headers.render(),
            body: self.content.clone(),
            protocol_version: "1.1",
            follow_location: self.config.follow_redirects,
            max_redirects: self.config.max_redirects,
            progress: self.progress.as_deref_mut(),
        })
    }

    /// Perform the exchange through `transport` and parse the result.
    pub fn send<T>(&mut self, transport: &T) -> Result<&HttpResponse, HttpError>
    where
        T: Transport + ?Sized,
    {
        self.response = None;
        let context = self.render()?;
        let target = context.url.clone();
        let outcome = transport.execute(context);

        let raw = match outcome {
            Ok(TransportOutcome::Received(raw)) => raw,
            Ok(TransportOutcome::NoData) => {
                self.logger.error(&format!("no data received from {target}"));
                return Err(HttpError::Transport("no data received".to_string()));
            }
            Err(failure) => {
                self.logger
                    .error(&format!("request to {target} failed: {failure}"));
                return Err(HttpError::Transport(failure.message));
            }
        };

        self.logger.info(&format!(
            "got a response from {target}: {} header lines, {} bytes",
            raw.header_lines.len(),
            raw.body.len()
        ));

        let mut response = HttpResponse::new();
        response.set_content(raw.body);
        response.set_headers(&raw.header_lines);
        if response.status().is_none() {
            self.logger
                .warn(&format!("response from {target} has no status line"));
        }
        Ok(self.response.insert(response))
    }
}

/// `host[:port]`, the port only when it is not the scheme's default.
fn host_header(url: &Url) -> String {
    if url.port() != 0 && !url.is_standard_port() {
        format!("{}:{}", url.host(), url.port())
    } else {
        url.host().to_string()
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("content", &self.content)
            .field("config", &self.config)
            .field("progress", &self.progress.is_some())
            .field("response", &self.response)
            .finish()
    }
}
