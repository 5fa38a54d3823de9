//! End-to-end exchanges against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and drives `HttpRequest::send`
//! through a ureq-backed [`Transport`]. The transport does only what a host
//! would: forward the rendered context, then hand back the status line,
//! header lines and body it got. Everything else is the core's job.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Once};

use minihttp_core::{
    HttpError, HttpMethod, HttpRequest, RawResponse, RequestContext, TransferProgress, Transport,
    TransportFailure, TransportOutcome, FORM_CONTENT_TYPE,
};
use mock_server::Echo;

/// Executes a rendered context with ureq.
///
/// 4xx/5xx answers are data, not errors, and redirects are followed only when
/// the context asks for it.
struct UreqTransport;

impl Transport for UreqTransport {
    fn execute(&self, mut context: RequestContext<'_>) -> Result<TransportOutcome, TransportFailure> {
        let max_redirects = if context.follow_location {
            context.max_redirects
        } else {
            0
        };
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(max_redirects)
            .build()
            .new_agent();

        // ureq derives these from the target and the body itself.
        let headers: Vec<(String, String)> = context
            .headers()
            .filter(|(name, _)| {
                !name.eq_ignore_ascii_case("host") && !name.eq_ignore_ascii_case("content-length")
            })
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let result = match context.method {
            HttpMethod::Get => {
                let mut request = agent.get(&context.url);
                for (name, value) in &headers {
                    request = request.header(name, value);
                }
                request.call()
            }
            HttpMethod::Post => {
                let mut request = agent.post(&context.url);
                for (name, value) in &headers {
                    request = request.header(name, value);
                }
                request.send(context.body.as_bytes())
            }
        };
        let mut response = result.map_err(|e| TransportFailure::new(e.to_string()))?;

        let status = response.status();
        let mut header_lines = vec![format!(
            "{:?} {} {}",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )];
        for (name, value) in response.headers() {
            header_lines.push(format!(
                "{}: {}",
                name,
                String::from_utf8_lossy(value.as_bytes())
            ));
        }
        let total = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportFailure::new(e.to_string()))?;
        context.notify(TransferProgress {
            transferred: body.len() as u64,
            total,
        });

        Ok(TransportOutcome::Received(RawResponse { header_lines, body }))
    }
}

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Start the mock server on a random port.
fn start_server() -> SocketAddr {
    init_tracing();

    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn echo_of(request: &HttpRequest) -> Echo {
    let body = request.response().unwrap().body().unwrap();
    serde_json::from_str(body).unwrap()
}

#[test]
fn get_sends_headers_and_query() {
    let addr = start_server();
    let mut request =
        HttpRequest::with_url(format!("http://{addr}/echo?x=1"), HttpMethod::Get).unwrap();
    request.set_header("X-Trace", "abc").unwrap();
    request.set_user_agent("minihttp-test").unwrap();

    let response = request.send(&UreqTransport).unwrap();
    assert_eq!(response.status(), Some(200));
    assert_eq!(response.reason_phrase(), "OK");
    assert_eq!(
        response.header("Content-Type").and_then(|v| v.as_single()),
        Some("application/json")
    );

    let echo = echo_of(&request);
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/echo");
    assert_eq!(echo.query.as_deref(), Some("x=1"));
    assert_eq!(echo.headers["x-trace"], "abc");
    assert_eq!(echo.headers["user-agent"], "minihttp-test");
}

#[test]
fn post_values_arrive_as_a_form() {
    let addr = start_server();
    let mut request =
        HttpRequest::with_url(format!("http://{addr}/echo"), HttpMethod::Post).unwrap();
    request.set_post_values([("q", "xxx"), ("name", "a b")]);

    request.send(&UreqTransport).unwrap();
    let echo = echo_of(&request);
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.body, "q=xxx&name=a+b");
    assert_eq!(echo.headers["content-type"], FORM_CONTENT_TYPE);
    assert_eq!(echo.headers["content-length"], "14");

    request.set_url(format!("http://{addr}/form")).unwrap();
    let response = request.send(&UreqTransport).unwrap();
    let fields: serde_json::Value = serde_json::from_str(response.body().unwrap()).unwrap();
    assert_eq!(fields, serde_json::json!({"q": "xxx", "name": "a b"}));
}

#[test]
fn repeated_set_cookie_is_kept_in_order() {
    let addr = start_server();
    let mut request =
        HttpRequest::with_url(format!("http://{addr}/cookies"), HttpMethod::Get).unwrap();

    let response = request.send(&UreqTransport).unwrap();
    assert_eq!(response.cookies(), vec!["a=1", "b=2"]);
    assert_eq!(response.header("set-cookie").unwrap().values().len(), 2);
    assert_eq!(response.to_string(), "cookies set");
}

#[test]
fn error_status_is_data() {
    let addr = start_server();
    let mut request =
        HttpRequest::with_url(format!("http://{addr}/status/404"), HttpMethod::Get).unwrap();

    let response = request.send(&UreqTransport).unwrap();
    assert_eq!(response.status(), Some(404));
    assert_eq!(response.reason_phrase(), "Not Found");
    assert_eq!(response.body(), Some("status 404"));
    assert_eq!(response.content_length(), 10);
}

#[test]
fn no_content_is_an_empty_body() {
    let addr = start_server();
    let mut request =
        HttpRequest::with_url(format!("http://{addr}/empty"), HttpMethod::Get).unwrap();

    let response = request.send(&UreqTransport).unwrap();
    assert_eq!(response.status(), Some(204));
    assert_eq!(response.body(), Some(""));
    assert_eq!(response.content_length(), 0);
}

#[test]
fn redirects_follow_configuration() {
    let addr = start_server();
    let mut request =
        HttpRequest::with_url(format!("http://{addr}/redirect"), HttpMethod::Get).unwrap();

    let response = request.send(&UreqTransport).unwrap();
    assert_eq!(response.status(), Some(307));
    assert_eq!(response.reason_phrase(), "Temporary Redirect");
    assert_eq!(
        response.header("location").and_then(|v| v.as_single()),
        Some("/echo")
    );

    request.set_config("follow_redirects", true).unwrap();
    let response = request.send(&UreqTransport).unwrap();
    assert_eq!(response.status(), Some(200));
    assert_eq!(echo_of(&request).path, "/echo");
}

#[test]
fn progress_reports_the_body_size() {
    let addr = start_server();
    let mut request =
        HttpRequest::with_url(format!("http://{addr}/status/200"), HttpMethod::Get).unwrap();

    let seen = Arc::new(AtomicU64::new(0));
    let sink = Arc::clone(&seen);
    request.set_progress_callback(move |progress: TransferProgress| {
        sink.store(progress.transferred, Ordering::SeqCst);
        assert_eq!(progress.percent(), Some(100));
    });

    request.send(&UreqTransport).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), "status 200".len() as u64);
}

#[test]
fn unreachable_peer_is_a_transport_error() {
    init_tracing();
    // Bind then drop so nothing listens on the port.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let mut request =
        HttpRequest::with_url(format!("http://{addr}/echo"), HttpMethod::Get).unwrap();
    let err = request.send(&UreqTransport).unwrap_err();
    assert!(matches!(err, HttpError::Transport(_)), "{err:?}");
    assert!(request.response().is_none());
}
