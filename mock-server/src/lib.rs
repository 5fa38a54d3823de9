//! HTTP peer for exercising the client core end to end.
//!
//! Routes:
//! - `GET|POST /echo` returns the request it received as JSON.
//! - `POST /form` decodes a form body and returns the fields as JSON.
//! - `GET /cookies` answers with two `Set-Cookie` headers.
//! - `GET /redirect` redirects to `/echo`.
//! - `GET /status/{code}` answers with the given status code.
//! - `GET /empty` answers `204 No Content`.

use std::collections::BTreeMap;

use axum::{
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{AppendHeaders, IntoResponse, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// The request as seen by the server.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Lower-cased names; repeated headers joined with `, `.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", get(echo).post(echo))
        .route("/form", post(form))
        .route("/cookies", get(cookies))
        .route("/redirect", get(redirect))
        .route("/status/{code}", get(status))
        .route("/empty", get(empty))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Echo> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        seen.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    tracing::debug!(%method, %uri, "echo");
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: seen,
        body,
    })
}

async fn form(Form(fields): Form<BTreeMap<String, String>>) -> Json<BTreeMap<String, String>> {
    Json(fields)
}

async fn cookies() -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, "a=1"), (header::SET_COOKIE, "b=2")]),
        "cookies set",
    )
}

async fn redirect() -> Redirect {
    Redirect::temporary("/echo")
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    StatusCode::from_u16(code)
        .map(|status| (status, format!("status {code}")))
        .map_err(|_| StatusCode::BAD_REQUEST)
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_to_json() {
        let echo = Echo {
            method: "GET".to_string(),
            path: "/echo".to_string(),
            query: None,
            headers: BTreeMap::from([("host".to_string(), "localhost".to_string())]),
            body: String::new(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["query"], serde_json::Value::Null);
        assert_eq!(json["headers"]["host"], "localhost");
    }

    #[test]
    fn echo_rejects_missing_fields() {
        let result: Result<Echo, _> = serde_json::from_str(r#"{"method":"GET"}"#);
        assert!(result.is_err());
    }
}
