use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// A request as seen by the server.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Received {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Requests seen by any route. Append-only for the life of the server.
pub type Log = Arc<RwLock<Vec<Received>>>;

pub fn app() -> Router {
    let log: Log = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/inspect", any(inspect))
        .route("/received", get(received))
        .with_state(log)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn record(log: &Log, method: Method, uri: Uri, headers: &HeaderMap, body: &Bytes) -> Received {
    let received = Received {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect(),
        body: String::from_utf8_lossy(body).into_owned(),
    };
    log.write().await.push(received.clone());
    received
}

/// 200 with the request body verbatim.
async fn echo(State(log): State<Log>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Bytes {
    record(&log, method, uri, &headers, &body).await;
    body
}

/// The status from the path, body echoed. Unknown codes become 400.
async fn status(
    State(log): State<Log>,
    Path(code): Path<u16>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Bytes) {
    record(&log, method, uri, &headers, &body).await;
    let code = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (code, body)
}

/// 200 with a JSON description of the request.
async fn inspect(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Received> {
    Json(record(&log, method, uri, &headers, &body).await)
}

/// Every request recorded so far, oldest first.
async fn received(State(log): State<Log>) -> Json<Vec<Received>> {
    Json(log.read().await.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn received_serializes_headers_as_pairs() {
        let received = Received {
            method: "POST".to_string(),
            path: "/inspect".to_string(),
            headers: vec![("x-a".to_string(), "1".to_string())],
            body: "hi".to_string(),
        };
        let json = serde_json::to_value(&received).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["headers"][0][0], "x-a");
        assert_eq!(json["headers"][0][1], "1");
        assert_eq!(json["body"], "hi");
    }

    #[test]
    fn received_roundtrips_through_json() {
        let received = Received {
            method: "PUT".to_string(),
            path: "/echo".to_string(),
            headers: Vec::new(),
            body: "payload".to_string(),
        };
        let json = serde_json::to_string(&received).unwrap();
        let back: Received = serde_json::from_str(&json).unwrap();
        assert_eq!(back, received);
    }
}
