//! Blocking HTTP transport backed by ureq.

use std::time::Duration;

use reqpipe_core::{HttpRequest, HttpResponse, Transport, TransportError};

fn transport_error(status: u16, e: impl std::fmt::Display) -> TransportError {
    TransportError {
        status,
        message: e.to_string(),
    }
}

/// Executes `HttpRequest`s with a ureq agent.
///
/// 4xx/5xx statuses are returned as responses, not errors, so the pipeline
/// sees the real status and body.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = ureq::http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let result = if request.body.is_empty() {
            let req = builder.body(()).map_err(|e| transport_error(0, e))?;
            self.agent.run(req)
        } else {
            let req = builder
                .body(request.body.clone())
                .map_err(|e| transport_error(0, e))?;
            self.agent.run(req)
        };
        let mut response = result.map_err(|e| transport_error(0, e))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| transport_error(status, e))?;
        Ok(HttpResponse { status, body })
    }
}
