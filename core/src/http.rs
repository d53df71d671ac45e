//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! The core never touches the network. It describes the outbound request as
//! plain data and hands it to a `Transport` supplied by the host, which
//! returns the status and raw body. Bodies are bytes, not strings: after
//! encryption they are only text if an encoding stage made them so.

use crate::error::TransportError;

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    /// Header pairs in insertion order; duplicates are sent as separate lines.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Executes one request. Implementations must not retry; any non-transport
/// status (including 4xx/5xx) is returned as a response, not an error.
pub trait Transport {
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}
