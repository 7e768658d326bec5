//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! The core crate never opens a socket. `StudentClient` describes the bulk
//! POST as an [`HttpRequest`] and hands it to an injected [`HttpTransport`];
//! whatever comes back is an [`HttpResponse`] of plain data. Base URL,
//! credentials, timeouts and TLS all live in the transport.

use crate::error::Result;

/// Headers and body of a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// A POST request described as plain data.
///
/// `path` is the absolute URL (base URL joined with the endpoint path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    pub options: RequestOptions,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing a request, then passed to
/// `StudentClient::parse_bulk_response`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// The outbound HTTP capability the client posts through.
///
/// Implementations must report 4xx/5xx answers as an `HttpResponse`, not as
/// `Err`; `Err` is reserved for failures where no response exists at all.
pub trait HttpTransport {
    fn post(&self, path: &str, options: &RequestOptions) -> Result<HttpResponse>;
}

impl<F> HttpTransport for F
where
    F: Fn(&str, &RequestOptions) -> Result<HttpResponse>,
{
    fn post(&self, path: &str, options: &RequestOptions) -> Result<HttpResponse> {
        self(path, options)
    }
}
