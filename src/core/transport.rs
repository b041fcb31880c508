//! Blocking HTTP transport for the Barbican API.
//!
//! A thin wrapper over `reqwest::blocking` holding the one piece of state
//! API calls need beyond the client itself: the optional subject token.
//! Construction performs no network I/O; requests are issued lazily by the
//! secret operations.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use reqwest::Method;

use crate::core::constants;
use crate::error::SessionError;

/// Request header carrying the Keystone subject token.
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Lazy HTTP channel to the key management service.
pub struct Transport {
    http: Client,
    token: Option<String>,
}

impl Transport {
    /// Transport for a no-auth session.
    pub fn unauthenticated(insecure: bool) -> Result<Self, SessionError> {
        Ok(Self {
            http: build_client(insecure)?,
            token: None,
        })
    }

    /// Transport wrapping an identity session token.
    pub fn authenticated(token: String, insecure: bool) -> Result<Self, SessionError> {
        Ok(Self {
            http: build_client(insecure)?,
            token: Some(token),
        })
    }

    /// Start a request with the standing headers applied.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(AUTH_TOKEN_HEADER, token);
        }
        builder
    }
}

fn build_client(insecure: bool) -> Result<Client, SessionError> {
    Ok(Client::builder()
        .danger_accept_invalid_certs(insecure)
        .timeout(Duration::from_secs(constants::HTTP_TIMEOUT_SECS))
        .build()?)
}

/// First line of a response body, for compact diagnostics.
pub(crate) fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().to_string()
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_request_has_no_token_header() {
        let transport = Transport::unauthenticated(false).unwrap();
        let request = transport
            .request(Method::GET, "http://localhost:9311/123/secrets")
            .build()
            .unwrap();

        assert_eq!(request.headers().get(ACCEPT).unwrap(), "application/json");
        assert!(request.headers().get(AUTH_TOKEN_HEADER).is_none());
    }

    #[test]
    fn test_authenticated_request_carries_token() {
        let transport = Transport::authenticated("tok-1".to_string(), false).unwrap();
        let request = transport
            .request(Method::DELETE, "http://localhost:9311/123/secrets/abc")
            .build()
            .unwrap();

        assert_eq!(request.headers().get(AUTH_TOKEN_HEADER).unwrap(), "tok-1");
        assert_eq!(request.method(), Method::DELETE);
    }

    #[test]
    fn test_debug_hides_token() {
        let transport = Transport::authenticated("tok-secret".to_string(), false).unwrap();
        let rendered = format!("{:?}", transport);
        assert!(!rendered.contains("tok-secret"));
        assert!(rendered.contains("authenticated: true"));
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("one\ntwo"), "one");
        assert_eq!(first_line(""), "");
    }
}
