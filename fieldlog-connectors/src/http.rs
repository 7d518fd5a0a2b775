//! HTTPS Transport for fieldlog Nodes
//!
//! ## Overview
//!
//! Posts one JSON document per call to the collector. This is the network
//! half of the store-and-forward loop: a `false` from
//! [`Transport::send`] makes the node buffer the payload.
//!
//! ## Design Decisions
//!
//! ### Status codes are not errors
//!
//! `ureq` reports 4xx/5xx responses as `Err(Error::Status)`. Here they are
//! turned back into `Ok(code)` so that the caller sees every response the
//! server actually sent. Only requests that never produced a response
//! (DNS, TLS, refused connection, timeout) become [`HttpError::Request`].
//!
//! ### No retries
//!
//! Each call makes exactly one request. Retrying is the replay engine's job.
//!
//! ## Security
//!
//! - **TLS**: certificates are checked against the client's built-in roots
//! - **Token**: optional bearer token or API key header on every request
//!
//! ## Example Usage
//!
//! ```no_run
//! use fieldlog_connectors::http::{HttpConfig, HttpsTransport};
//! use fieldlog_core::Transport;
//!
//! let config = HttpConfig::default()
//!     .timeout_secs(5)
//!     .header("X-Node", "orchard-3");
//! let mut http = HttpsTransport::new(config);
//!
//! let status = http.post("https://collector.example/sensor", r#"{"temperature":21.5}"#)?;
//! println!("collector answered {status}");
//! # Ok::<(), fieldlog_connectors::http::HttpError>(())
//! ```

use std::collections::HashMap;
use std::time::Duration;

use fieldlog_core::constants::time::HTTP_TIMEOUT_SECS;
use fieldlog_core::Transport;
use thiserror::Error;

use crate::ConnectionStats;

/// HTTP-specific errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// No response: DNS, TLS, connection or timeout failure
    #[error("Request failed: {0}")]
    Request(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// HTTP configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Authentication method
    pub auth: AuthMethod,
    /// Custom headers
    pub headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

/// Authentication methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// Bearer token
    Bearer(String),
    /// API key in header
    ApiKey {
        /// Header name
        header: String,
        /// Header value
        value: String,
    },
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            auth: AuthMethod::None,
            headers: HashMap::new(),
            user_agent: format!("fieldlog/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    /// Set bearer token authentication
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMethod::Bearer(token.into());
        self
    }

    /// Set API key authentication
    pub fn api_key(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth = AuthMethod::ApiKey {
            header: header.into(),
            value: value.into(),
        };
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Blocking JSON-over-HTTPS transport built on `ureq`
pub struct HttpsTransport {
    config: HttpConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl HttpsTransport {
    /// Create a transport; the agent keeps connections alive between posts
    pub fn new(config: HttpConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Self {
            config,
            agent,
            stats: ConnectionStats::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Counters since the transport was created
    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Build request with authentication and headers
    fn build_request(&self, url: &str) -> ureq::Request {
        let mut request = self.agent.post(url);

        match &self.config.auth {
            AuthMethod::None => {}
            AuthMethod::Bearer(token) => {
                request = request.set("Authorization", &format!("Bearer {}", token));
            }
            AuthMethod::ApiKey { header, value } => {
                request = request.set(header, value);
            }
        }

        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }

        request
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
    }

    fn execute(&self, url: &str, payload: &str) -> Result<u16, HttpError> {
        validate_url(url)?;

        match self.build_request(url).send_string(payload) {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(code, _)) => Ok(code),
            Err(ureq::Error::Transport(e)) => Err(HttpError::Request(e.to_string())),
        }
    }
}

impl Transport for HttpsTransport {
    type Error = HttpError;

    fn post(&mut self, url: &str, payload: &str) -> Result<u16, Self::Error> {
        let result = self.execute(url, payload);

        match &result {
            Ok(status) => {
                log::info!("HTTP_CLIENT | HTTP response code: {}", status);
                self.stats.record(payload.len(), Ok(*status));
            }
            Err(e) => {
                log::error!("HTTP_CLIENT | Error in POST request: {}", e);
                self.stats.record(payload.len(), Err(e.to_string().as_str()));
            }
        }

        result
    }
}

fn validate_url(url: &str) -> Result<(), HttpError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(HttpError::Config(format!(
            "URL must start with http:// or https://: {url}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves one request with `status` and hands back what it received
    fn one_shot_server(status: &'static str) -> (String, mpsc::Receiver<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/sensor", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut head = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                if line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            )
            .unwrap();
            tx.send((head, String::from_utf8(body).unwrap())).unwrap();
        });

        (url, rx)
    }

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::default()
            .bearer_token("test-token")
            .timeout_secs(60)
            .header("X-Custom", "value");

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.headers.contains_key("X-Custom"));
        assert_eq!(config.auth, AuthMethod::Bearer("test-token".into()));
        assert_eq!(HttpConfig::default().timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_url_validation() {
        let mut http = HttpsTransport::new(HttpConfig::default());
        assert!(matches!(
            http.post("collector.local/sensor", "{}"),
            Err(HttpError::Config(_))
        ));
        assert_eq!(http.stats().messages_failed, 1);
    }

    #[test]
    fn posts_json_with_headers() {
        let (url, rx) = one_shot_server("201 Created");
        let mut http = HttpsTransport::new(HttpConfig::default().bearer_token("t0k"));

        assert_eq!(http.post(&url, r#"{"humidity":40}"#).unwrap(), 201);

        let (head, body) = rx.recv().unwrap();
        let head = head.to_ascii_lowercase();
        assert!(head.starts_with("post /sensor http/1.1"));
        assert!(head.contains("content-type: application/json"));
        assert!(head.contains("authorization: bearer t0k"));
        assert_eq!(body, r#"{"humidity":40}"#);
        assert_eq!(http.stats().messages_sent, 1);
        assert_eq!(http.stats().bytes_sent, 15);
    }

    #[test]
    fn error_status_is_a_response() {
        let (url, _rx) = one_shot_server("503 Service Unavailable");
        let mut http = HttpsTransport::new(HttpConfig::default());

        assert_eq!(http.post(&url, "{}").unwrap(), 503);
        assert!(!http.stats().last_error.as_deref().unwrap_or("").is_empty());
    }

    #[test]
    fn refused_connection_is_an_error() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let mut http = HttpsTransport::new(HttpConfig::default().timeout_secs(2));

        let url = format!("http://{addr}/sensor");
        assert!(matches!(http.post(&url, "{}"), Err(HttpError::Request(_))));
        assert!(!http.send(&url, "{}"));
    }
}
