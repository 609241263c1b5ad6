//! Blocking HTTP transport built on curl.

use crate::error::{PaywhirlError, Result};
use curl::easy::{Easy2, Handler, WriteError};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The HTTP methods used by the PayWhirl API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Returns the method as an uppercase string.
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Returns true if parameters for this method travel in a JSON body
    /// rather than the query string.
    pub fn has_body(&self) -> bool {
        matches!(
            self,
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete
        )
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = PaywhirlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(PaywhirlError::UnsupportedHttpMethod(s.to_string())),
        }
    }
}

struct ResponseHandler {
    data: Vec<u8>,
    headers: HashMap<String, String>,
}

impl ResponseHandler {
    fn new() -> Self {
        Self {
            data: Vec::new(),
            headers: HashMap::new(),
        }
    }
}

impl Handler for ResponseHandler {
    fn write(&mut self, data: &[u8]) -> std::result::Result<usize, WriteError> {
        self.data.extend_from_slice(data);
        Ok(data.len())
    }

    fn header(&mut self, header: &[u8]) -> bool {
        if let Ok(header_str) = std::str::from_utf8(header) {
            if let Some((key, value)) = header_str.split_once(':') {
                self.headers
                    .insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }
        true
    }
}

/// A single HTTP exchange as seen by the client.
#[derive(Debug)]
pub struct HttpResponse {
    pub status_code: u32,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Convert the response body to a UTF-8 string.
    ///
    /// # Errors
    /// Returns an error if the body is not valid UTF-8.
    pub fn body_string(&self) -> Result<String> {
        Ok(String::from_utf8(self.body.clone())?)
    }

    /// Check if the status code is in the 200-299 success range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }
}

/// Builder for configuring HTTP clients.
#[must_use]
pub struct HttpClientBuilder {
    verbose: bool,
    timeout: Option<u64>,
    verify_ssl: bool,
    user_agent: Option<String>,
    headers: Vec<(String, String)>,
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self {
            verbose: false,
            timeout: None,
            verify_ssl: true,
            user_agent: None,
            headers: Vec::new(),
        }
    }

    /// Enable curl's verbose output for debugging.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set request timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Toggle TLS certificate verification. On by default.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Set a custom User-Agent header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Add a custom HTTP header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add multiple headers at once.
    pub fn headers(mut self, headers: &[(String, String)]) -> Self {
        self.headers.extend_from_slice(headers);
        self
    }

    /// Build the configured HTTP client.
    pub fn build(self) -> Result<HttpClient> {
        let mut client = HttpClient::new()?;

        if self.verbose {
            client.set_verbose(true)?;
        }

        if let Some(timeout) = self.timeout {
            client.set_timeout(timeout)?;
        }

        if !self.verify_ssl {
            client.set_ssl_verify(false)?;
        }

        if let Some(ref ua) = self.user_agent {
            client.set_user_agent(ua)?;
        }

        if !self.headers.is_empty() {
            client.set_headers(&self.headers)?;
        }

        Ok(client)
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct HttpClient {
    curl: Easy2<ResponseHandler>,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let handler = ResponseHandler::new();
        let curl = Easy2::new(handler);

        Ok(Self { curl })
    }

    pub fn set_headers(&mut self, headers: &[(String, String)]) -> Result<()> {
        let mut list = curl::easy::List::new();
        for (name, value) in headers {
            list.append(&format!("{name}: {value}"))?;
        }
        self.curl.http_headers(list)?;
        Ok(())
    }

    pub fn set_verbose(&mut self, verbose: bool) -> Result<()> {
        self.curl.verbose(verbose)?;
        Ok(())
    }

    pub fn set_timeout(&mut self, timeout_secs: u64) -> Result<()> {
        self.curl
            .timeout(std::time::Duration::from_secs(timeout_secs))?;
        Ok(())
    }

    pub fn set_ssl_verify(&mut self, verify: bool) -> Result<()> {
        self.curl.ssl_verify_peer(verify)?;
        self.curl.ssl_verify_host(verify)?;
        Ok(())
    }

    pub fn set_user_agent(&mut self, user_agent: &str) -> Result<()> {
        self.curl.useragent(user_agent)?;
        Ok(())
    }

    /// Percent-encode a string for use in a query component.
    pub fn url_encode(&mut self, input: &str) -> String {
        self.curl.url_encode(input.as_bytes())
    }

    /// Perform a request with the given method and optional body.
    pub fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: Option<&[u8]>,
    ) -> Result<HttpResponse> {
        self.curl.url(url)?;

        match method {
            HttpMethod::Get => {
                self.curl.get(true)?;
            }
            HttpMethod::Post => {
                self.curl.post(true)?;
                if let Some(data) = body {
                    self.curl.post_field_size(data.len() as u64)?;
                    self.curl.post_fields_copy(data)?;
                }
            }
            HttpMethod::Put => {
                self.curl.custom_request("PUT")?;
                if let Some(data) = body {
                    self.curl.post_field_size(data.len() as u64)?;
                    self.curl.post_fields_copy(data)?;
                }
            }
            HttpMethod::Delete => {
                self.curl.custom_request("DELETE")?;
                if let Some(data) = body {
                    self.curl.post_field_size(data.len() as u64)?;
                    self.curl.post_fields_copy(data)?;
                }
            }
        }

        self.perform()
    }

    fn perform(&mut self) -> Result<HttpResponse> {
        self.curl.perform()?;

        let status_code = self.curl.response_code()?;

        let handler = self.curl.get_mut();

        // Take ownership of the accumulated data so the handle can be reused
        let response = HttpResponse {
            status_code,
            headers: std::mem::take(&mut handler.headers),
            body: std::mem::take(&mut handler.data),
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_parse() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("POST".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("PUT".parse::<HttpMethod>().unwrap(), HttpMethod::Put);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
    }

    #[test]
    fn test_http_method_parse_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
    }

    #[test]
    fn test_http_method_parse_unknown() {
        let err = "PATCH".parse::<HttpMethod>().unwrap_err();
        assert!(matches!(err, PaywhirlError::UnsupportedHttpMethod(m) if m == "PATCH"));
    }

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(format!("{}", HttpMethod::Get), "GET");
        assert_eq!(format!("{}", HttpMethod::Delete), "DELETE");
    }

    #[test]
    fn test_http_method_has_body() {
        assert!(HttpMethod::Post.has_body());
        assert!(HttpMethod::Put.has_body());
        assert!(HttpMethod::Delete.has_body());
        assert!(!HttpMethod::Get.has_body());
    }

    #[test]
    fn test_http_method_default() {
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
    }

    #[test]
    fn test_response_is_success() {
        let mut response = HttpResponse {
            status_code: 200,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        assert!(response.is_success());
        response.status_code = 299;
        assert!(response.is_success());
        response.status_code = 199;
        assert!(!response.is_success());
        response.status_code = 301;
        assert!(!response.is_success());
        response.status_code = 401;
        assert!(!response.is_success());
    }

    #[test]
    fn test_response_body_string() {
        let response = HttpResponse {
            status_code: 200,
            headers: HashMap::new(),
            body: b"hello".to_vec(),
        };
        assert_eq!(response.body_string().unwrap(), "hello");

        let bad = HttpResponse {
            status_code: 200,
            headers: HashMap::new(),
            body: vec![0xff, 0xfe],
        };
        assert!(matches!(
            bad.body_string(),
            Err(PaywhirlError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_response_get_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let response = HttpResponse {
            status_code: 200,
            headers,
            body: Vec::new(),
        };
        assert_eq!(
            response.get_header("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(response.get_header("x-missing"), None);
    }

    #[test]
    fn test_url_encode() {
        let mut client = HttpClient::new().unwrap();
        assert_eq!(client.url_encode("plain"), "plain");
        assert_eq!(client.url_encode("two words"), "two%20words");
        assert_eq!(client.url_encode("a&b=c"), "a%26b%3Dc");
    }
}
