//! Blocking client for the Lucid REST API
//!
//! [`LucidchartClient`] turns documents into authenticated requests and
//! hands them to a [`Transport`]. Each call is a single exchange: nothing is
//! retried, and a non-2xx answer comes back as [`LucidError::Api`] with the
//! status and body untouched.
//!
//! ```rust,no_run
//! use lucidkit::client::LucidchartClient;
//! use lucidkit::model::Document;
//!
//! let client = LucidchartClient::new("your-api-key").unwrap();
//! let doc = Document::create("Architecture");
//! let created = client.create_document("Architecture", &doc).unwrap();
//! println!("{}", created["documentId"]);
//! ```

pub mod archive;
mod config;
mod transport;

pub use config::*;
pub use transport::*;

use serde_json::{json, Value};
use tracing::{debug, field, span, warn, Level};

use crate::core::{LucidError, Result};
use crate::model::Document;

/// Client for the documents endpoints
#[derive(Debug)]
pub struct LucidchartClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl LucidchartClient<HttpTransport> {
    /// Client with default settings for the given key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self { config, transport })
    }

    /// Client configured by [`ClientConfig::load`]
    pub fn from_default_config() -> Result<Self> {
        Self::with_config(ClientConfig::load()?)
    }
}

impl<T: Transport> LucidchartClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate and upload a document as a new Lucidchart document
    pub fn create_document(&self, title: &str, document: &Document) -> Result<Value> {
        check_title(title)?;
        let json = document.to_json()?;
        self.import(title, &json)
    }

    /// Upload caller-provided standard import JSON
    ///
    /// The JSON only has to parse; its contents are the service's to judge.
    pub fn create_document_from_json(&self, title: &str, json: &str) -> Result<Value> {
        check_title(title)?;
        serde_json::from_str::<Value>(json)?;
        self.import(title, json)
    }

    pub fn get_document(&self, document_id: &str) -> Result<Value> {
        check_document_id(document_id)?;
        self.request(
            Method::GET,
            &format!("/documents/{}", document_id),
            RequestBody::Empty,
        )
    }

    pub fn get_document_contents(&self, document_id: &str) -> Result<Value> {
        check_document_id(document_id)?;
        self.request(
            Method::GET,
            &format!("/documents/{}/contents", document_id),
            RequestBody::Empty,
        )
    }

    /// Search the caller's documents; blank keywords list everything
    pub fn search_documents(&self, keywords: &str) -> Result<Value> {
        let body = if keywords.trim().is_empty() {
            json!({})
        } else {
            json!({ "keywords": keywords })
        };
        self.request(Method::POST, "/documents/search", RequestBody::Json(body))
    }

    pub fn trash_document(&self, document_id: &str) -> Result<Value> {
        check_document_id(document_id)?;
        self.request(
            Method::POST,
            &format!("/documents/{}/trash", document_id),
            RequestBody::Empty,
        )
    }

    /// Send an authenticated request to any API path
    pub fn request(&self, method: Method, path: &str, body: RequestBody) -> Result<Value> {
        let request_span = span!(
            Level::INFO,
            "lucid_request",
            method = %method,
            path = %path,
            status = field::Empty
        );
        let _enter = request_span.enter();

        let request = ApiRequest {
            method,
            url: self.config.endpoint(path),
            headers: self.headers(),
            body,
        };
        let response = self.transport.send(request)?;
        request_span.record("status", response.status);

        if !response.is_success() {
            warn!(status = response.status, "Request failed");
            return Err(LucidError::api(response.status, response.body));
        }
        debug!(body_len = response.body.len(), "Request succeeded");
        Ok(parse_body(&response.body))
    }

    fn import(&self, title: &str, json: &str) -> Result<Value> {
        let bytes = archive::build_import_archive(json)?;
        let parts = vec![
            FormPart::file(
                "file",
                archive::IMPORT_FILE_NAME,
                archive::IMPORT_MIME,
                bytes,
            ),
            FormPart::text("title", title),
            FormPart::text("product", self.config.product.as_str()),
        ];
        self.request(Method::POST, "/documents", RequestBody::Multipart(parts))
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.config.api_key),
            ),
            (
                "Lucid-Api-Version".to_string(),
                self.config.api_version.clone(),
            ),
        ]
    }
}

fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(LucidError::validation("title", "must not be blank"));
    }
    Ok(())
}

fn check_document_id(document_id: &str) -> Result<()> {
    if document_id.is_empty()
        || document_id
            .chars()
            .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace())
    {
        return Err(LucidError::validation(
            "documentId",
            format!("'{}' is not a document identifier", document_id),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(ApiResponse {
                status: self.status,
                body: self.body.to_string(),
            })
        }
    }

    fn client(status: u16, body: &'static str) -> LucidchartClient<Canned> {
        LucidchartClient::with_transport(ClientConfig::new("test-key"), Canned::new(status, body))
            .unwrap()
    }

    #[test]
    fn test_request_sets_auth_headers() {
        let client = client(200, r#"{"success": true}"#);
        let value = client
            .request(Method::GET, "/test-endpoint", RequestBody::Empty)
            .unwrap();
        assert_eq!(value, json!({"success": true}));

        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(seen[0].url, "https://api.lucid.co/test-endpoint");
        assert_eq!(seen[0].header("Authorization"), Some("Bearer test-key"));
        assert_eq!(seen[0].header("Lucid-Api-Version"), Some("1"));
    }

    #[test]
    fn test_error_status_keeps_body() {
        let client = client(403, "forbidden");
        let err = client.get_document("abc").unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("forbidden"));
    }

    #[test]
    fn test_body_parsing() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("plain"), Value::String("plain".to_string()));
        assert_eq!(parse_body("[1]"), json!([1]));
    }

    #[test]
    fn test_argument_checks_happen_before_sending() {
        let client = client(200, "{}");
        assert_eq!(
            client.get_document("a/b").unwrap_err().field(),
            Some("documentId")
        );
        assert_eq!(
            client
                .create_document("  ", &Document::create("x"))
                .unwrap_err()
                .field(),
            Some("title")
        );
        assert!(client
            .create_document_from_json("T", "{not json")
            .is_err());
        assert!(client.transport().seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = LucidchartClient::with_transport(ClientConfig::new(""), Canned::new(200, ""));
        assert!(result.is_err());
    }
}
