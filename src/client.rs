//! Dispatching prepared requests through an HTTP client.
//!
//! The console hands a [`PreparedRequest`] plus a method to the executor,
//! which resolves it against the configured server and sends it. Building
//! is kept separate from sending so request assembly is testable without
//! touching the network.

use http::Method;
use reqwest::multipart;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

use crate::config::SandboxConfig;
use crate::error::{SandboxError, SandboxResult};
use crate::request::{PreparedBody, PreparedRequest};

/// Sends prepared console requests.
#[derive(Debug, Clone, Default)]
pub struct RequestExecutor {
    client: reqwest::Client,
    default_headers: BTreeMap<String, String>,
}

impl RequestExecutor {
    /// An executor with a stock client and no default headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor wrapping an already-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            default_headers: BTreeMap::new(),
        }
    }

    /// Build an executor from host configuration: request timeout and
    /// default headers are applied here; the base URL stays with the
    /// caller (see [`SandboxConfig::base`]) so one executor can serve
    /// several servers.
    pub fn from_config(config: &SandboxConfig) -> SandboxResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            default_headers: config.headers.clone(),
        })
    }

    /// Assemble a concrete HTTP request.
    ///
    /// The prepared URL is parsed as-is, or joined against `base` when one
    /// is given. Default headers go on first so the prepared ones override
    /// them. Multipart bodies get their content type (with boundary) from
    /// the client, which is why `prepare_request` leaves it unset.
    pub fn build(
        &self,
        method: Method,
        prepared: &PreparedRequest,
        base: Option<&Url>,
    ) -> SandboxResult<reqwest::Request> {
        let target = resolve_target(&prepared.url, base)?;
        let mut builder = self.client.request(method, target);

        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        for (name, value) in &prepared.headers {
            builder = builder.header(name, value);
        }

        builder = match &prepared.body {
            PreparedBody::Json(Some(text)) => builder.body(text.clone()),
            PreparedBody::Json(None) => builder,
            PreparedBody::Multipart(parts) => {
                let mut form = multipart::Form::new();
                for (name, value) in parts.iter().flatten() {
                    form = form.text(name.clone(), value.clone());
                }
                builder.multipart(form)
            }
            PreparedBody::Empty => builder,
        };

        builder.build().map_err(SandboxError::from)
    }

    /// Build and send the request.
    pub async fn send(
        &self,
        method: Method,
        prepared: &PreparedRequest,
        base: Option<&Url>,
    ) -> SandboxResult<reqwest::Response> {
        let request = self.build(method, prepared, base)?;
        tracing::info!(method = %request.method(), url = %request.url(), "dispatching sandbox request");

        self.client.execute(request).await.map_err(SandboxError::from)
    }
}

fn resolve_target(url: &str, base: Option<&Url>) -> SandboxResult<Url> {
    match base {
        Some(base) => base
            .join(url)
            .map_err(|err| SandboxError::InvalidUrl(format!("{url}: {err}"))),
        None => Url::parse(url).map_err(|err| SandboxError::InvalidUrl(format!("{url}: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use std::collections::BTreeMap;

    fn prepared(url: &str, body: PreparedBody) -> PreparedRequest {
        PreparedRequest {
            url: url.to_string(),
            headers: BTreeMap::new(),
            body,
        }
    }

    #[test]
    fn test_build_absolute_url_without_base() {
        let executor = RequestExecutor::new();
        let request = executor
            .build(
                Method::GET,
                &prepared("https://api.example.com/users/42?a=1", PreparedBody::Empty),
                None,
            )
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "https://api.example.com/users/42?a=1");
        assert!(request.body().is_none());
    }

    #[test]
    fn test_build_joins_relative_url_against_base() {
        let executor = RequestExecutor::new();
        let base = Url::parse("https://api.example.com").unwrap();
        let request = executor
            .build(
                Method::GET,
                &prepared("/users/42%20x?a=1", PreparedBody::Empty),
                Some(&base),
            )
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/users/42%20x?a=1"
        );
    }

    #[test]
    fn test_build_relative_url_without_base_is_an_error() {
        let executor = RequestExecutor::new();
        let result = executor.build(Method::GET, &prepared("/users/42", PreparedBody::Empty), None);

        assert!(matches!(result, Err(SandboxError::InvalidUrl(_))));
    }

    #[test]
    fn test_build_applies_prepared_headers() {
        let executor = RequestExecutor::new();
        let mut request = prepared("https://api.example.com/pets", PreparedBody::Empty);
        request
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        request
            .headers
            .insert("X-Api-Key".to_string(), "secret".to_string());

        let built = executor.build(Method::POST, &request, None).unwrap();
        assert_eq!(
            built.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(
            built.headers().get("X-Api-Key").and_then(|v| v.to_str().ok()),
            Some("secret")
        );
    }

    #[test]
    fn test_prepared_headers_override_config_defaults() {
        let config = SandboxConfig::from_json(r#"{"headers": {"X-Api-Key": "default"}}"#).unwrap();
        let executor = RequestExecutor::from_config(&config).unwrap();

        let mut request = prepared("https://api.example.com/pets", PreparedBody::Empty);
        request
            .headers
            .insert("X-Api-Key".to_string(), "override".to_string());

        let built = executor.build(Method::GET, &request, None).unwrap();
        assert_eq!(
            built.headers().get("X-Api-Key").and_then(|v| v.to_str().ok()),
            Some("override")
        );
    }

    #[test]
    fn test_config_defaults_apply_when_not_overridden() {
        let config = SandboxConfig::from_json(r#"{"headers": {"X-Api-Key": "default"}}"#).unwrap();
        let executor = RequestExecutor::from_config(&config).unwrap();

        let built = executor
            .build(
                Method::GET,
                &prepared("https://api.example.com/pets", PreparedBody::Empty),
                None,
            )
            .unwrap();
        assert_eq!(
            built.headers().get("X-Api-Key").and_then(|v| v.to_str().ok()),
            Some("default")
        );
    }

    #[test]
    fn test_build_json_body_is_sent_verbatim() {
        let executor = RequestExecutor::new();
        let request = executor
            .build(
                Method::POST,
                &prepared(
                    "https://api.example.com/pets",
                    PreparedBody::Json(Some(r#"{"name": "rex"}"#.to_string())),
                ),
                None,
            )
            .unwrap();

        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(bytes, br#"{"name": "rex"}"#);
    }

    #[test]
    fn test_build_declared_json_without_input_sends_no_body() {
        let executor = RequestExecutor::new();
        let request = executor
            .build(
                Method::POST,
                &prepared("https://api.example.com/pets", PreparedBody::Json(None)),
                None,
            )
            .unwrap();

        assert!(request.body().is_none());
    }

    #[tokio::test]
    async fn test_send_surfaces_build_errors_before_io() {
        let executor = RequestExecutor::new();
        let result = executor
            .send(Method::GET, &prepared("/relative", PreparedBody::Empty), None)
            .await;

        assert!(matches!(result, Err(SandboxError::InvalidUrl(_))));
    }

    #[test]
    fn test_build_multipart_sets_boundary_content_type() {
        let executor = RequestExecutor::new();
        let request = executor
            .build(
                Method::POST,
                &prepared(
                    "https://api.example.com/upload",
                    PreparedBody::Multipart(Some(vec![(
                        "note".to_string(),
                        "hello".to_string(),
                    )])),
                ),
                None,
            )
            .unwrap();

        let content_type = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }
}
