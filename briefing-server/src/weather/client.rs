//! JSON-over-HTTP weather source.
//!
//! Talks to a backend exposing `GET {base}/metar?icao=XXXX` and
//! `GET {base}/taf?icao=XXXX`, both returning the decoded JSON shapes of
//! [`DecodedMetar`] and [`DecodedTaf`]. Missing stations (404) follow the same
//! rules as the mock source.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::domain::{DecodedMetar, DecodedTaf, Icao};

use super::error::WeatherError;
use super::source::WeatherSource;
use super::synthetic::SyntheticMetars;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Maximum length of a response body quoted in an error.
const ERROR_BODY_LIMIT: usize = 500;

/// Basic-auth credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration for the HTTP weather source.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Headers sent with every request
    pub default_headers: Vec<(String, String)>,
    /// Optional basic auth
    pub credentials: Option<Credentials>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            default_headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            credentials: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Set the base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Add or replace a default header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.default_headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.default_headers.push((name, value.into()));
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Build the header map: default headers plus `Authorization` if set.
    fn header_map(&self) -> Result<HeaderMap, WeatherError> {
        let mut headers = HeaderMap::new();

        for (name, value) in &self.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| WeatherError::InvalidConfig(format!("invalid header name {name:?}")))?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                WeatherError::InvalidConfig(format!("invalid value for header {name}"))
            })?;
            headers.insert(name, value);
        }

        if let Some(creds) = &self.credentials {
            let token = STANDARD.encode(format!("{}:{}", creds.username, creds.password));
            let mut value = HeaderValue::from_str(&format!("Basic {token}"))
                .map_err(|_| WeatherError::InvalidConfig("invalid credentials".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}

/// Weather source backed by a JSON HTTP API.
#[derive(Debug)]
pub struct HttpWeatherSource {
    http: reqwest::Client,
    base_url: String,
    synthetic: SyntheticMetars,
}

impl HttpWeatherSource {
    pub fn new(config: ApiConfig) -> Result<Self, WeatherError> {
        Self::with_synthetic(config, SyntheticMetars::new())
    }

    pub fn with_synthetic(
        config: ApiConfig,
        synthetic: SyntheticMetars,
    ) -> Result<Self, WeatherError> {
        let headers = config.header_map()?;

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            synthetic,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}/{endpoint}?icao=XXXX`.
    ///
    /// Returns `Ok(None)` for 404, the decoded body otherwise.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        icao: &Icao,
    ) -> Result<Option<T>, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, %icao, "fetching");

        let response = self
            .http
            .get(&url)
            .query(&[("icao", icao.as_str())])
            .send()
            .await
            .inspect_err(|e| error!(%url, %icao, error = %e, "request failed"))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%url, %icao, status = status.as_u16(), "backend returned error");
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| WeatherError::Malformed {
                message: e.to_string(),
                body: Some(body.chars().take(ERROR_BODY_LIMIT).collect()),
            })
    }
}

#[async_trait]
impl WeatherSource for HttpWeatherSource {
    async fn metar(&self, icao: &Icao) -> Result<DecodedMetar, WeatherError> {
        match self.get_json::<DecodedMetar>("metar", icao).await? {
            Some(metar) => Ok(metar),
            None => {
                warn!(%icao, "backend has no METAR, generating synthetic observation");
                Ok(self.synthetic.generate(*icao, Utc::now()))
            }
        }
    }

    async fn taf(&self, icao: &Icao) -> Result<Option<DecodedTaf>, WeatherError> {
        // Both 404 and a JSON `null` body mean "no forecast"
        Ok(self
            .get_json::<Option<DecodedTaf>>("taf", icao)
            .await?
            .flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlightCategory;
    use crate::weather::MockWeatherSource;
    use axum::Router;
    use axum::extract::Query;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use reqwest::header::CONTENT_TYPE;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(
            config.default_headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert!(config.credentials.is_none());
    }

    #[test]
    fn config_builder() {
        let config = ApiConfig::new("http://localhost:9000/api/")
            .with_timeout_ms(500)
            .with_header("content-type", "application/vnd.briefing+json")
            .with_header("X-Client", "dashboard")
            .with_credentials("pilot", "secret");

        assert_eq!(config.base_url, "http://localhost:9000/api");
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.default_headers.len(), 2);
        assert_eq!(config.credentials.as_ref().unwrap().username, "pilot");
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn basic_auth_header() {
        let headers = ApiConfig::default()
            .with_credentials("pilot", "secret")
            .header_map()
            .unwrap();

        // base64("pilot:secret")
        assert_eq!(headers[AUTHORIZATION], "Basic cGlsb3Q6c2VjcmV0");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn invalid_header_rejected() {
        let err = ApiConfig::default()
            .with_header("bad header", "x")
            .header_map()
            .unwrap_err();
        assert!(matches!(err, WeatherError::InvalidConfig(_)));
    }

    /// Serve the mock dataset over HTTP on an ephemeral port.
    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    fn mock_backend() -> Router {
        let mock = Arc::new(MockWeatherSource::new(Utc::now()).unwrap());
        let metar_mock = mock.clone();

        Router::new()
            .route(
                "/api/metar",
                get(move |Query(q): Query<HashMap<String, String>>| {
                    let mock = metar_mock.clone();
                    async move {
                        let icao = Icao::parse(&q["icao"]).unwrap();
                        if !mock.known_stations().contains(&icao) {
                            return AxumStatus::NOT_FOUND.into_response();
                        }
                        axum::Json(mock.metar(&icao).await.unwrap()).into_response()
                    }
                }),
            )
            .route(
                "/api/taf",
                get(move |Query(q): Query<HashMap<String, String>>| {
                    let mock = mock.clone();
                    async move {
                        let icao = Icao::parse(&q["icao"]).unwrap();
                        axum::Json(mock.taf(&icao).await.unwrap())
                    }
                }),
            )
    }

    #[tokio::test]
    async fn fetches_metar_and_taf() {
        let base = spawn_backend(mock_backend()).await;
        let source = HttpWeatherSource::new(ApiConfig::new(base)).unwrap();
        let ebbr = Icao::parse("EBBR").unwrap();

        let report = source.weather(&ebbr).await.unwrap();
        assert_eq!(report.metar.flight_category, FlightCategory::Vfr);
        assert_eq!(report.metar.ceiling(), Some(8000));
        assert_eq!(report.taf.unwrap().periods().len(), 5);
    }

    #[tokio::test]
    async fn missing_metar_falls_back_to_synthetic() {
        let base = spawn_backend(mock_backend()).await;
        let source = HttpWeatherSource::new(ApiConfig::new(base)).unwrap();
        let unknown = Icao::parse("ZZZZ").unwrap();

        let metar = source.metar(&unknown).await.unwrap();
        assert_eq!(metar.icao, unknown);
        assert!(metar.raw.starts_with("ZZZZ "));
    }

    #[tokio::test]
    async fn null_taf_is_absent() {
        let base = spawn_backend(mock_backend()).await;
        let source = HttpWeatherSource::new(ApiConfig::new(base)).unwrap();

        let taf = source.taf(&Icao::parse("EHAM").unwrap()).await.unwrap();
        assert!(taf.is_none());
    }

    #[tokio::test]
    async fn taf_404_is_absent() {
        let router = Router::new().route("/api/taf", get(|| async { AxumStatus::NOT_FOUND }));
        let base = spawn_backend(router).await;
        let source = HttpWeatherSource::new(ApiConfig::new(base)).unwrap();

        let taf = source.taf(&Icao::parse("EBBR").unwrap()).await.unwrap();
        assert!(taf.is_none());
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let router = Router::new().route(
            "/api/metar",
            get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let base = spawn_backend(router).await;
        let source = HttpWeatherSource::new(ApiConfig::new(base)).unwrap();

        let err = source.metar(&Icao::parse("EBBR").unwrap()).await.unwrap_err();
        match err {
            WeatherError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_malformed() {
        let router = Router::new().route("/api/metar", get(|| async { "<html>oops</html>" }));
        let base = spawn_backend(router).await;
        let source = HttpWeatherSource::new(ApiConfig::new(base)).unwrap();

        let err = source.metar(&Icao::parse("EBBR").unwrap()).await.unwrap_err();
        match err {
            WeatherError::Malformed { body, .. } => {
                assert_eq!(body.as_deref(), Some("<html>oops</html>"));
            }
            other => panic!("expected Malformed error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sends_credentials() {
        let router = Router::new().route(
            "/api/taf",
            get(|headers: AxumHeaders| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth == "Basic cGlsb3Q6c2VjcmV0" {
                    "null".into_response()
                } else {
                    AxumStatus::UNAUTHORIZED.into_response()
                }
            }),
        );
        let base = spawn_backend(router).await;
        let ebbr = Icao::parse("EBBR").unwrap();

        let anonymous = HttpWeatherSource::new(ApiConfig::new(base.clone())).unwrap();
        assert!(matches!(
            anonymous.taf(&ebbr).await,
            Err(WeatherError::Api { status: 401, .. })
        ));

        let authed =
            HttpWeatherSource::new(ApiConfig::new(base).with_credentials("pilot", "secret"))
                .unwrap();
        assert!(authed.taf(&ebbr).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let router = Router::new().route(
            "/api/metar",
            get(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let base = spawn_backend(router).await;
        let source =
            HttpWeatherSource::new(ApiConfig::new(base).with_timeout_ms(50)).unwrap();

        let err = source.metar(&Icao::parse("EBBR").unwrap()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Timeout));
    }
}
