//! REST remote data source.
//!
//! Talks to a PostgREST-style endpoint that exposes the authoritative tables.
//!
//! ### Endpoints
//!
//! - `GET {base}/rest/v1/data_version`: single row, `version` + `updated_at`
//! - `GET {base}/rest/v1/categories`
//! - `GET {base}/rest/v1/businesses`
//!
//! Every request carries the anonymous key in both the `apikey` header and a
//! bearer `Authorization` header. Rows use snake_case columns and are
//! normalized into core domain types.

pub mod error;
pub mod rows;

pub use error::RemoteError;
pub use rows::{BusinessRow, CategoryRow, Scalar, VersionRow};

use reqwest::header;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bizsync_core::{AppConfig, Business, Category, Dataset, RemoteSource, VersionDescriptor};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "bizsync/0.1";

/// REST client configuration.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Service base URL, without the `/rest/v1` suffix.
    pub base_url: String,
    /// Anonymous API key.
    pub api_key: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: bizsync/0.x).
    pub user_agent: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RestConfig {
    /// Build from loaded application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, RemoteError> {
        let api_key = config.require_api_key().map_err(|_| RemoteError::MissingApiKey)?;

        Ok(Self {
            base_url: config.remote_url.clone(),
            api_key: api_key.to_string(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// REST implementation of [`RemoteSource`].
#[derive(Debug, Clone)]
pub struct RestSource {
    http: reqwest::Client,
    config: Arc<RestConfig>,
}

impl RestSource {
    /// Create a new client with the given configuration.
    pub fn new(config: RestConfig) -> Result<Self, RemoteError> {
        if config.api_key.trim().is_empty() {
            return Err(RemoteError::MissingApiKey);
        }

        let base = url::Url::parse(&config.base_url).map_err(|e| RemoteError::InvalidUrl(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(RemoteError::InvalidUrl(format!("unsupported scheme '{}'", base.scheme())));
        }

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| RemoteError::Network(Arc::new(e)))?;

        Ok(Self { http, config: Arc::new(config) })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url.trim_end_matches('/'), table)
    }

    /// GET rows from a table and decode them.
    async fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, &str)]) -> Result<Vec<T>, RemoteError> {
        let start = Instant::now();
        let url = self.table_url(table);

        tracing::debug!("selecting rows: table={}", table);

        let http_response = self
            .http
            .get(&url)
            .header("apikey", &self.config.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("remote response status: {}", status);

        if status == 401 || status == 403 {
            return Err(RemoteError::AuthError);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(RemoteError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let rows: Vec<T> = serde_json::from_slice(&bytes).map_err(|e| RemoteError::Parse(e.to_string()))?;

        tracing::debug!("selected {} rows from {} in {:?}", rows.len(), table, start.elapsed());

        Ok(rows)
    }

    /// Fetch the current dataset version.
    pub async fn fetch_version(&self) -> Result<VersionDescriptor, RemoteError> {
        let rows: Vec<VersionRow> = self
            .select("data_version", &[("select", "version,updated_at"), ("order", "updated_at.desc"), ("limit", "1")])
            .await?;

        rows.into_iter().next().map(VersionDescriptor::from).ok_or(RemoteError::MissingVersion)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, RemoteError> {
        let rows: Vec<CategoryRow> = self.select("categories", &[("select", "*"), ("order", "name.asc")]).await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn fetch_businesses(&self) -> Result<Vec<Business>, RemoteError> {
        let rows: Vec<BusinessRow> = self.select("businesses", &[("select", "*")]).await?;
        Ok(rows.into_iter().map(Business::from).collect())
    }
}

#[async_trait::async_trait]
impl RemoteSource for RestSource {
    async fn fetch_remote_version(&self) -> Result<VersionDescriptor, bizsync_core::Error> {
        Ok(self.fetch_version().await?)
    }

    async fn fetch_full_dataset(&self) -> Result<Dataset, bizsync_core::Error> {
        let (categories, businesses) = tokio::try_join!(self.fetch_categories(), self.fetch_businesses())?;
        Ok(Dataset::new(categories, businesses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const API_KEY: &str = "anon-key";

    /// Minimal HTTP/1.1 responder keyed by path prefix.
    ///
    /// Requests without the expected `apikey` header get a 401.
    async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 16 * 1024];
                    let mut read = 0;
                    while read < buf.len() {
                        let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        read += n;
                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf[..read]).to_lowercase();
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let (status, body) = if !request.contains(&format!("apikey: {API_KEY}")) {
                        (401, r#"{"message":"invalid api key"}"#)
                    } else {
                        routes
                            .iter()
                            .find(|(prefix, ..)| path.starts_with(prefix))
                            .map(|(_, status, body)| (*status, *body))
                            .unwrap_or((404, "[]"))
                    };

                    let response = format!(
                        "HTTP/1.1 {status} STATUS\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{addr}")
    }

    fn source(base_url: String, api_key: &str) -> RestSource {
        RestSource::new(RestConfig { base_url, api_key: api_key.to_string(), ..Default::default() }).unwrap()
    }

    #[test]
    fn test_new_missing_key() {
        let config = RestConfig { base_url: "https://example.com".into(), ..Default::default() };
        assert!(matches!(RestSource::new(config), Err(RemoteError::MissingApiKey)));
    }

    #[test]
    fn test_new_invalid_url() {
        let config = RestConfig { base_url: "not a url".into(), api_key: API_KEY.into(), ..Default::default() };
        assert!(matches!(RestSource::new(config), Err(RemoteError::InvalidUrl(_))));

        let config = RestConfig { base_url: "ftp://example.com".into(), api_key: API_KEY.into(), ..Default::default() };
        assert!(matches!(RestSource::new(config), Err(RemoteError::InvalidUrl(_))));
    }

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let source = source("https://example.supabase.co/".into(), API_KEY);
        assert_eq!(source.table_url("businesses"), "https://example.supabase.co/rest/v1/businesses");
    }

    #[test]
    fn test_from_app_config() {
        let app = AppConfig { api_key: Some(API_KEY.into()), timeout_ms: 1500, ..Default::default() };
        let config = RestConfig::from_app_config(&app).unwrap();
        assert_eq!(config.api_key, API_KEY);
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.base_url, app.remote_url);

        let missing = AppConfig::default();
        assert!(matches!(RestConfig::from_app_config(&missing), Err(RemoteError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_fetch_version_and_dataset() {
        let base = serve(vec![
            ("/rest/v1/data_version", 200, r#"[{"version": 7, "updated_at": "2024-05-01T10:00:00Z"}]"#),
            ("/rest/v1/categories", 200, r#"[{"id": "c1", "name": "Food"}]"#),
            (
                "/rest/v1/businesses",
                200,
                r#"[{"id": "b1", "shop_name": "Bakery", "owner_name": "Asha", "contact_number": "1", "category": "c1"}]"#,
            ),
        ])
        .await;
        let source = source(base, API_KEY);

        let version = source.fetch_remote_version().await.unwrap();
        assert_eq!(version.version_token, "7");

        let dataset = source.fetch_full_dataset().await.unwrap();
        assert_eq!(dataset.categories.len(), 1);
        assert_eq!(dataset.businesses[0].shop_name, "Bakery");
    }

    #[tokio::test]
    async fn test_empty_version_table() {
        let base = serve(vec![("/rest/v1/data_version", 200, "[]")]).await;
        let result = source(base, API_KEY).fetch_version().await;
        assert!(matches!(result, Err(RemoteError::MissingVersion)));
    }

    #[tokio::test]
    async fn test_wrong_key_is_auth_error() {
        let base = serve(vec![("/rest/v1/data_version", 200, "[]")]).await;
        let result = source(base, "wrong-key").fetch_version().await;
        assert!(matches!(result, Err(RemoteError::AuthError)));
    }

    #[tokio::test]
    async fn test_server_error_fails_whole_dataset() {
        let base = serve(vec![
            ("/rest/v1/categories", 200, r#"[{"id": "c1", "name": "Food"}]"#),
            ("/rest/v1/businesses", 503, r#"{"message":"unavailable"}"#),
        ])
        .await;
        let result = source(base, API_KEY).fetch_full_dataset().await;
        assert!(matches!(result, Err(bizsync_core::Error::Remote(ref msg)) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let base = serve(vec![("/rest/v1/categories", 200, r#"{"not": "an array"}"#)]).await;
        let result = source(base, API_KEY).fetch_categories().await;
        assert!(matches!(result, Err(RemoteError::Parse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_remote_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = source(format!("http://{addr}"), API_KEY).fetch_remote_version().await;
        assert!(matches!(result, Err(bizsync_core::Error::Remote(_))));
    }
}
