use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{SignedParams, Signer};
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, trace};

/// Signed parameters together with the raw JSON the exchange answered with
pub type SignedResponse = (SignedParams, Value);

/// REST client trait for making HTTP requests
///
/// Public calls are plain GETs with query parameters. Signed calls carry the
/// signed parameter set in the query string (GET) or as a form body (other methods).
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Make an unauthenticated GET request
    async fn get(&self, endpoint: &str, query_params: &[(&str, &str)])
        -> Result<Value, ExchangeError>;

    /// Make an unauthenticated GET request with strongly-typed response
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> Result<T, ExchangeError>;

    /// Sign `params` for `timestamp` and send them with `method`
    ///
    /// Fails with `MissingCredentials` before any I/O when no signer is configured.
    async fn signed_request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
        timestamp: u64,
    ) -> Result<SignedResponse, ExchangeError>;

    /// Whether signed requests can be made
    fn has_signer(&self) -> bool;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
    /// Echo raw response bodies at info level
    pub print_response: bool,
}

impl RestClientConfig {
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout_seconds: 30,
            user_agent: format!("vitex-rs/{}", env!("CARGO_PKG_VERSION")),
            print_response: false,
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_print_response(mut self, print_response: bool) -> Self {
        self.print_response = print_response;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer: self.signer,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Read the body, echo it if asked to, and parse it as JSON
    #[instrument(skip(self, response), fields(exchange = %self.config.exchange_name, status = %response.status()))]
    async fn handle_response(&self, response: Response) -> Result<Value, ExchangeError> {
        let status = response.status();
        let response_text = response.text().await?;

        trace!("Response body: {}", response_text);
        if self.config.print_response {
            info!(target: "vitex::response", "{}", response_text);
        }

        if status.is_success() {
            serde_json::from_str(&response_text).map_err(|e| {
                ExchangeError::DeserializationError(format!("Failed to parse JSON response: {}", e))
            })
        } else {
            Err(ExchangeError::HttpStatus {
                status: status.as_u16(),
                body: response_text,
            })
        }
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, query_params), fields(exchange = %self.config.exchange_name, endpoint = %endpoint, param_count = query_params.len()))]
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Value, ExchangeError> {
        let response = self
            .client
            .get(self.build_url(endpoint))
            .query(query_params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> Result<T, ExchangeError> {
        let value = self.get(endpoint, query_params).await?;
        serde_json::from_value(value).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to deserialize JSON: {}", e))
        })
    }

    #[instrument(skip(self, params), fields(exchange = %self.config.exchange_name, method = %method, endpoint = %endpoint))]
    async fn signed_request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
        timestamp: u64,
    ) -> Result<SignedResponse, ExchangeError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            ExchangeError::MissingCredentials(
                "Authentication required but no API key/secret configured".to_string(),
            )
        })?;

        let signed = signer.sign_request(params, timestamp)?;
        trace!("Request string: {}", signed.canonical);

        let request = self.client.request(method.clone(), self.build_url(endpoint));
        let request = if method == Method::GET {
            request.query(&signed.params)
        } else {
            request.form(&signed.params)
        };

        let response = request.send().await?;
        let body = self.handle_response(response).await?;

        Ok((signed, body))
    }

    fn has_signer(&self) -> bool {
        self.signer.is_some()
    }
}
