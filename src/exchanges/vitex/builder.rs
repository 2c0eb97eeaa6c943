use crate::core::config::{ExchangeConfig, TimeSource};
use crate::core::errors::ExchangeError;
use crate::core::kernel::{HmacSigner, ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::exchanges::vitex::connector::VitexConnector;
use secrecy::Secret;
use std::sync::Arc;
use tracing::warn;

/// Builder for ViteX connectors
///
/// Without credentials the connector can still use every public endpoint;
/// trading calls then fail with `MissingCredentials` before sending anything.
#[derive(Debug, Default)]
pub struct VitexBuilder {
    config: ExchangeConfig,
    user_agent: Option<String>,
}

impl VitexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_credentials(mut self, api_key: String, secret_key: String) -> Self {
        self.config = ExchangeConfig {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            ..self.config
        };
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// Echo every raw response body on the `vitex::response` target
    pub fn with_print_response(mut self, print_response: bool) -> Self {
        self.config.print_response = print_response;
        self
    }

    pub fn with_rest_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_time_source(mut self, time_source: TimeSource) -> Self {
        self.config.time_source = time_source;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    pub fn build(self) -> Result<VitexConnector<ReqwestRest>, ExchangeError> {
        let mut rest_config =
            RestClientConfig::new(self.config.effective_base_url(), "vitex".to_string())
                .with_timeout(self.config.timeout_seconds)
                .with_print_response(self.config.print_response);
        if let Some(user_agent) = self.user_agent {
            rest_config = rest_config.with_user_agent(user_agent);
        }

        let mut rest_builder = RestClientBuilder::new(rest_config);

        if self.config.has_credentials() {
            let signer = HmacSigner::new(
                self.config.api_key().to_string(),
                self.config.secret_key().to_string(),
            )?;
            rest_builder = rest_builder.with_signer(Arc::new(signer));
        } else if !self.config.api_key().is_empty() || !self.config.secret_key().is_empty() {
            warn!("Only one of API key and secret is set; building a read-only connector");
        }

        let rest = rest_builder.build()?;

        Ok(VitexConnector::new(rest, &self.config))
    }
}

/// Create a ViteX connector from a configuration
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<VitexConnector<ReqwestRest>, ExchangeError> {
    VitexBuilder::new().with_config(config).build()
}
