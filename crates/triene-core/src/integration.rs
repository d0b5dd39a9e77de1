//! Messaging provider settings and the simulated connection test

use crate::error::{Result, TrieneError};
use std::time::Duration;
use triene_types::{IntegrationConfig, IntegrationProvider};

/// Why an endpoint is unusable, if it is. Expects a trimmed URL.
pub(crate) fn api_url_problem(api_url: &str) -> Option<String> {
    if api_url.is_empty() {
        return Some("Integration api_url is required".to_string());
    }
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        return Some(format!(
            "Integration api_url must be an http(s) URL, got '{}'",
            api_url
        ));
    }
    None
}

/// Owns the integration settings the cadence engine consults before sending
#[derive(Debug, Clone)]
pub struct IntegrationService {
    config: IntegrationConfig,
    delay: Duration,
}

impl IntegrationService {
    pub fn new(config: IntegrationConfig, delay: Duration) -> Self {
        Self { config, delay }
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    pub fn into_config(self) -> IntegrationConfig {
        self.config
    }

    pub fn is_connected(&self) -> bool {
        self.config.is_connected
    }

    /// Switch provider; the connectivity flag is left as it was
    pub fn set_provider(&mut self, provider: IntegrationProvider) {
        log::info!("Integration provider set to {}", provider);
        self.config.provider = provider;
    }

    /// Rejects empty and non-http(s) endpoints, leaving the old one in place
    pub fn set_api_url(&mut self, api_url: impl Into<String>) -> Result<()> {
        let api_url = api_url.into().trim().to_string();
        if let Some(problem) = api_url_problem(&api_url) {
            return Err(TrieneError::Validation(problem));
        }
        log::info!("Integration endpoint set to {}", api_url);
        self.config.api_url = api_url;
        Ok(())
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.config.token = token.into();
    }

    pub fn disconnect(&mut self) {
        log::warn!("Integration with {} disconnected", self.config.provider);
        self.config.is_connected = false;
    }

    /// Pretend to reach the provider. After the configured delay the
    /// connection is always marked up.
    pub async fn test_connection(&mut self) -> Result<String> {
        log::info!(
            "Testing connection to {} at {}",
            self.config.provider,
            self.config.api_url
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.config.is_connected = true;

        Ok(format!(
            "Conexão com {} estabelecida com sucesso!",
            self.config.provider.as_str().to_uppercase()
        ))
    }
}

/// Apply a connection test result to a plain settings value
pub async fn test_connection(config: &IntegrationConfig, delay: Duration) -> Result<(IntegrationConfig, String)> {
    let mut service = IntegrationService::new(config.clone(), delay);
    let message = service.test_connection().await?;
    Ok((service.into_config(), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn service() -> IntegrationService {
        IntegrationService::new(seed::default_integration(), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_connection_reconnects() {
        let mut service = service();
        service.disconnect();
        assert!(!service.is_connected());

        service.set_provider(IntegrationProvider::ZApi);
        assert!(!service.is_connected());

        let message = service.test_connection().await.unwrap();
        assert_eq!(message, "Conexão com Z-API estabelecida com sucesso!");
        assert!(service.is_connected());
    }

    #[tokio::test]
    async fn test_connection_waits_for_delay() {
        let mut service = IntegrationService::new(seed::default_integration(), Duration::from_millis(30));
        let started = std::time::Instant::now();
        service.test_connection().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_free_function_returns_updated_config() {
        let mut config = seed::default_integration();
        config.is_connected = false;

        let (updated, message) = test_connection(&config, Duration::ZERO).await.unwrap();
        assert!(updated.is_connected);
        assert!(message.contains("DIGISAC"));
    }

    #[test]
    fn test_setters() {
        let mut service = service();
        service.set_api_url("  https://api.z-api.io  ").unwrap();
        service.set_token("novo_token");

        assert_eq!(service.config().api_url, "https://api.z-api.io");
        assert_eq!(service.config().token, "novo_token");
        assert!(service.is_connected());
    }

    #[test]
    fn test_set_api_url_rejects_bad_endpoints() {
        let mut service = service();
        for bad in ["", "   ", "api.digisac.io", "ftp://api.digisac.io"] {
            let result = service.set_api_url(bad);
            assert!(matches!(result, Err(TrieneError::Validation(_))), "accepted {:?}", bad);
        }
        assert_eq!(service.config().api_url, "https://api.digisac.io/v1");
    }
}
