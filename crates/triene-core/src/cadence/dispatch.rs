//! Messaging dispatch boundary

use crate::config::AutomationConfig;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use triene_types::{CadenceStep, Channel, IntegrationConfig, IntegrationProvider, Lead};

/// Proof that a provider accepted a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub provider: IntegrationProvider,
    pub provider_label: String,
    pub message_id: String,
    pub channel: Channel,
    pub sent_at: DateTime<Utc>,
}

impl DispatchReceipt {
    pub fn new(provider: IntegrationProvider, channel: Channel) -> Self {
        Self {
            provider,
            provider_label: provider.log_label().to_string(),
            message_id: uuid::Uuid::new_v4().to_string(),
            channel,
            sent_at: Utc::now(),
        }
    }
}

/// Sends one cadence step to one lead through an external provider.
///
/// Implementations are keyed by provider (digisac, z-api, evolution, native)
/// and must be cancel-safe: the runner wraps every call in a timeout.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    fn provider(&self) -> IntegrationProvider;

    async fn send(&self, lead: &Lead, step: &CadenceStep) -> Result<DispatchReceipt>;
}

/// Fill the `[Nome]` placeholder with the lead's first name
pub fn render_body(step: &CadenceStep, lead: &Lead) -> String {
    let first_name = lead.name.split_whitespace().next().unwrap_or(&lead.name);
    step.content.replace("[Nome]", first_name)
}

/// Stand-in dispatcher: waits a cosmetic delay and always succeeds
pub struct SimulatedDispatcher {
    provider: IntegrationProvider,
    delay: Duration,
}

impl SimulatedDispatcher {
    pub fn new(provider: IntegrationProvider, delay: Duration) -> Self {
        Self { provider, delay }
    }

    pub fn from_config(integration: &IntegrationConfig, automation: &AutomationConfig) -> Self {
        Self::new(integration.provider, automation.simulated_delay())
    }
}

#[async_trait]
impl MessageDispatcher for SimulatedDispatcher {
    fn provider(&self) -> IntegrationProvider {
        self.provider
    }

    async fn send(&self, lead: &Lead, step: &CadenceStep) -> Result<DispatchReceipt> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let receipt = DispatchReceipt::new(self.provider, step.channel);
        log::debug!(
            "[{}] {:?} to {}: {}",
            self.provider,
            step.channel,
            lead.name,
            render_body(step, lead)
        );
        log::info!(
            "Simulated {} dispatch of '{}' to lead {} (message {})",
            self.provider,
            step.title,
            lead.id,
            receipt.message_id
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_render_body_uses_first_name() {
        let lead = &seed::mock_leads()[0];
        let step = &seed::mock_cadences()[0].steps[0];
        assert_eq!(
            render_body(step, lead),
            "Olá Carlos, vi seu cadastro na Triene. Podemos conversar?"
        );
    }

    #[tokio::test]
    async fn test_simulated_dispatch_returns_receipt() {
        let dispatcher = SimulatedDispatcher::new(IntegrationProvider::Evolution, Duration::ZERO);
        let lead = &seed::mock_leads()[1];
        let step = &seed::mock_cadences()[1].steps[1];

        let receipt = dispatcher.send(lead, step).await.unwrap();
        assert_eq!(receipt.provider, IntegrationProvider::Evolution);
        assert_eq!(receipt.provider_label, "API");
        assert_eq!(receipt.channel, Channel::Email);
        assert!(!receipt.message_id.is_empty());
    }
}
