//! Automation runner: cadence advancement backed by a real dispatch call
//!
//! Wraps every provider call in a timeout with a bounded retry, and keeps a
//! set of leads in flight so overlapping runs never advance the same lead twice.

use super::dispatch::{DispatchReceipt, MessageDispatcher};
use super::engine;
use crate::config::AutomationConfig;
use crate::error::{Result, TrieneError};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::Mutex;
use triene_types::{CadenceFlow, CadenceStep, IntegrationConfig, Lead, LeadId, LogEntry, LogType};

/// Outcome of one automation batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationReport {
    /// Full lead list after the run, in input order
    pub leads: Vec<Lead>,
    pub advanced: Vec<LeadId>,
    pub skipped: Vec<LeadId>,
    pub failed: Vec<LeadId>,
}

impl AutomationReport {
    pub fn summary(&self) -> String {
        format!(
            "{} advanced, {} skipped, {} failed",
            self.advanced.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

enum LeadOutcome {
    Advanced,
    Skipped,
    Failed,
}

pub struct AutomationRunner<D: MessageDispatcher> {
    dispatcher: D,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
    in_flight: Mutex<HashSet<LeadId>>,
}

impl<D: MessageDispatcher> AutomationRunner<D> {
    pub fn new(dispatcher: D, config: &AutomationConfig) -> Self {
        Self {
            dispatcher,
            timeout: config.dispatch_timeout(),
            max_retries: config.max_retries,
            backoff: config.retry_backoff(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Override the per-attempt dispatch timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Run one batch over a snapshot of leads
    pub async fn run(
        &self,
        leads: &[Lead],
        flows: &[CadenceFlow],
        integration: &IntegrationConfig,
    ) -> Result<AutomationReport> {
        engine::ensure_connected(integration)?;

        log::info!(
            "Running automation over {} leads via {}",
            leads.len(),
            self.dispatcher.provider()
        );

        let outcomes = join_all(leads.iter().map(|lead| self.process_lead(lead, flows))).await;

        let mut report = AutomationReport {
            leads: Vec::with_capacity(leads.len()),
            advanced: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        };

        for (lead, outcome) in outcomes {
            match outcome {
                LeadOutcome::Advanced => report.advanced.push(lead.id),
                LeadOutcome::Skipped => report.skipped.push(lead.id),
                LeadOutcome::Failed => report.failed.push(lead.id),
            }
            report.leads.push(lead);
        }

        log::info!("Automation finished: {}", report.summary());
        Ok(report)
    }

    async fn process_lead(&self, lead: &Lead, flows: &[CadenceFlow]) -> (Lead, LeadOutcome) {
        let Some(step) = engine::next_step(lead, flows) else {
            return (lead.clone(), LeadOutcome::Skipped);
        };

        if !self.claim(lead.id).await {
            log::warn!("Lead {} is already being processed, skipping", lead.id);
            return (lead.clone(), LeadOutcome::Skipped);
        }

        let result = self.dispatch_with_retry(lead, step).await;
        self.release(lead.id).await;

        let mut updated = lead.clone();
        match result {
            Ok(receipt) => {
                engine::apply_step(&mut updated, step, engine::sent_log(step, &receipt.provider_label));
                (updated, LeadOutcome::Advanced)
            }
            Err(e) => {
                log::error!("Failed to send step {} to lead {}: {}", step.step, lead.id, e);
                updated.append_log(
                    LogEntry::new(LogType::Error, format!("Falha no envio: {} ({})", step.title, e))
                        .with_provider(self.dispatcher.provider().log_label()),
                );
                (updated, LeadOutcome::Failed)
            }
        }
    }

    async fn dispatch_with_retry(&self, lead: &Lead, step: &CadenceStep) -> Result<DispatchReceipt> {
        let mut attempt = 0u32;

        loop {
            let error = match tokio::time::timeout(self.timeout, self.dispatcher.send(lead, step)).await {
                Ok(Ok(receipt)) => return Ok(receipt),
                Ok(Err(e)) => e,
                Err(_) => TrieneError::Timeout(format!(
                    "{} did not answer within {:?}",
                    self.dispatcher.provider(),
                    self.timeout
                )),
            };

            if attempt >= self.max_retries {
                return Err(error);
            }

            attempt += 1;
            log::warn!(
                "Dispatch to lead {} failed ({}), retry {}/{}",
                lead.id,
                error,
                attempt,
                self.max_retries
            );
            tokio::time::sleep(self.backoff).await;
        }
    }

    async fn claim(&self, id: LeadId) -> bool {
        self.in_flight.lock().await.insert(id)
    }

    async fn release(&self, id: LeadId) {
        self.in_flight.lock().await.remove(&id);
    }
}
