//! Cadence advancement over an immutable snapshot of leads
//!
//! Each call advances every eligible lead by exactly one step. There is no
//! cooldown and no day-offset gating: running twice advances twice.

use crate::error::{Result, TrieneError};
use triene_types::{CadenceFlow, CadenceStep, Channel, IntegrationConfig, Lead, LeadStatus, LogEntry, LogType};

/// Fail the whole batch when the messaging integration is offline
pub fn ensure_connected(integration: &IntegrationConfig) -> Result<()> {
    if integration.is_connected {
        Ok(())
    } else {
        Err(TrieneError::Connectivity(format!(
            "{} integration is not connected; check the settings",
            integration.provider
        )))
    }
}

/// Resolve the step a lead would receive next, if any.
///
/// Returns `None` for terminal leads, leads whose flow is unknown, and leads
/// whose flow has no step numbered `current_step + 1`.
pub fn next_step<'a>(lead: &Lead, flows: &'a [CadenceFlow]) -> Option<&'a CadenceStep> {
    if lead.is_terminal() {
        return None;
    }

    let flow = flows.iter().find(|f| f.id == lead.cadence_id)?;
    flow.step_at(lead.current_step.checked_add(1)?)
}

/// Log entry recorded when a step goes out
pub fn sent_log(step: &CadenceStep, provider_label: &str) -> LogEntry {
    let (log_type, message) = match step.channel {
        Channel::Whatsapp => (LogType::SentWa, format!("🤖 Zap Enviado: {}", step.title)),
        Channel::Email => (
            LogType::SentEmail,
            format!("📧 Email Enviado: {}", step.subject.as_deref().unwrap_or(&step.title)),
        ),
    };

    LogEntry::new(log_type, message).with_provider(provider_label)
}

/// Move a lead onto `step` and record the send
pub fn apply_step(lead: &mut Lead, step: &CadenceStep, log: LogEntry) {
    lead.status = LeadStatus::InCadence;
    lead.current_step = step.step;
    lead.append_log(log);
}

/// Advance every eligible lead by one step.
///
/// Terminal leads, leads without a flow and leads at the end of (or at a gap
/// in) their flow are returned unchanged.
pub fn advance_leads(
    leads: &[Lead],
    flows: &[CadenceFlow],
    integration: &IntegrationConfig,
) -> Result<Vec<Lead>> {
    ensure_connected(integration)?;

    let provider_label = integration.provider.log_label();
    let mut advanced = 0usize;

    let updated = leads
        .iter()
        .map(|lead| match next_step(lead, flows) {
            Some(step) => {
                let mut next = lead.clone();
                apply_step(&mut next, step, sent_log(step, provider_label));
                advanced += 1;
                log::debug!("Lead {} advanced to step {} ({})", lead.id, step.step, step.title);
                next
            }
            None => lead.clone(),
        })
        .collect();

    log::info!("Cadence run advanced {} of {} leads", advanced, leads.len());
    Ok(updated)
}
