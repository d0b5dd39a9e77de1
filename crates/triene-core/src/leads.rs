//! Lead book operations: simulated import, CSV export and manual status changes

use crate::constants::DEFAULT_FLOW_ID;
use crate::error::{Result, TrieneError};
use chrono::Utc;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use triene_types::{CadenceFlow, FlowId, Lead, LeadId, LeadStatus, LogEntry, LogType};

const CSV_HEADER: &str = "Nome,Email,Telefone,Status,Etiquetas";
const IMPORT_SOURCE: &str = "CSV Import";

/// Pick the flow for a set of tags.
///
/// The first flow, in flow order, whose trigger tag appears among the tags
/// wins. Leads matching nothing go to the default flow.
pub fn resolve_flow_for_tags(tags: &[String], flows: &[CadenceFlow]) -> FlowId {
    flows
        .iter()
        .find(|flow| tags.iter().any(|tag| tag == &flow.trigger_tag))
        .map(|flow| flow.id.clone())
        .unwrap_or_else(|| FlowId::new(DEFAULT_FLOW_ID))
}

/// Id the next created lead should take
pub fn next_lead_id(leads: &[Lead]) -> LeadId {
    let max = leads.iter().map(|lead| lead.id.value()).max().unwrap_or(0);
    LeadId::new(max + 1)
}

fn imported_lead(id: LeadId, name: &str, email: &str, phone: &str, company: &str, tags: &[&str]) -> Lead {
    let now = Utc::now();
    let mut custom_data = BTreeMap::new();
    custom_data.insert("source".to_string(), IMPORT_SOURCE.to_string());

    Lead {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        company: company.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        status: LeadStatus::New,
        cadence_id: FlowId::new(DEFAULT_FLOW_ID),
        current_step: 0,
        entered_at: now,
        custom_data,
        logs: vec![LogEntry::new(LogType::System, "Importado via CSV").at(now)],
    }
}

/// The two leads a simulated spreadsheet import yields, numbered from `first_id`
/// and bound to their flows by tag
pub fn import_leads_simulated(first_id: LeadId, flows: &[CadenceFlow]) -> Vec<Lead> {
    let first = first_id.value();
    let mut imported = vec![
        imported_lead(
            LeadId::new(first),
            "Roberto Importado",
            "beto@gmail.com",
            "5511977776666",
            "Varejo Ltda",
            &["Frio", "Importado"],
        ),
        imported_lead(
            LeadId::new(first + 1),
            "Julia VIP Importada",
            "julia@bigcorp.com",
            "5511955554444",
            "Big Corp",
            &["VIP", "Importado"],
        ),
    ];

    for lead in &mut imported {
        lead.cadence_id = resolve_flow_for_tags(&lead.tags, flows);
    }
    imported
}

/// Run the simulated import against a lead list, putting new leads first.
/// Returns how many were added.
pub fn import_into(leads: &mut Vec<Lead>, flows: &[CadenceFlow]) -> usize {
    let mut imported = import_leads_simulated(next_lead_id(leads), flows);
    let count = imported.len();
    imported.append(leads);
    *leads = imported;

    log::info!("Imported {} leads from spreadsheet", count);
    count
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render the lead list as CSV; the tag column is always quoted
pub fn export_leads_csv(leads: &[Lead]) -> String {
    let mut out = String::from(CSV_HEADER);
    for lead in leads {
        out.push('\n');
        out.push_str(&format!(
            "{},{},{},{},\"{}\"",
            csv_field(&lead.name),
            csv_field(&lead.email),
            csv_field(&lead.phone),
            lead.status.label(),
            lead.tags.join(",").replace('"', "\"\"")
        ));
    }
    out
}

pub fn write_leads_csv<P: AsRef<Path>>(leads: &[Lead], path: P) -> Result<PathBuf> {
    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, export_leads_csv(leads))?;

    log::info!("Exported {} leads to {}", leads.len(), path.display());
    Ok(path)
}

fn find_lead_mut(leads: &mut [Lead], id: LeadId) -> Result<&mut Lead> {
    leads
        .iter_mut()
        .find(|lead| lead.id == id)
        .ok_or_else(|| TrieneError::NotFound(format!("Lead {} not found", id)))
}

/// Record an inbound reply. The lead leaves automation for good.
pub fn record_reply(leads: &mut [Lead], id: LeadId, message: &str) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        return Err(TrieneError::Validation("Reply message cannot be empty".to_string()));
    }

    let lead = find_lead_mut(leads, id)?;
    lead.append_log(LogEntry::new(LogType::Reply, message));
    lead.status = LeadStatus::Replied;

    log::info!("Lead {} replied", id);
    Ok(())
}

/// Manual status change from the lead screen.
///
/// A Replied or Lost lead can only move to the other terminal status; it
/// never re-enters the cadence.
pub fn set_status(leads: &mut [Lead], id: LeadId, status: LeadStatus) -> Result<()> {
    let lead = find_lead_mut(leads, id)?;
    if lead.status == status {
        return Ok(());
    }
    if lead.is_terminal() && !status.is_terminal() {
        return Err(TrieneError::Validation(format!(
            "Lead {} is {} and cannot return to {}",
            id, lead.status, status
        )));
    }

    lead.append_log(LogEntry::new(
        LogType::System,
        format!("Status alterado de {} para {}", lead.status, status),
    ));
    lead.status = status;
    Ok(())
}
