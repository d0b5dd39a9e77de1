//! Shared domain types for the Triene CRM
//!
//! Leads, cadence flows, content calendar items and integration settings.
//! Everything here is plain data; behaviour lives in `triene-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Strongly typed lead id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeadId(u64);

impl LeadId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed log entry id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogId(String);

impl LogId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(s: &str) -> Result<Self> {
        uuid::Uuid::parse_str(s)
            .map(|_| Self(s.to_string()))
            .map_err(|e| TypeError::InvalidId(format!("Invalid LogId format: {}", e)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed cadence flow id (e.g. `flow_padrao`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(String);

impl FlowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lead lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    #[serde(rename = "Novo")]
    New,
    #[serde(rename = "Em Cadência")]
    InCadence,
    #[serde(rename = "Respondeu")]
    Replied,
    #[serde(rename = "Agendado")]
    Scheduled,
    #[serde(rename = "Perdido")]
    Lost,
}

impl LeadStatus {
    /// Label shown to operators and written to exports
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "Novo",
            Self::InCadence => "Em Cadência",
            Self::Replied => "Respondeu",
            Self::Scheduled => "Agendado",
            Self::Lost => "Perdido",
        }
    }

    /// Replied and Lost leads never advance again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Replied | Self::Lost)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outbound channel of a cadence step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Whatsapp,
    Email,
}

/// Kind of event recorded on a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    System,
    SentWa,
    SentEmail,
    Reply,
    Error,
}

/// One immutable event on a lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: LogId,
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl LogEntry {
    pub fn new(log_type: LogType, message: impl Into<String>) -> Self {
        Self {
            id: LogId::new(),
            log_type,
            message: message.into(),
            timestamp: Utc::now(),
            provider: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }
}

/// A prospective customer tracked through a messaging cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub tags: Vec<String>,
    pub status: LeadStatus,
    pub cadence_id: FlowId,
    pub current_step: u32,
    pub entered_at: DateTime<Utc>,
    #[serde(default)]
    pub custom_data: BTreeMap<String, String>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl Lead {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Logs are append-only; insertion order is chronological order
    pub fn append_log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
    }

    pub fn last_log(&self) -> Option<&LogEntry> {
        self.logs.last()
    }
}

/// One scheduled outbound message inside a flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceStep {
    pub step: u32,
    /// Day offset; descriptive only, never used to gate timing
    pub day: u32,
    pub channel: Channel,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// An ordered sequence of outbound messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceFlow {
    pub id: FlowId,
    pub name: String,
    pub trigger_tag: String,
    pub steps: Vec<CadenceStep>,
}

impl CadenceFlow {
    /// Linear lookup by the `step` field; gaps are not filled
    pub fn step_at(&self, step: u32) -> Option<&CadenceStep> {
        self.steps.iter().find(|s| s.step == step)
    }
}

/// Lifecycle of a calendar day's image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Gerada")]
    Generated,
    #[serde(rename = "Editada")]
    Edited,
}

impl ImageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Generated => "Gerada",
            Self::Edited => "Editada",
        }
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Textual descriptors steering prompt and description templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleGuide {
    pub colors: String,
    pub fonts: String,
    pub elements: String,
    pub aesthetics: String,
    pub persona: String,
    pub niche: String,
    pub cta: String,
}

/// One day of the 30-day content calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPlanItem {
    pub day: u32,
    pub theme: String,
    pub image_type: String,
    pub objective: String,
    pub prompt: String,
    pub image_status: ImageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_preview: Option<String>,
    pub description: String,
    pub hashtags: String,
    pub cta_used: String,
}

/// External messaging provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegrationProvider {
    #[serde(rename = "digisac")]
    Digisac,
    #[serde(rename = "z-api")]
    ZApi,
    #[serde(rename = "evolution")]
    Evolution,
    #[serde(rename = "native")]
    Native,
}

impl IntegrationProvider {
    pub const ALL: [IntegrationProvider; 4] = [Self::Digisac, Self::ZApi, Self::Evolution, Self::Native];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Digisac => "digisac",
            Self::ZApi => "z-api",
            Self::Evolution => "evolution",
            Self::Native => "native",
        }
    }

    /// Annotation written on sent-message logs
    pub fn log_label(&self) -> &'static str {
        match self {
            Self::Digisac => "DigiSac",
            _ => "API",
        }
    }
}

impl fmt::Display for IntegrationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationProvider {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypeError::UnknownProvider(s.to_string()))
    }
}

/// Provider selection, endpoint, credential and connectivity flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    pub provider: IntegrationProvider,
    pub api_url: String,
    pub token: String,
    pub is_connected: bool,
}

/// Operator role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Authenticated operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Errors raised while parsing domain values
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Unknown integration provider: {0}")]
    UnknownProvider(String),
}

pub type Result<T> = std::result::Result<T, TypeError>;
