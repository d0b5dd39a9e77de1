//! Process-wide application state and the commands that change it
//!
//! Every command is applied to a clone of the current snapshot. A command
//! that fails leaves the caller holding the old snapshot, so partial
//! updates are never observable.

use crate::auth;
use crate::cadence::{advance_leads, AutomationReport};
use crate::config::TrieneConfig;
use crate::content::{ContentCalendar, ImageRenderer, PlaceholderRenderer};
use crate::error::{Result, TrieneError};
use crate::integration::IntegrationService;
use crate::leads;
use crate::seed;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use triene_types::{
    CadenceFlow, IntegrationConfig, IntegrationProvider, Lead, LeadId, LeadStatus, Session, StyleGuide,
};

/// A discrete operator action
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BuildOutline,
    ApproveOutline,
    UpdatePrompt { day: u32, prompt: String },
    RegeneratePrompt { day: u32 },
    UpdateDescription { day: u32, description: String },
    CreateImage { day: u32 },
    EditImage { day: u32, instructions: String },
    GenerateDescription { day: u32 },
    BulkGenerateImages,
    BulkGenerateDescriptions,
    AdvanceCadence,
    ImportLeads,
    RecordReply { lead_id: LeadId, message: String },
    SetLeadStatus { lead_id: LeadId, status: LeadStatus },
    SetStyleGuide(StyleGuide),
    SetInstagramHandle(String),
    SetProvider(IntegrationProvider),
    SetApiUrl(String),
    SetToken(String),
    Disconnect,
}

impl Command {
    /// Integration settings are admin-only
    fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::SetProvider(_) | Self::SetApiUrl(_) | Self::SetToken(_) | Self::Disconnect
        )
    }
}

#[derive(Clone)]
pub struct AppState {
    pub leads: Vec<Lead>,
    pub cadences: Vec<CadenceFlow>,
    pub integration: IntegrationConfig,
    pub content: ContentCalendar,
    session: Option<Session>,
    renderer: Arc<dyn ImageRenderer>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("leads", &self.leads.len())
            .field("cadences", &self.cadences.len())
            .field("integration", &self.integration)
            .field("outline_days", &self.content.items().len())
            .field("session", &self.session)
            .finish()
    }
}

impl AppState {
    /// Start from the built-in mock leads and flows, with settings from `config`
    pub fn seeded(config: &TrieneConfig) -> Self {
        Self {
            leads: seed::mock_leads(),
            cadences: seed::mock_cadences(),
            integration: config.integration.clone(),
            content: ContentCalendar::new(
                config.content.style_guide.clone(),
                config.content.instagram_handle.clone(),
            ),
            session: None,
            renderer: Arc::new(PlaceholderRenderer::new()),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ImageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn lead(&self, id: LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == id)
    }

    fn authorize(&self, command: &Command) -> Result<()> {
        if !command.requires_admin() {
            return Ok(());
        }
        match &self.session {
            Some(session) => auth::require_admin(session),
            None => Err(TrieneError::Auth(
                "Log in as an administrator to change integration settings".to_string(),
            )),
        }
    }

    /// Apply a command and return the resulting snapshot
    pub fn apply(&self, command: Command) -> Result<AppState> {
        self.authorize(&command)?;

        let mut next = self.clone();
        let renderer = Arc::clone(&self.renderer);

        match command {
            Command::BuildOutline => next.content.build_outline(),
            Command::ApproveOutline => next.content.approve_outline()?,
            Command::UpdatePrompt { day, prompt } => next.content.update_prompt(day, prompt)?,
            Command::RegeneratePrompt { day } => next.content.regenerate_prompt(day)?,
            Command::UpdateDescription { day, description } => {
                next.content.update_description(day, description)?
            }
            Command::CreateImage { day } => next.content.create_image_for_day(day, renderer.as_ref())?,
            Command::EditImage { day, instructions } => {
                next.content
                    .edit_image_for_day(day, renderer.as_ref(), &instructions)?
            }
            Command::GenerateDescription { day } => next.content.generate_description_for_day(day)?,
            Command::BulkGenerateImages => next.content.bulk_generate_images(renderer.as_ref())?,
            Command::BulkGenerateDescriptions => next.content.bulk_generate_descriptions()?,
            Command::AdvanceCadence => {
                next.leads = advance_leads(&self.leads, &self.cadences, &self.integration)?;
            }
            Command::ImportLeads => {
                leads::import_into(&mut next.leads, &self.cadences);
            }
            Command::RecordReply { lead_id, message } => {
                leads::record_reply(&mut next.leads, lead_id, &message)?
            }
            Command::SetLeadStatus { lead_id, status } => {
                leads::set_status(&mut next.leads, lead_id, status)?
            }
            Command::SetStyleGuide(style_guide) => next.content.set_style_guide(style_guide),
            Command::SetInstagramHandle(handle) => next.content.set_instagram_handle(handle),
            Command::SetProvider(provider) => next.edit_integration(|service| {
                service.set_provider(provider);
                Ok(())
            })?,
            Command::SetApiUrl(api_url) => next.edit_integration(|service| service.set_api_url(api_url))?,
            Command::SetToken(token) => next.edit_integration(|service| {
                service.set_token(token);
                Ok(())
            })?,
            Command::Disconnect => next.edit_integration(|service| {
                service.disconnect();
                Ok(())
            })?,
        }

        Ok(next)
    }

    /// Run a settings change through the integration service
    fn edit_integration<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut IntegrationService) -> Result<()>,
    {
        let mut service = IntegrationService::new(self.integration.clone(), Duration::ZERO);
        change(&mut service)?;
        self.integration = service.into_config();
        Ok(())
    }

    /// Take the lead list produced by an automation run
    pub fn with_automation_report(&self, report: &AutomationReport) -> AppState {
        let mut next = self.clone();
        next.leads = report.leads.clone();
        next
    }

    /// Take settings produced by a connection test
    pub fn with_integration(&self, integration: IntegrationConfig) -> AppState {
        let mut next = self.clone();
        next.integration = integration;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triene_types::{ImageStatus, LogType};

    fn state() -> AppState {
        AppState::seeded(&TrieneConfig::default())
    }

    #[test]
    fn test_seeded_state() {
        let state = state();
        assert_eq!(state.leads.len(), 2);
        assert_eq!(state.cadences.len(), 2);
        assert!(state.integration.is_connected);
        assert!(state.content.items().is_empty());
    }

    #[test]
    fn test_apply_returns_new_snapshot() {
        let state = state();
        let next = state.apply(Command::AdvanceCadence).unwrap();

        assert_eq!(state.leads[1].current_step, 0);
        assert_eq!(next.leads[1].current_step, 1);
        assert_eq!(next.leads[1].last_log().unwrap().log_type, LogType::SentWa);
    }

    #[test]
    fn test_failed_command_keeps_old_snapshot() {
        let state = state().apply(Command::BuildOutline).unwrap();
        let result = state.apply(Command::BulkGenerateImages);

        assert!(matches!(result, Err(TrieneError::Validation(_))));
        assert!(state.content.items().iter().all(|i| i.image_preview.is_none()));
    }

    #[test]
    fn test_content_pipeline_through_commands() {
        let state = state()
            .apply(Command::BuildOutline)
            .and_then(|s| s.apply(Command::ApproveOutline))
            .and_then(|s| s.apply(Command::CreateImage { day: 3 }))
            .and_then(|s| s.apply(Command::GenerateDescription { day: 3 }))
            .unwrap();

        let item = state.content.item(3).unwrap();
        assert_eq!(item.image_status, ImageStatus::Generated);
        assert!(!item.description.is_empty());
        assert!(state.content.item(4).unwrap().image_preview.is_none());
    }

    #[test]
    fn test_disconnect_blocks_cadence() {
        let admin = auth::authenticate("admin@triene.com", "admin").unwrap();
        let state = state().with_session(admin).apply(Command::Disconnect).unwrap();

        let result = state.apply(Command::AdvanceCadence);
        assert!(matches!(result, Err(TrieneError::Connectivity(_))));
    }

    #[test]
    fn test_settings_need_admin() {
        let result = state().apply(Command::SetToken("x".to_string()));
        assert!(matches!(result, Err(TrieneError::Auth(_))));

        let seller = auth::authenticate("user@triene.com", "user").unwrap();
        let result = state()
            .with_session(seller)
            .apply(Command::SetProvider(IntegrationProvider::Evolution));
        assert!(matches!(result, Err(TrieneError::Auth(_))));
    }

    #[test]
    fn test_import_then_reply() {
        let state = state().apply(Command::ImportLeads).unwrap();
        assert_eq!(state.leads.len(), 4);

        let julia = state.leads[1].id;
        let state = state
            .apply(Command::RecordReply {
                lead_id: julia,
                message: "Pode me ligar amanhã".to_string(),
            })
            .unwrap();
        assert_eq!(state.lead(julia).unwrap().status, LeadStatus::Replied);

        // Replied leads are left alone by the next cadence run
        let state = state.apply(Command::AdvanceCadence).unwrap();
        assert_eq!(state.lead(julia).unwrap().current_step, 0);
    }

    #[test]
    fn test_terminal_lead_cannot_be_reopened() {
        let state = state()
            .apply(Command::SetLeadStatus {
                lead_id: LeadId::new(2),
                status: LeadStatus::Lost,
            })
            .unwrap();

        let result = state.apply(Command::SetLeadStatus {
            lead_id: LeadId::new(2),
            status: LeadStatus::New,
        });
        assert!(matches!(result, Err(TrieneError::Validation(_))));
        assert_eq!(state.lead(LeadId::new(2)).unwrap().status, LeadStatus::Lost);

        let state = state.apply(Command::AdvanceCadence).unwrap();
        let lead = state.lead(LeadId::new(2)).unwrap();
        assert_eq!(lead.status, LeadStatus::Lost);
        assert_eq!(lead.current_step, 0);
    }

    #[test]
    fn test_settings_commands_update_integration() {
        let admin = auth::authenticate("admin@triene.com", "admin").unwrap();
        let state = state()
            .with_session(admin)
            .apply(Command::SetProvider(IntegrationProvider::Evolution))
            .and_then(|s| s.apply(Command::SetApiUrl("  http://localhost:8080 ".to_string())))
            .and_then(|s| s.apply(Command::SetToken("evo_token".to_string())))
            .unwrap();

        assert_eq!(state.integration.provider, IntegrationProvider::Evolution);
        assert_eq!(state.integration.api_url, "http://localhost:8080");
        assert_eq!(state.integration.token, "evo_token");
        assert!(state.integration.is_connected);
    }

    #[test]
    fn test_invalid_api_url_keeps_old_snapshot() {
        let admin = auth::authenticate("admin@triene.com", "admin").unwrap();
        let state = state().with_session(admin);

        for bad in ["", "api.digisac.io"] {
            let result = state.apply(Command::SetApiUrl(bad.to_string()));
            assert!(matches!(result, Err(TrieneError::Validation(_))));
        }
        assert_eq!(state.integration.api_url, "https://api.digisac.io/v1");
    }
}
