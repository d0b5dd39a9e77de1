//! Ordered action pipeline driven by the command line flags

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use triene_core::cadence::{AutomationRunner, SimulatedDispatcher};
use triene_core::config::TrieneConfig;
use triene_core::content::write_calendar;
use triene_core::integration::IntegrationService;
use triene_core::leads::write_leads_csv;
use triene_core::state::{AppState, Command};
use triene_core::require_admin;
use triene_types::LeadStatus;

/// Actions requested on the command line. They always run in field order.
#[derive(Debug, Clone, Default)]
pub struct Actions {
    pub import_leads: bool,
    pub test_connection: bool,
    pub run_automation: bool,
    pub build_outline: bool,
    pub instagram: Option<String>,
    pub approve_outline: bool,
    pub generate_images: bool,
    pub generate_descriptions: bool,
    pub export_calendar: Option<PathBuf>,
    pub export_leads: Option<PathBuf>,
}

impl Actions {
    pub fn is_empty(&self) -> bool {
        !(self.import_leads
            || self.test_connection
            || self.run_automation
            || self.build_outline
            || self.approve_outline
            || self.generate_images
            || self.generate_descriptions
            || self.export_calendar.is_some()
            || self.export_leads.is_some())
    }
}

/// Empty path means "use the configured export directory"
fn export_path(requested: &Path, fallback: PathBuf) -> PathBuf {
    if requested.as_os_str().is_empty() {
        fallback
    } else {
        requested.to_path_buf()
    }
}

pub async fn run(mut state: AppState, config: &TrieneConfig, actions: &Actions) -> Result<AppState> {
    let delay = config.automation.simulated_delay();

    if actions.import_leads {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        state = state.apply(Command::ImportLeads)?;
        log::info!("2 leads imported; tags assigned their flows");
    }

    if actions.test_connection {
        let session = state.session().context("Not logged in")?;
        require_admin(session)?;

        let mut service = IntegrationService::new(state.integration.clone(), delay);
        let message = service.test_connection().await?;
        state = state.with_integration(service.into_config());
        log::info!("{}", message);
    }

    if actions.run_automation {
        let runner = AutomationRunner::new(
            SimulatedDispatcher::from_config(&state.integration, &config.automation),
            &config.automation,
        );
        let report = runner
            .run(&state.leads, &state.cadences, &state.integration)
            .await
            .context("Automation run failed")?;
        log::info!("Automation: {}", report.summary());
        state = state.with_automation_report(&report);
    }

    if actions.build_outline {
        if let Some(handle) = &actions.instagram {
            state = state.apply(Command::SetInstagramHandle(handle.clone()))?;
        }
        state = state.apply(Command::BuildOutline)?;
        log::info!("{}", state.content.analysis_summary());
    }

    if actions.approve_outline {
        state = state.apply(Command::ApproveOutline)?;
    }

    if actions.generate_images {
        state = state.apply(Command::BulkGenerateImages)?;
    }

    if actions.generate_descriptions {
        state = state.apply(Command::BulkGenerateDescriptions)?;
    }

    if let Some(requested) = &actions.export_calendar {
        let path = export_path(requested, config.export.calendar_path());
        let written = write_calendar(state.content.items(), &path)
            .with_context(|| format!("Failed to export calendar to {}", path.display()))?;
        log::info!("Calendar written to {}", written.display());
    }

    if let Some(requested) = &actions.export_leads {
        let path = export_path(requested, config.export.leads_path());
        let written = write_leads_csv(&state.leads, &path)
            .with_context(|| format!("Failed to export leads to {}", path.display()))?;
        log::info!("Leads written to {}", written.display());
    }

    Ok(state)
}

/// Short machine-readable digest printed after the pipeline
pub fn summary(state: &AppState) -> serde_json::Value {
    serde_json::json!({
        "user": state.session().map(|s| s.name.clone()),
        "leads": state.leads.len(),
        "in_cadence": state.leads.iter().filter(|l| l.status == LeadStatus::InCadence).count(),
        "integration": {
            "provider": state.integration.provider.as_str(),
            "connected": state.integration.is_connected,
        },
        "outline_days": state.content.items().len(),
        "outline_approved": state.content.is_approved(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use triene_core::authenticate;

    fn quiet_config(output_dir: PathBuf) -> TrieneConfig {
        let mut config = TrieneConfig::default();
        config.automation.simulated_delay_ms = 0;
        config.export.output_dir = output_dir;
        config
    }

    fn admin_state(config: &TrieneConfig) -> AppState {
        let session = authenticate("admin@triene.com", "admin").unwrap();
        AppState::seeded(config).with_session(session)
    }

    #[tokio::test]
    async fn test_full_run_writes_both_exports() {
        let dir = tempfile::tempdir().unwrap();
        let config = quiet_config(dir.path().to_path_buf());
        let actions = Actions {
            import_leads: true,
            test_connection: true,
            run_automation: true,
            build_outline: true,
            instagram: Some("@triene".to_string()),
            approve_outline: true,
            generate_images: true,
            generate_descriptions: true,
            export_calendar: Some(PathBuf::new()),
            export_leads: Some(dir.path().join("leads.csv")),
        };

        let state = run(admin_state(&config), &config, &actions).await.unwrap();

        assert_eq!(state.leads.len(), 4);
        assert!(state.content.is_approved());
        assert!(dir.path().join("cronograma_conteudo.json").exists());

        let csv = std::fs::read_to_string(dir.path().join("leads.csv")).unwrap();
        assert_eq!(csv.lines().count(), 5);

        let digest = summary(&state);
        assert_eq!(digest["leads"], 4);
        assert_eq!(digest["outline_days"], 30);
    }

    #[tokio::test]
    async fn test_generation_without_approval_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = quiet_config(dir.path().to_path_buf());
        let actions = Actions {
            build_outline: true,
            generate_images: true,
            ..Actions::default()
        };

        assert!(run(admin_state(&config), &config, &actions).await.is_err());
    }

    #[tokio::test]
    async fn test_connection_test_needs_admin() {
        let dir = tempfile::tempdir().unwrap();
        let config = quiet_config(dir.path().to_path_buf());
        let seller = authenticate("user@triene.com", "user").unwrap();
        let actions = Actions {
            test_connection: true,
            ..Actions::default()
        };

        let state = AppState::seeded(&config).with_session(seller);
        assert!(run(state, &config, &actions).await.is_err());
    }

    #[test]
    fn test_empty_actions() {
        assert!(Actions::default().is_empty());
        assert!(!Actions { run_automation: true, ..Actions::default() }.is_empty());
    }
}
