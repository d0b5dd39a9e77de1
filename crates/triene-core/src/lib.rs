//! Triene Core Library
//!
//! Business logic for the Triene CRM and content planner: cadence
//! advancement, the 30-day content calendar, the lead book and the
//! messaging integration settings.

pub mod auth;
pub mod cadence;
pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod integration;
pub mod leads;
pub mod seed;
pub mod state;

// Re-export main types for easy access
pub use config::TrieneConfig;
pub use error::{Result, TrieneError};

pub use auth::{authenticate, require_admin};

pub use cadence::{
    advance_leads,
    AutomationReport,
    AutomationRunner,
    DispatchReceipt,
    MessageDispatcher,
    SimulatedDispatcher,
};

pub use content::{
    build_outline,
    generate_auto_prompt,
    write_calendar,
    CalendarExportEntry,
    ContentCalendar,
    ImageRef,
    ImageRenderer,
    PlaceholderRenderer,
};

pub use integration::IntegrationService;
pub use leads::{export_leads_csv, import_leads_simulated, write_leads_csv};
pub use state::{AppState, Command};
