//! Cadence automation: lead advancement and the messaging boundary

pub mod dispatch;
pub mod engine;
pub mod runner;

pub use dispatch::{DispatchReceipt, MessageDispatcher, SimulatedDispatcher};
pub use engine::advance_leads;
pub use runner::{AutomationReport, AutomationRunner};
