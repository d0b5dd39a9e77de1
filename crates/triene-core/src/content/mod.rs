//! Content planning: outline, images and export

pub mod export;
pub mod images;
pub mod outline;

pub use export::{calendar_document, export_calendar, write_calendar, CalendarExportEntry};
pub use images::{ImageRef, ImageRenderer, PlaceholderRenderer};
pub use outline::{build_outline, generate_auto_prompt, ContentCalendar, Outline};
