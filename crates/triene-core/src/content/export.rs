//! Calendar export: flat JSON document, one record per day

use crate::error::{Result, TrieneError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use triene_types::{ContentPlanItem, ImageStatus};

/// One exported calendar day, with the field names the planning sheet expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarExportEntry {
    #[serde(rename = "dia")]
    pub day: u32,
    #[serde(rename = "tema")]
    pub theme: String,
    #[serde(rename = "tipoImagem")]
    pub image_type: String,
    #[serde(rename = "objetivo")]
    pub objective: String,
    pub prompt: String,
    #[serde(rename = "statusImagem")]
    pub image_status: ImageStatus,
    #[serde(rename = "descricao")]
    pub description: String,
    pub hashtags: String,
    pub cta: String,
}

impl From<&ContentPlanItem> for CalendarExportEntry {
    fn from(item: &ContentPlanItem) -> Self {
        Self {
            day: item.day,
            theme: item.theme.clone(),
            image_type: item.image_type.clone(),
            objective: item.objective.clone(),
            prompt: item.prompt.clone(),
            image_status: item.image_status,
            description: item.description.clone(),
            hashtags: item.hashtags.clone(),
            cta: item.cta_used.clone(),
        }
    }
}

/// Map every outline item to an export record; an empty outline is rejected
pub fn export_calendar(items: &[ContentPlanItem]) -> Result<Vec<CalendarExportEntry>> {
    if items.is_empty() {
        return Err(TrieneError::Validation(
            "Nothing to export; build the outline first".to_string(),
        ));
    }

    Ok(items.iter().map(CalendarExportEntry::from).collect())
}

/// Pretty-printed JSON document of the calendar
pub fn calendar_document(items: &[ContentPlanItem]) -> Result<String> {
    let entries = export_calendar(items)?;
    serde_json::to_string_pretty(&entries)
        .map_err(|e| TrieneError::Serialization(format!("Failed to serialize calendar: {}", e)))
}

/// Write the calendar document to `path`; no file is created on failure
pub fn write_calendar<P: AsRef<Path>>(items: &[ContentPlanItem], path: P) -> Result<PathBuf> {
    let document = calendar_document(items)?;
    let path = path.as_ref().to_path_buf();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, document)?;

    log::info!("Exported {} calendar days to {}", items.len(), path.display());
    Ok(path)
}
