//! Image generation boundary
//!
//! The calendar treats image results as opaque references. The placeholder
//! renderer builds dummyimage URLs; a real generator plugs in behind the
//! same trait.

use crate::constants::{EDITED_IMAGE_BASE, PLACEHOLDER_IMAGE_BASE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use triene_types::ContentPlanItem;

/// Opaque reference to a rendered image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait ImageRenderer: Send + Sync {
    /// Render a first image for a calendar day from its prompt
    fn generate_image(&self, item: &ContentPlanItem, prompt: &str) -> ImageRef;

    /// Re-render a day's image, starting from the existing one when there is one
    fn edit_image(&self, day: u32, existing: Option<&ImageRef>, instructions: &str) -> ImageRef;
}

/// Builds placeholder URLs; every edit gets a fresh revision token
#[derive(Debug, Default)]
pub struct PlaceholderRenderer {
    revision: AtomicU64,
}

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl ImageRenderer for PlaceholderRenderer {
    fn generate_image(&self, item: &ContentPlanItem, _prompt: &str) -> ImageRef {
        ImageRef::new(format!(
            "{}&text=Dia+{}+{}",
            PLACEHOLDER_IMAGE_BASE,
            item.day,
            urlencoding::encode(&item.theme)
        ))
    }

    fn edit_image(&self, day: u32, existing: Option<&ImageRef>, instructions: &str) -> ImageRef {
        if !instructions.is_empty() {
            log::debug!("Edit instructions for day {}: {}", day, instructions);
        }

        match existing {
            Some(image) => ImageRef::new(format!("{}&edited={}", image, self.next_revision())),
            None => ImageRef::new(format!("{}&text=Editado+Dia+{}", EDITED_IMAGE_BASE, day)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triene_types::ImageStatus;

    fn item() -> ContentPlanItem {
        ContentPlanItem {
            day: 4,
            theme: "Tendência do nicho #4".to_string(),
            image_type: "Infográfico".to_string(),
            objective: "Educativo".to_string(),
            prompt: String::new(),
            image_status: ImageStatus::Pending,
            image_preview: None,
            description: String::new(),
            hashtags: String::new(),
            cta_used: String::new(),
        }
    }

    #[test]
    fn test_placeholder_encodes_theme() {
        let image = PlaceholderRenderer::new().generate_image(&item(), "prompt");
        assert_eq!(
            image.as_str(),
            "https://dummyimage.com/600x400/0f172a/ffffff.png&text=Dia+4+Tend%C3%AAncia%20do%20nicho%20%234"
        );
    }

    #[test]
    fn test_edit_derives_new_token_each_time() {
        let renderer = PlaceholderRenderer::new();
        let original = renderer.generate_image(&item(), "");

        let first = renderer.edit_image(4, Some(&original), "");
        let second = renderer.edit_image(4, Some(&original), "");
        assert!(first.as_str().starts_with(original.as_str()));
        assert!(first.as_str().contains("&edited="));
        assert_ne!(first, second);
    }

    #[test]
    fn test_edit_without_existing_image() {
        let image = PlaceholderRenderer::new().edit_image(9, None, "mais contraste");
        assert_eq!(
            image.as_str(),
            "https://dummyimage.com/600x400/f97316/ffffff.png&text=Editado+Dia+9"
        );
    }
}
