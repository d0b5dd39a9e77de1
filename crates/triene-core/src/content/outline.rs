//! 30-day content calendar
//!
//! The outline is built in bulk from a style guide, then filled in per day:
//! prompts, images and descriptions. Image and description generation are
//! gated on outline approval; editing an image is not.
//!
//! Every mutating method validates first and only then writes, so a rejected
//! call leaves the calendar exactly as it was.

use super::images::{ImageRef, ImageRenderer};
use crate::constants::*;
use crate::error::{Result, TrieneError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use triene_types::{ContentPlanItem, ImageStatus, StyleGuide};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// A freshly built outline and the profile analysis that goes with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub items: Vec<ContentPlanItem>,
    pub analysis_summary: String,
}

/// Build the 30 pending calendar items for a style guide.
///
/// Themes, image types and objectives cycle through fixed lists by day index;
/// the handle only feeds the analysis summary.
pub fn build_outline(style_guide: &StyleGuide, instagram_handle: &str) -> Outline {
    Outline {
        items: outline_items(style_guide),
        analysis_summary: analysis_summary(style_guide, instagram_handle),
    }
}

fn outline_items(style_guide: &StyleGuide) -> Vec<ContentPlanItem> {
    (0..OUTLINE_DAYS as usize)
        .map(|index| {
            let day = index as u32 + 1;
            ContentPlanItem {
                day,
                theme: format!("{} #{}", THEMES_BASE[index % THEMES_BASE.len()], day),
                image_type: IMAGE_TYPES[index % IMAGE_TYPES.len()].to_string(),
                objective: OBJECTIVES[index % OBJECTIVES.len()].to_string(),
                prompt: String::new(),
                image_status: ImageStatus::Pending,
                image_preview: None,
                description: String::new(),
                hashtags: String::new(),
                cta_used: style_guide.cta.clone(),
            }
        })
        .collect()
}

/// Human-readable profile analysis shown next to a fresh outline
pub fn analysis_summary(style_guide: &StyleGuide, instagram_handle: &str) -> String {
    let handle = instagram_handle.trim().trim_start_matches('@');
    let handle = if handle.is_empty() { DEFAULT_INSTAGRAM_HANDLE } else { handle };

    format!(
        "Analisamos @{}: feed com {}, fontes {} e estética {}. Personas principais: {}. Nicho: {}.",
        handle,
        style_guide.colors.to_lowercase(),
        style_guide.fonts.to_lowercase(),
        style_guide.aesthetics.to_lowercase(),
        style_guide.persona,
        style_guide.niche
    )
}

/// Image prompt for one day; a pure function of the item and style guide
pub fn generate_auto_prompt(item: &ContentPlanItem, style_guide: &StyleGuide) -> String {
    format!(
        "Arte {} para Instagram focada em {}. Use {}, tipografia {}, elementos {}. Estética: {}. Persona: {}. Nicho: {}. Realce o tema \"{}\" e finalize com call-to-action {}.",
        item.image_type,
        item.objective,
        style_guide.colors,
        style_guide.fonts,
        style_guide.elements,
        style_guide.aesthetics,
        style_guide.persona,
        style_guide.niche,
        item.theme,
        style_guide.cta
    )
}

pub fn hashtags_for(item: &ContentPlanItem, style_guide: &StyleGuide) -> String {
    let niche = WHITESPACE.replace_all(&style_guide.niche, "");
    let persona = style_guide.persona.split(' ').next().unwrap_or_default();

    format!(
        "#{} #marketing #{} #{}",
        niche,
        item.objective.to_lowercase(),
        persona.to_lowercase()
    )
}

pub fn description_for(item: &ContentPlanItem, style_guide: &StyleGuide, hashtags: &str) -> String {
    format!(
        "Post sobre \"{}\". Explica visualmente {} com foco em {}. {}. {}",
        item.theme,
        item.objective.to_lowercase(),
        item.image_type,
        style_guide.cta,
        hashtags
    )
}

fn apply_generated_image(item: &mut ContentPlanItem, style_guide: &StyleGuide, renderer: &dyn ImageRenderer) {
    if item.prompt.is_empty() {
        item.prompt = generate_auto_prompt(item, style_guide);
    }
    if item.image_preview.is_none() {
        let image = renderer.generate_image(item, &item.prompt);
        item.image_preview = Some(image.into_string());
    }
    item.image_status = ImageStatus::Generated;
}

fn apply_description(item: &mut ContentPlanItem, style_guide: &StyleGuide) {
    let hashtags = hashtags_for(item, style_guide);
    item.description = description_for(item, style_guide, &hashtags);
    item.hashtags = hashtags;
    item.cta_used = style_guide.cta.clone();
}

/// Content planning state: style guide, outline items and approval flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCalendar {
    style_guide: StyleGuide,
    instagram_handle: String,
    items: Vec<ContentPlanItem>,
    approved: bool,
    analysis_summary: String,
}

impl ContentCalendar {
    pub fn new(style_guide: StyleGuide, instagram_handle: impl Into<String>) -> Self {
        Self {
            style_guide,
            instagram_handle: instagram_handle.into(),
            items: Vec::new(),
            approved: false,
            analysis_summary: String::new(),
        }
    }

    pub fn style_guide(&self) -> &StyleGuide {
        &self.style_guide
    }

    pub fn instagram_handle(&self) -> &str {
        &self.instagram_handle
    }

    pub fn items(&self) -> &[ContentPlanItem] {
        &self.items
    }

    pub fn item(&self, day: u32) -> Option<&ContentPlanItem> {
        self.items.iter().find(|i| i.day == day)
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    pub fn analysis_summary(&self) -> &str {
        &self.analysis_summary
    }

    /// Takes effect for items generated afterwards
    pub fn set_style_guide(&mut self, style_guide: StyleGuide) {
        self.style_guide = style_guide;
    }

    pub fn set_instagram_handle(&mut self, handle: impl Into<String>) {
        self.instagram_handle = handle.into();
    }

    /// Replace the outline with 30 fresh items and drop any prior approval
    pub fn build_outline(&mut self) {
        let outline = build_outline(&self.style_guide, &self.instagram_handle);
        self.items = outline.items;
        self.approved = false;
        self.analysis_summary = outline.analysis_summary;
        log::info!("Built {}-day outline for {}", self.items.len(), self.instagram_handle);
    }

    pub fn approve_outline(&mut self) -> Result<()> {
        if self.items.is_empty() {
            return Err(TrieneError::Validation(
                "Build an outline before approving it".to_string(),
            ));
        }
        self.approved = true;
        log::info!("Outline approved");
        Ok(())
    }

    fn require_approval(&self, action: &str) -> Result<()> {
        if self.approved {
            Ok(())
        } else {
            Err(TrieneError::Validation(format!(
                "Approve the outline before {}",
                action
            )))
        }
    }

    fn item_mut(&mut self, day: u32) -> Result<&mut ContentPlanItem> {
        self.items
            .iter_mut()
            .find(|i| i.day == day)
            .ok_or_else(|| TrieneError::NotFound(format!("No outline item for day {}", day)))
    }

    pub fn update_prompt(&mut self, day: u32, prompt: impl Into<String>) -> Result<()> {
        self.item_mut(day)?.prompt = prompt.into();
        Ok(())
    }

    pub fn regenerate_prompt(&mut self, day: u32) -> Result<()> {
        let style_guide = self.style_guide.clone();
        let item = self.item_mut(day)?;
        item.prompt = generate_auto_prompt(item, &style_guide);
        Ok(())
    }

    pub fn update_description(&mut self, day: u32, description: impl Into<String>) -> Result<()> {
        self.item_mut(day)?.description = description.into();
        Ok(())
    }

    /// Generate one day's image; keeps any prompt or preview already present
    pub fn create_image_for_day(&mut self, day: u32, renderer: &dyn ImageRenderer) -> Result<()> {
        self.require_approval("generating images")?;
        let style_guide = self.style_guide.clone();
        let item = self.item_mut(day)?;
        apply_generated_image(item, &style_guide, renderer);
        log::debug!("Generated image for day {}", day);
        Ok(())
    }

    /// Re-render one day's image; allowed before approval
    pub fn edit_image_for_day(
        &mut self,
        day: u32,
        renderer: &dyn ImageRenderer,
        instructions: &str,
    ) -> Result<()> {
        let item = self.item_mut(day)?;
        let existing = item.image_preview.clone().map(ImageRef::new);
        let edited = renderer.edit_image(day, existing.as_ref(), instructions);
        item.image_preview = Some(edited.into_string());
        item.image_status = ImageStatus::Edited;
        log::debug!("Edited image for day {}", day);
        Ok(())
    }

    /// Overwrites description, hashtags and CTA for one day
    pub fn generate_description_for_day(&mut self, day: u32) -> Result<()> {
        self.require_approval("generating descriptions")?;
        let style_guide = self.style_guide.clone();
        let item = self.item_mut(day)?;
        apply_description(item, &style_guide);
        Ok(())
    }

    pub fn bulk_generate_images(&mut self, renderer: &dyn ImageRenderer) -> Result<()> {
        self.require_approval("generating images in bulk")?;
        for item in self.items.iter_mut() {
            apply_generated_image(item, &self.style_guide, renderer);
        }
        log::info!("Generated images for {} days", self.items.len());
        Ok(())
    }

    pub fn bulk_generate_descriptions(&mut self) -> Result<()> {
        self.require_approval("generating descriptions")?;
        for item in self.items.iter_mut() {
            apply_description(item, &self.style_guide);
        }
        log::info!("Generated descriptions for {} days", self.items.len());
        Ok(())
    }
}
