use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{parse_form_date, require, FormState};
use crate::error::{PrimexError, Result};
use crate::model::{Event, EVENT_CATEGORIES};

/// Field values of the event form, including the image list being built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub name: String,
    pub category: String,
    pub images: Vec<String>,
    pub main_image: String,
    pub description: String,
    pub date: String,
    /// URL typed into the "add image" box, not yet added to `images`.
    pub new_image: String,
}

impl EventForm {
    /// Append a trimmed image URL. Blank input is ignored. The first image
    /// added while no main image is set becomes the main image.
    /// Returns `true` when an image was added.
    pub fn add_image(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }
        self.images.push(url.to_string());
        if self.main_image.is_empty() {
            self.main_image = url.to_string();
        }
        true
    }

    /// Add whatever is in the "add image" box and clear it.
    pub fn add_pending_image(&mut self) -> bool {
        let pending = std::mem::take(&mut self.new_image);
        self.add_image(&pending)
    }

    /// Remove the image at `index`. When it was the main image, the new first
    /// image becomes main, or main is cleared when no images remain.
    pub fn remove_image(&mut self, index: usize) -> Result<String> {
        if index >= self.images.len() {
            return Err(PrimexError::InvalidInput(format!(
                "no image at position {index}"
            )));
        }
        let removed = self.images.remove(index);
        if self.main_image == removed {
            self.main_image = self.images.first().cloned().unwrap_or_default();
        }
        Ok(removed)
    }

    /// Mark one of the listed images as main.
    pub fn set_main_image(&mut self, url: &str) -> Result<()> {
        if !self.images.iter().any(|i| i == url) {
            return Err(PrimexError::InvalidInput(
                "main image must be one of the event's images".into(),
            ));
        }
        self.main_image = url.to_string();
        Ok(())
    }

    pub fn into_entity(&self, now: DateTime<Utc>) -> Event {
        Event::new(
            self.name.trim().to_string(),
            self.category.clone(),
            self.description.trim().to_string(),
            self.date.trim().to_string(),
        )
        .with_images(self.images.clone(), self.main_image.clone())
        .with_created_at(now)
    }
}

impl FormState for EventForm {
    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "name" => self.name = value.to_string(),
            "category" => self.category = value.to_string(),
            "mainImage" => self.main_image = value.to_string(),
            "description" => self.description = value.to_string(),
            "date" => self.date = value.to_string(),
            "newImage" => self.new_image = value.to_string(),
            // Multi-valued: each posted value is one image already in the list.
            "images" => {
                self.add_image(value);
            }
            other => {
                return Err(PrimexError::InvalidInput(format!(
                    "unknown event field: {other}"
                )))
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        require(&self.name, "event name")?;
        require(&self.category, "event category")?;
        if !EVENT_CATEGORIES.contains(&self.category.as_str()) {
            return Err(PrimexError::InvalidInput(format!(
                "unknown event category: {}",
                self.category
            )));
        }
        require(&self.date, "event date")?;
        parse_form_date(&self.date, "event date")?;
        require(&self.description, "description")?;
        if !self.main_image.is_empty() && !self.images.contains(&self.main_image) {
            return Err(PrimexError::InvalidInput(
                "main image must be one of the event's images".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> EventForm {
        EventForm {
            name: "Launch night".into(),
            category: "Product Launches".into(),
            description: "Full coverage".into(),
            date: "2024-05-31".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_image_becomes_main() {
        let mut form = EventForm::default();
        assert!(form.add_image("  a.jpg "));
        assert!(form.add_image("b.jpg"));
        assert_eq!(form.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(form.main_image, "a.jpg");
    }

    #[test]
    fn test_blank_image_ignored() {
        let mut form = EventForm::default();
        assert!(!form.add_image("   "));
        assert!(form.images.is_empty());
        assert!(form.main_image.is_empty());
    }

    #[test]
    fn test_add_pending_image_clears_box() {
        let mut form = EventForm::default();
        form.set_field("newImage", "c.jpg").unwrap();
        assert!(form.add_pending_image());
        assert!(form.new_image.is_empty());
        assert_eq!(form.images, vec!["c.jpg"]);
    }

    #[test]
    fn test_remove_main_reassigns_to_new_first() {
        let mut form = EventForm::default();
        form.add_image("a.jpg");
        form.add_image("b.jpg");
        form.add_image("c.jpg");
        assert_eq!(form.main_image, "a.jpg");

        form.remove_image(0).unwrap();
        assert_eq!(form.main_image, "b.jpg");
    }

    #[test]
    fn test_remove_last_image_clears_main() {
        let mut form = EventForm::default();
        form.add_image("a.jpg");
        form.remove_image(0).unwrap();
        assert!(form.images.is_empty());
        assert_eq!(form.main_image, "");
    }

    #[test]
    fn test_remove_other_image_keeps_main() {
        let mut form = EventForm::default();
        form.add_image("a.jpg");
        form.add_image("b.jpg");
        form.set_main_image("b.jpg").unwrap();
        form.remove_image(0).unwrap();
        assert_eq!(form.main_image, "b.jpg");
    }

    #[test]
    fn test_remove_main_in_middle() {
        let mut form = EventForm::default();
        form.add_image("a.jpg");
        form.add_image("b.jpg");
        form.add_image("c.jpg");
        form.set_main_image("b.jpg").unwrap();
        form.remove_image(1).unwrap();
        assert_eq!(form.main_image, "a.jpg");
        assert_eq!(form.images, vec!["a.jpg", "c.jpg"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut form = EventForm::default();
        assert!(form.remove_image(0).is_err());
    }

    #[test]
    fn test_set_main_must_be_listed() {
        let mut form = EventForm::default();
        form.add_image("a.jpg");
        assert!(form.set_main_image("z.jpg").is_err());
        assert_eq!(form.main_image, "a.jpg");
    }

    #[test]
    fn test_posted_images_rebuild_list() {
        let mut form = EventForm::default();
        form.set_field("mainImage", "b.jpg").unwrap();
        form.set_field("images", "a.jpg").unwrap();
        form.set_field("images", "b.jpg").unwrap();
        assert_eq!(form.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(form.main_image, "b.jpg");
        form.validate().unwrap_err(); // name etc. missing
    }

    #[test]
    fn test_valid_without_images() {
        filled().validate().unwrap();
    }

    #[test]
    fn test_rejects_unknown_category() {
        let mut form = filled();
        form.category = "Birthdays".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_rejects_foreign_main_image() {
        let mut form = filled();
        form.add_image("a.jpg");
        form.main_image = "other.jpg".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_missing_date() {
        let mut form = filled();
        form.date.clear();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_into_entity() {
        let mut form = filled();
        form.add_image("a.jpg");
        form.add_image("b.jpg");
        form.set_main_image("b.jpg").unwrap();
        let now = Utc::now();
        let event = form.into_entity(now);
        assert_eq!(event.images.len(), 2);
        assert_eq!(event.main_image, "b.jpg");
        assert_eq!(event.created_at, now);
    }
}
