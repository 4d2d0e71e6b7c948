use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, FormState};
use crate::error::{PrimexError, Result};
use crate::model::{GraphicDesign, DESIGN_CATEGORIES};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphicDesignForm {
    pub title: String,
    pub category: String,
    pub image: String,
}

impl GraphicDesignForm {
    pub fn into_entity(&self, now: DateTime<Utc>) -> GraphicDesign {
        GraphicDesign::new(
            self.title.trim().to_string(),
            self.category.clone(),
            self.image.trim().to_string(),
        )
        .with_created_at(now)
    }
}

impl FormState for GraphicDesignForm {
    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "title" => self.title = value.to_string(),
            "category" => self.category = value.to_string(),
            "image" => self.image = value.to_string(),
            other => {
                return Err(PrimexError::InvalidInput(format!(
                    "unknown graphic design field: {other}"
                )))
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        require(&self.title, "design title")?;
        require(&self.category, "category")?;
        if !DESIGN_CATEGORIES.contains(&self.category.as_str()) {
            return Err(PrimexError::InvalidInput(format!(
                "unknown design category: {}",
                self.category
            )));
        }
        require(&self.image, "design image URL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_and_validate() {
        let form = GraphicDesignForm::from_pairs([
            ("title".to_string(), "Cafe logo".to_string()),
            ("category".to_string(), "Logos".to_string()),
            ("image".to_string(), "https://img/logo.png".to_string()),
        ])
        .unwrap();
        form.validate().unwrap();
        assert_eq!(form.title, "Cafe logo");
    }

    #[test]
    fn test_missing_image() {
        let form = GraphicDesignForm {
            title: "Cafe logo".into(),
            category: "Logos".into(),
            image: String::new(),
        };
        let err = form.validate().unwrap_err();
        assert!(err.to_string().contains("design image URL"));
    }

    #[test]
    fn test_unknown_category() {
        let form = GraphicDesignForm {
            title: "Poster".into(),
            category: "Murals".into(),
            image: "x.png".into(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_reset_clears_fields() {
        let mut form = GraphicDesignForm {
            title: "Poster".into(),
            category: "Print Design".into(),
            image: "x.png".into(),
        };
        form.reset();
        assert_eq!(form, GraphicDesignForm::default());
    }
}
