use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{parse_amount, parse_flag, parse_form_date, require, FormState};
use crate::error::{PrimexError, Result};
use crate::model::{WebProject, TECHNOLOGIES};

/// Field values of the web-project form.
///
/// Field names accepted by [`set_field`](FormState::set_field) are the
/// camelCase names the form posts (`clientName`, `advancePaymentDate`, ...).
/// Amounts are kept as entered and only coerced to numbers when the remote
/// payload is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebProjectForm {
    // Client
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,

    // Front-end display
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub image: String,
    pub url: String,

    // Backend
    pub contact: String,

    // Financial
    pub total: String,
    pub advance: String,
    pub advance_payment_date: String,
    pub full_payment_date: String,

    pub publish: bool,
}

impl WebProjectForm {
    /// Add `tech` when absent, remove it when present.
    pub fn toggle_technology(&mut self, tech: &str) {
        if let Some(pos) = self.technologies.iter().position(|t| t == tech) {
            self.technologies.remove(pos);
        } else {
            self.technologies.push(tech.to_string());
        }
    }

    pub fn has_technology(&self, tech: &str) -> bool {
        self.technologies.iter().any(|t| t == tech)
    }

    /// Build the locally stored record.
    pub fn into_entity(&self, now: DateTime<Utc>) -> WebProject {
        WebProject::new(
            self.title.trim().to_string(),
            self.url.trim().to_string(),
            self.image.trim().to_string(),
            self.description.trim().to_string(),
        )
        .with_technologies(self.technologies.clone())
        .with_created_at(now)
    }
}

impl FormState for WebProjectForm {
    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "clientName" => self.client_name = value.to_string(),
            "clientEmail" => self.client_email = value.to_string(),
            "clientPhone" => self.client_phone = value.to_string(),
            "title" => self.title = value.to_string(),
            "description" => self.description = value.to_string(),
            "image" => self.image = value.to_string(),
            "url" => self.url = value.to_string(),
            "contact" => self.contact = value.to_string(),
            "total" => self.total = value.to_string(),
            "advance" => self.advance = value.to_string(),
            "advancePaymentDate" => self.advance_payment_date = value.to_string(),
            "fullPaymentDate" => self.full_payment_date = value.to_string(),
            "publish" => self.publish = parse_flag(value),
            // Multi-valued: each posted value selects one tag.
            "technologies" => {
                if !value.is_empty() && !self.has_technology(value) {
                    self.technologies.push(value.to_string());
                }
            }
            other => {
                return Err(PrimexError::InvalidInput(format!(
                    "unknown web project field: {other}"
                )))
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        require(&self.title, "project title")?;
        require(&self.url, "project link")?;
        require(&self.image, "project image URL")?;
        require(&self.description, "description")?;

        if self.technologies.is_empty() {
            return Err(PrimexError::InvalidInput(
                "please select at least one technology".into(),
            ));
        }
        if let Some(unknown) = self
            .technologies
            .iter()
            .find(|t| !TECHNOLOGIES.contains(&t.as_str()))
        {
            return Err(PrimexError::InvalidInput(format!(
                "unknown technology: {unknown}"
            )));
        }

        require(&self.client_name, "client name")?;
        require(&self.client_email, "client email")?;
        require(&self.client_phone, "client contact number")?;
        require(&self.total, "total budget")?;
        require(&self.advance, "advance")?;
        parse_amount(&self.total, "total budget")?;
        parse_amount(&self.advance, "advance")?;

        require(&self.advance_payment_date, "advance paid date")?;
        parse_form_date(&self.advance_payment_date, "advance paid date")?;
        if !self.full_payment_date.trim().is_empty() {
            parse_form_date(&self.full_payment_date, "full payment date")?;
        }
        Ok(())
    }
}
