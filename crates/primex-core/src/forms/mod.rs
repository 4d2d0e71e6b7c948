//! Editable form state for the three entity types and the submit workflow
//! that turns a filled form into a stored record.

mod event;
mod graphic_design;
mod web_project;

pub use event::EventForm;
pub use graphic_design::GraphicDesignForm;
pub use web_project::WebProjectForm;

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::config::PrimexConfig;
use crate::error::{PrimexError, Result};
use crate::model::{Event, GraphicDesign, WebProject};
use crate::portfolio::PortfolioStore;
use crate::remote::{RemoteClient, RemoteOutcome, WebsitePayload};

/// Common surface of the entity forms.
pub trait FormState: Default {
    /// Overwrite one field by its posted name.
    fn set_field(&mut self, name: &str, value: &str) -> Result<()>;

    /// Required-field and format checks. Errors are `InvalidInput`.
    fn validate(&self) -> Result<()>;

    /// Clear every field.
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build a form from posted name/value pairs, in order.
    fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = Self::default();
        for (name, value) in pairs {
            form.set_field(&name, &value)?;
        }
        Ok(form)
    }
}

// -- Field helpers --

pub(crate) fn require(value: &str, label: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PrimexError::InvalidInput(format!("{label} is required")));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date as posted by a date input.
pub(crate) fn parse_form_date(value: &str, label: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        PrimexError::InvalidInput(format!("{label} must be a date (YYYY-MM-DD)"))
    })
}

/// Coerce a posted amount. Blank is zero.
pub(crate) fn parse_amount(value: &str, label: &str) -> Result<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(PrimexError::InvalidInput(format!(
            "{label} must be a number"
        ))),
    }
}

/// Checkbox values: `on`, `true`, `1`, `yes` are set; anything else is clear.
pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

// -- Submission --

/// Result of a successful local save.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome<T> {
    pub record: T,
    /// Collection length after the save.
    pub collection_len: usize,
    /// Banner text for the page.
    pub message: String,
}

/// Result of a web-project submission: the local save and the remote call
/// are reported separately.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebProjectSubmission {
    pub outcome: SubmitOutcome<WebProject>,
    pub remote: RemoteOutcome,
}

/// Validates forms, persists the records they describe, and forwards web
/// projects to the remote endpoint.
pub struct FormService {
    portfolio: Arc<PortfolioStore>,
    remote: Option<RemoteClient>,
    submit_delay: Duration,
}

impl FormService {
    pub fn new(
        portfolio: Arc<PortfolioStore>,
        remote: Option<RemoteClient>,
        submit_delay: Duration,
    ) -> Self {
        Self {
            portfolio,
            remote,
            submit_delay,
        }
    }

    pub fn from_config(config: &PrimexConfig, portfolio: Arc<PortfolioStore>) -> Result<Self> {
        let remote = if config.remote.enabled {
            Some(RemoteClient::from_config(&config.remote)?)
        } else {
            None
        };
        Ok(Self::new(
            portfolio,
            remote,
            Duration::from_millis(config.forms.submit_delay_ms),
        ))
    }

    pub fn portfolio(&self) -> &Arc<PortfolioStore> {
        &self.portfolio
    }

    /// Where web projects are forwarded, or `None` when remote submission is off.
    pub fn remote_endpoint(&self) -> Option<&str> {
        self.remote.as_ref().map(RemoteClient::endpoint)
    }

    /// Save the project locally, then send the form to the remote endpoint.
    /// A remote failure does not undo the local save. The form is left as is.
    pub async fn submit_web_project(&self, form: &WebProjectForm) -> Result<WebProjectSubmission> {
        form.validate()?;
        // Built before saving so a payload error leaves nothing behind.
        let payload = WebsitePayload::from_form(form)?;

        let record = form.into_entity(Utc::now());
        let collection_len = self.portfolio.save_web_project(&record).await?;
        tracing::info!(id = %record.id, title = %record.title, "web project saved");

        let remote = match &self.remote {
            Some(client) => client.submit(&payload).await,
            None => RemoteOutcome::Skipped,
        };

        Ok(WebProjectSubmission {
            outcome: SubmitOutcome {
                record,
                collection_len,
                message: "Web project added successfully!".into(),
            },
            remote,
        })
    }

    /// Save the event and clear the form.
    pub async fn submit_event(&self, form: &mut EventForm) -> Result<SubmitOutcome<Event>> {
        form.validate()?;
        self.pause().await;

        let record = form.into_entity(Utc::now());
        let collection_len = self.portfolio.save_event(&record).await?;
        tracing::info!(id = %record.id, name = %record.name, "event saved");
        form.reset();

        Ok(SubmitOutcome {
            record,
            collection_len,
            message: "Event added successfully!".into(),
        })
    }

    /// Save the design and clear the form.
    pub async fn submit_graphic_design(
        &self,
        form: &mut GraphicDesignForm,
    ) -> Result<SubmitOutcome<GraphicDesign>> {
        form.validate()?;
        self.pause().await;

        let record = form.into_entity(Utc::now());
        let collection_len = self.portfolio.save_graphic_design(&record).await?;
        tracing::info!(id = %record.id, title = %record.title, "graphic design saved");
        form.reset();

        Ok(SubmitOutcome {
            record,
            collection_len,
            message: "Graphic design added successfully!".into(),
        })
    }

    async fn pause(&self) {
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
    }
}
