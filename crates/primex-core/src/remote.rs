//! Forwarding web projects to the studio backend.
//!
//! The remote payload carries client and pricing details that the locally
//! stored [`WebProject`](crate::model::WebProject) does not.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RemoteConfig;
use crate::error::{PrimexError, Result};
use crate::forms::{parse_amount, parse_form_date, WebProjectForm};

/// Shown when the endpoint gives no message of its own.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsitePayload {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub title: String,
    pub publish: bool,
    pub description: String,
    pub technologies: Vec<String>,
    pub image: String,
    pub url: String,
    pub contact: String,
    pub total: Price,
    pub advance: f64,
    pub advance_payment_date: Option<String>,
    pub full_payment_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub price: f64,
}

impl WebsitePayload {
    /// Build the payload from the form. Amounts are coerced to numbers (blank
    /// is zero) and dates become midnight-UTC timestamps.
    pub fn from_form(form: &WebProjectForm) -> Result<Self> {
        let contact = if form.contact.trim().is_empty() {
            form.client_phone.clone()
        } else {
            form.contact.clone()
        };

        Ok(Self {
            client_name: form.client_name.clone(),
            client_email: form.client_email.clone(),
            client_phone: form.client_phone.clone(),
            title: form.title.clone(),
            publish: form.publish,
            description: form.description.clone(),
            technologies: form.technologies.clone(),
            image: form.image.clone(),
            url: form.url.clone(),
            contact,
            total: Price {
                price: parse_amount(&form.total, "total budget")?,
            },
            advance: parse_amount(&form.advance, "advance")?,
            advance_payment_date: iso_date(&form.advance_payment_date, "advance paid date")?,
            full_payment_date: iso_date(&form.full_payment_date, "full payment date")?,
        })
    }
}

/// `2024-05-01` -> `2024-05-01T00:00:00.000Z`; blank -> `None`.
fn iso_date(value: &str, label: &str) -> Result<Option<String>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    let date = parse_form_date(value, label)?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| PrimexError::InvalidInput(format!("{label} is out of range")))?;
    Ok(Some(
        midnight.and_utc().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    ))
}

/// Body returned by the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// What happened to the remote half of a web-project submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RemoteOutcome {
    /// Remote submission is disabled.
    Skipped,
    Accepted { message: String },
    /// The endpoint answered but reported `success: false`.
    Rejected { message: String },
    /// Transport error or non-2xx status.
    Failed { message: String },
}

impl RemoteOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Skipped => None,
            Self::Accepted { message } | Self::Rejected { message } | Self::Failed { message } => {
                Some(message)
            }
        }
    }
}

/// One-shot JSON POST client. No retries.
pub struct RemoteClient {
    endpoint: String,
    http: reqwest::Client,
}

impl RemoteClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the payload. Every failure mode is folded into the outcome.
    pub async fn submit(&self, payload: &WebsitePayload) -> RemoteOutcome {
        let response = match self.http.post(&self.endpoint).json(payload).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "remote submission failed");
                return RemoteOutcome::Failed {
                    message: GENERIC_FAILURE.into(),
                };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<RemoteResponse>(&body).ok();
        let server_message = parsed
            .as_ref()
            .and_then(|r| r.message.clone())
            .filter(|m| !m.trim().is_empty());

        if !status.is_success() {
            tracing::warn!(endpoint = %self.endpoint, %status, "remote endpoint returned an error");
            return RemoteOutcome::Failed {
                message: server_message.unwrap_or_else(|| GENERIC_FAILURE.into()),
            };
        }

        match parsed {
            Some(r) if r.success => {
                tracing::info!(title = %payload.title, "web project accepted by remote endpoint");
                RemoteOutcome::Accepted {
                    message: server_message.unwrap_or_else(|| "Website added successfully!".into()),
                }
            }
            Some(_) => {
                tracing::warn!(title = %payload.title, "remote endpoint rejected web project");
                RemoteOutcome::Rejected {
                    message: server_message.unwrap_or_else(|| GENERIC_FAILURE.into()),
                }
            }
            None => {
                tracing::warn!(endpoint = %self.endpoint, "unreadable response from remote endpoint");
                RemoteOutcome::Failed {
                    message: GENERIC_FAILURE.into(),
                }
            }
        }
    }
}
