//! Webhook-invoked automations

use super::{build_path, require_id};
use crate::error::{Error, Result};
use crate::http::{is_absolute, Connection};
use crate::types::JsonValue;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info};

/// Where a webhook trigger is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookTarget {
    /// Full webhook URL copied from the automation settings
    Url(String),
    /// Automation rule of a document
    Rule { doc_id: String, rule_id: String },
}

impl WebhookTarget {
    pub fn endpoint(&self) -> Result<String> {
        match self {
            WebhookTarget::Url(url) => {
                if !is_absolute(url.trim()) {
                    return Err(Error::invalid_input(format!(
                        "webhook URL must be an absolute http(s) URL: {url}"
                    )));
                }
                Ok(url.trim().to_string())
            }
            WebhookTarget::Rule { doc_id, rule_id } => {
                let doc_id = require_id("doc_id", doc_id)?;
                let rule_id = require_id("rule_id", rule_id)?;
                Ok(build_path(&["docs", doc_id, "hooks", "automation", rule_id]))
            }
        }
    }
}

/// Result of [`TriggerWebhook`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerWebhookOutput {
    pub status_code: u16,
    /// `requestId` from the response body, when it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub response_body: String,
}

/// POST a JSON payload to an automation webhook
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerWebhook {
    pub target: WebhookTarget,
    pub payload: JsonValue,
}

impl TriggerWebhook {
    pub fn new(target: WebhookTarget, payload: JsonValue) -> Self {
        Self { target, payload }
    }

    pub async fn run(&self, conn: &Connection) -> Result<TriggerWebhookOutput> {
        let endpoint = self.target.endpoint()?;
        info!("Triggering webhook automation");
        debug!("Webhook endpoint: {}", endpoint);

        let response = conn
            .send(Method::POST, &endpoint, Some(&self.payload))
            .await?;

        let request_id = serde_json::from_str::<JsonValue>(&response.body)
            .ok()
            .and_then(|body| body.get("requestId")?.as_str().map(str::to_string));

        info!(
            "Webhook triggered with status {}. Request ID: {}",
            response.status,
            request_id.as_deref().unwrap_or("-")
        );

        Ok(TriggerWebhookOutput {
            status_code: response.status,
            request_id,
            response_body: response.body,
        })
    }
}
