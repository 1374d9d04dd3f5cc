use serde::Deserialize;

use crate::utils::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub action: WebhookAction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    pub card: WebhookCard,
    #[serde(default)]
    pub old: Option<WebhookOldState>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookCard {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub due_complete: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookOldState {
    #[serde(default)]
    pub due_complete: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookVerdict {
    /// Registration probe; answer OK and do nothing.
    Acknowledge,
    Skip(&'static str),
    Resolve { card_id: String },
}

impl WebhookEvent {
    /// Only an `updateCard` that flips `dueComplete` from false to true is worth resolving.
    pub fn verdict(&self) -> WebhookVerdict {
        if self.action.kind != "updateCard" {
            return WebhookVerdict::Skip("not a card update");
        }
        let data = &self.action.data;
        if data.card.due_complete != Some(true) {
            return WebhookVerdict::Skip("card is not ticked");
        }
        if data.old.as_ref().and_then(|old| old.due_complete) == Some(true) {
            return WebhookVerdict::Skip("card was already ticked");
        }
        WebhookVerdict::Resolve {
            card_id: data.card.id.clone(),
        }
    }
}

/// Decides what to do with one webhook delivery.
pub fn evaluate(method: &str, body: &str) -> Result<WebhookVerdict> {
    if method.eq_ignore_ascii_case("HEAD") {
        return Ok(WebhookVerdict::Acknowledge);
    }
    let event: WebhookEvent = serde_json::from_str(body)?;
    let verdict = event.verdict();
    match &verdict {
        WebhookVerdict::Skip(reason) => tracing::info!("Skipping webhook: {}", reason),
        WebhookVerdict::Resolve { card_id } => tracing::info!("Webhook ticked card {}", card_id),
        WebhookVerdict::Acknowledge => {}
    }
    Ok(verdict)
}
