// Adapters layer: concrete implementations for external systems (Trello HTTP API, webhooks).

pub mod trello;
pub mod webhook;

pub use trello::TrelloBoard;
pub use webhook::{evaluate, WebhookEvent, WebhookVerdict};
