use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::domain::model::{
    Card, CardDates, CheckItem, Checklist, CloneKind, ItemState, ListPosition, Slot, TagSet,
};
use crate::domain::ports::{BoardRepository, Clock, SystemClock};
use crate::utils::error::{BoardError, Result};

const KEEP_EVERYTHING: &str = "attachments,checklists,customFields,comments,labels,members,stickers";
const KEEP_LABELS: &str = "labels";

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloList {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloLabel {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloCheckItem {
    pub id: String,
    pub name: String,
    pub state: ItemState,
    #[serde(default)]
    pub pos: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloChecklist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub check_items: Vec<TrelloCheckItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloCard {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub due_complete: bool,
    #[serde(default)]
    pub labels: Vec<TrelloLabel>,
    #[serde(default)]
    pub checklists: Vec<TrelloChecklist>,
}

impl From<TrelloList> for Slot {
    fn from(list: TrelloList) -> Self {
        Slot {
            id: list.id,
            name: list.name,
        }
    }
}

impl TrelloCard {
    /// Converts the wire card, parsing dates and labels once at the boundary.
    pub fn into_card(self, now: DateTime<Utc>) -> Card {
        let (tags, unrecognized) = TagSet::parse_labels(self.labels.iter().map(|l| l.name.as_str()));
        if !unrecognized.is_empty() {
            tracing::warn!(
                "Card {} carries unrecognized labels: {}",
                self.name,
                unrecognized.join(", ")
            );
        }

        let dates = CardDates::new(
            self.start.as_deref().and_then(|raw| parse_board_date(raw, now)),
            self.due.as_deref().and_then(|raw| parse_board_date(raw, now)),
        );

        let checklists = self
            .checklists
            .into_iter()
            .map(|list| Checklist {
                id: list.id,
                name: list.name,
                items: list
                    .check_items
                    .into_iter()
                    .map(|item| CheckItem {
                        id: item.id,
                        name: item.name,
                        state: item.state,
                        pos: item.pos,
                    })
                    .collect(),
            })
            .collect();

        Card {
            id: self.id,
            name: self.name,
            dates,
            due_complete: self.due_complete,
            tags,
            checklists,
            unrecognized_labels: unrecognized,
        }
    }
}

/// Empty means no date. Anything else that fails to parse becomes `now`.
pub fn parse_board_date(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(_) => {
            let error = BoardError::UnparseableDate {
                value: raw.to_string(),
            };
            tracing::warn!("{}; using current time instead", error);
            Some(now)
        }
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// [`BoardRepository`] over the Trello REST API.
pub struct TrelloBoard {
    client: Client,
    api_base: Url,
    board_id: String,
    key: String,
    token: String,
    /// Stands in for unparseable dates on fetched cards.
    clock: Arc<dyn Clock>,
}

impl TrelloBoard {
    pub fn new(api_base: &str, board_id: &str, key: &str, token: &str) -> Result<Self> {
        let mut base = api_base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let api_base = Url::parse(&base).map_err(|e| BoardError::InvalidConfigValueError {
            field: "board.api_base".to_string(),
            value: api_base.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: Client::new(),
            api_base,
            board_id: board_id.to_string(),
            key: key.to_string(),
            token: token.to_string(),
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_base
            .join(path)
            .map_err(|e| BoardError::ConfigError {
                message: format!("Cannot build URL for {}: {}", path, e),
            })
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        form: Option<&[(&str, String)]>,
    ) -> Result<Response> {
        let url = self.endpoint(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .query(&[("key", self.key.as_str()), ("token", self.token.as_str())])
            .query(query);
        if let Some(form) = form {
            request = request.form(form);
        }

        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(BoardError::UpstreamFailure {
                status: response.status().as_u16(),
                context: format!("{} {}", method, path),
            });
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self.request(Method::GET, path, query, None).await?;
        Ok(response.json().await?)
    }

    async fn put(&self, path: &str, form: &[(&str, String)]) -> Result<()> {
        self.request(Method::PUT, path, &[], Some(form)).await?;
        Ok(())
    }

    async fn post(&self, path: &str, form: &[(&str, String)]) -> Result<Response> {
        self.request(Method::POST, path, &[], Some(form)).await
    }
}

#[async_trait]
impl BoardRepository for TrelloBoard {
    async fn list_slots(&self) -> Result<Vec<Slot>> {
        let lists: Vec<TrelloList> = self
            .get(&format!("boards/{}/lists", self.board_id), &[("fields", "id,name")])
            .await?;
        Ok(lists.into_iter().map(Slot::from).collect())
    }

    async fn cards_in(&self, slot: &Slot) -> Result<Vec<Card>> {
        let cards: Vec<TrelloCard> = self
            .get(&format!("lists/{}/cards", slot.id), &[("checklists", "all")])
            .await?;
        let now = self.clock.now();
        Ok(cards.into_iter().map(|card| card.into_card(now)).collect())
    }

    async fn card(&self, card_id: &str) -> Result<Card> {
        let card: TrelloCard = self
            .get(&format!("cards/{}", card_id), &[("checklists", "all")])
            .await?;
        Ok(card.into_card(self.clock.now()))
    }

    async fn move_card(&self, card: &Card, target: &Slot, position: ListPosition) -> Result<()> {
        self.put(
            &format!("cards/{}", card.id),
            &[
                ("idList", target.id.clone()),
                ("pos", position.as_str().to_string()),
            ],
        )
        .await
    }

    async fn clone_card(
        &self,
        template: &Card,
        dates: &CardDates,
        target: &Slot,
        kind: CloneKind,
    ) -> Result<Card> {
        let mut form = vec![
            ("idList", target.id.clone()),
            ("idCardSource", template.id.clone()),
            ("pos", ListPosition::Top.as_str().to_string()),
            ("dueComplete", "false".to_string()),
        ];
        match kind {
            CloneKind::Full => {
                form.push(("keepFromSource", KEEP_EVERYTHING.to_string()));
                form.push(("start", format_date(dates.start)));
                form.push(("due", format_date(dates.due)));
            }
            CloneKind::Lossy => form.push(("keepFromSource", KEEP_LABELS.to_string())),
        }

        let response = self.post("cards", &form).await?;
        let created: TrelloCard = response.json().await?;
        tracing::info!("Cloned {} into list {}", template.name, target.name);
        Ok(created.into_card(self.clock.now()))
    }

    async fn update_card_dates(
        &self,
        card: &Card,
        dates: &CardDates,
        target: Option<&Slot>,
    ) -> Result<()> {
        let mut form = vec![
            ("start", format_date(dates.start)),
            ("due", format_date(dates.due)),
            ("dueComplete", "false".to_string()),
        ];
        if let Some(slot) = target {
            form.push(("idList", slot.id.clone()));
            form.push(("pos", ListPosition::Top.as_str().to_string()));
        }
        self.put(&format!("cards/{}", card.id), &form).await
    }

    async fn complete_check_item(&self, card: &Card, item: &CheckItem) -> Result<()> {
        tracing::info!("Completing item {} in card {}", item.name, card.name);
        self.put(
            &format!("cards/{}/checkItem/{}", card.id, item.id),
            &[("state", "complete".to_string())],
        )
        .await
    }

    async fn move_all_cards(&self, from: &Slot, to: &Slot) -> Result<()> {
        self.post(
            &format!("lists/{}/moveAllCards", from.id),
            &[("idBoard", self.board_id.clone()), ("idList", to.id.clone())],
        )
        .await?;
        Ok(())
    }
}
