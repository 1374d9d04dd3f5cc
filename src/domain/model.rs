use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::BoardError;

/// Closed label vocabulary understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Task,
    Reverse,
    Static,
    Strict,
    Morning,
    Night,
}

impl Tag {
    pub const ALL: [Tag; 10] = [
        Tag::Daily,
        Tag::Weekly,
        Tag::Biweekly,
        Tag::Monthly,
        Tag::Task,
        Tag::Reverse,
        Tag::Static,
        Tag::Strict,
        Tag::Morning,
        Tag::Night,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tag::Daily => "Daily",
            Tag::Weekly => "Weekly",
            Tag::Biweekly => "Biweekly",
            Tag::Monthly => "Monthly",
            Tag::Task => "Task",
            Tag::Reverse => "Reverse",
            Tag::Static => "Static",
            Tag::Strict => "Strict",
            Tag::Morning => "Morning",
            Tag::Night => "Night",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tag {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| BoardError::UnknownTag {
                name: s.to_string(),
            })
    }
}

/// Set of tags carried by a card, stored as a bitset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagSet(u16);

impl TagSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, tag: Tag) -> Self {
        self.insert(tag);
        self
    }

    pub fn insert(&mut self, tag: Tag) {
        self.0 |= tag.bit();
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub fn contains_any(&self, tags: &[Tag]) -> bool {
        tags.iter().any(|tag| self.contains(*tag))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        Tag::ALL.into_iter().filter(|tag| self.contains(*tag))
    }

    /// Splits label names into known tags and the names nothing matched.
    pub fn parse_labels<'a, I>(names: I) -> (TagSet, Vec<String>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tags = TagSet::empty();
        let mut unknown = Vec::new();
        for name in names {
            match name.parse::<Tag>() {
                Ok(tag) => tags.insert(tag),
                Err(_) => unknown.push(name.to_string()),
            }
        }
        (tags, unknown)
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        let mut tags = TagSet::empty();
        for tag in iter {
            tags.insert(tag);
        }
        tags
    }
}

impl Serialize for TagSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tags = Vec::<Tag>::deserialize(deserializer)?;
        Ok(tags.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Complete,
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckItem {
    pub id: String,
    pub name: String,
    pub state: ItemState,
    pub pos: f64,
}

impl CheckItem {
    pub fn is_complete(&self) -> bool {
        self.state == ItemState::Complete
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: String,
    pub name: String,
    pub items: Vec<CheckItem>,
}

impl Checklist {
    /// Stable sort by position; equal positions keep their original order.
    pub fn sort_items(&mut self) {
        self.items.sort_by(|a, b| a.pos.total_cmp(&b.pos));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDates {
    pub start: Option<DateTime<Utc>>,
    pub due: Option<DateTime<Utc>>,
}

impl CardDates {
    pub fn new(start: Option<DateTime<Utc>>, due: Option<DateTime<Utc>>) -> Self {
        Self { start, due }
    }

    /// Start when present, otherwise due.
    pub fn known(&self) -> Option<DateTime<Utc>> {
        self.start.or(self.due)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub dates: CardDates,
    #[serde(default)]
    pub due_complete: bool,
    #[serde(default)]
    pub tags: TagSet,
    #[serde(default)]
    pub checklists: Vec<Checklist>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unrecognized_labels: Vec<String>,
}

impl Card {
    pub fn has(&self, tag: Tag) -> bool {
        self.tags.contains(tag)
    }
}

/// One board list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListPosition {
    #[default]
    Top,
    Bottom,
}

impl ListPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            ListPosition::Top => "top",
            ListPosition::Bottom => "bottom",
        }
    }
}

/// What a clone keeps from its template card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloneKind {
    /// Checklists, labels and the supplied dates.
    Full,
    /// Name and labels only; no checklists and no dates.
    Lossy,
}

/// A side effect the engine wants applied to the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResolvedAction {
    CompleteItem {
        checklist_id: String,
        item: CheckItem,
    },
    MoveCard {
        target: usize,
        position: ListPosition,
    },
    CloneCard {
        dates: CardDates,
        target: usize,
        kind: CloneKind,
        complete_items: bool,
    },
    /// Rewrites the card's dates and clears its completion tick, so an update
    /// carrying unchanged dates still un-ticks the card.
    UpdateCardDates {
        dates: CardDates,
        target: Option<usize>,
    },
    Reject {
        reason: String,
    },
}
