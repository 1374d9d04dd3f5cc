pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{TrelloBoard, WebhookVerdict};
pub use app::{BoardAutomator, TimedJob, TimerPlan};
pub use config::{BoardConfig, LogFormat};
pub use core::engine::ResolutionEngine;
pub use core::schedule::Schedule;
pub use domain::model::{Card, CardDates, ResolvedAction, Slot, Tag, TagSet};
pub use domain::ports::{BoardRepository, Clock, FixedClock, SystemClock};
pub use utils::error::{BoardError, Result};
