//! This crate provides a personal agenda board.
//!
//! Tasks belong to one of four fixed [`Category`]s and are kept by a [`TaskStore`](store::TaskStore),
//! which writes them to a [`PersistenceSlot`](traits::PersistenceSlot) (usually a local file, see [`storage`]) on every change.
//!
//! The [`schedule`] module orders tasks chronologically, either per category (the board columns) or across every
//! category (the itinerary of the day), and the [`maps`] module turns such an itinerary into a Google Maps link.
//!
//! An [`Assistant`](traits::Assistant) (usually a [`GeminiAssistant`](assistant::GeminiAssistant)) looks locations up
//! and gives advice on the order to visit them. It is never required: every failure falls back to a default value. \
//! An [`Agenda`] ties all of these together.

pub mod traits;

mod category;
pub use category::Category;
mod task;
pub use task::{Task, TaskDraft, TaskId};
pub mod error;
pub use error::{AgendaError, CollaboratorError, ValidationError};

pub mod store;
pub mod storage;
pub mod schedule;
pub mod maps;
pub mod assistant;
pub mod agenda;
pub use agenda::Agenda;

pub mod config;
pub mod utils;
