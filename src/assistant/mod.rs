//! Collaborators that bring map and travel knowledge to the agenda
//!
//! See [`Assistant`](crate::traits::Assistant) for the interface they implement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::traits::Assistant;
use crate::error::CollaboratorError;
use crate::Task;

pub mod gemini;
pub use gemini::GeminiAssistant;
pub mod mock;
pub use mock::MockAssistant;

/// Text shown instead of location details when the lookup failed
pub const DETAILS_FALLBACK: &str = "Unable to retrieve precise details from Maps.";
/// Text shown instead of an optimized plan when the assistant failed
pub const PLAN_FALLBACK: &str = "Unable to generate an optimized plan at the moment.";

/// A position on Earth, in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// What an assistant knows about a place
#[derive(Clone, Debug, PartialEq)]
pub struct LocationInfo {
    /// Free text on how to get there
    pub details: String,
    /// A navigable link to the place
    pub maps_url: Url,
}

impl LocationInfo {
    /// What is known about a place when nobody could be asked
    pub fn fallback(location: &str) -> Self {
        Self {
            details: DETAILS_FALLBACK.to_string(),
            maps_url: crate::maps::search_url(location),
        }
    }
}


/// An assistant that is never available, so that every call gives the fallback value.
///
/// This is useful when no API key is configured.
#[derive(Clone, Debug, Default)]
pub struct OfflineAssistant;

#[async_trait]
impl Assistant for OfflineAssistant {
    async fn lookup_location(&self, _location: &str, _near: Option<Coordinates>) -> Result<LocationInfo, CollaboratorError> {
        Err(CollaboratorError::Unavailable)
    }

    async fn plan_route(&self, _tasks: &[Task]) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::Unavailable)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, TaskDraft};

    #[tokio::test]
    async fn offline_assistant_gives_fallbacks() {
        let _ = env_logger::builder().is_test(true).try_init();

        let offline = OfflineAssistant;
        let info = offline.enrich_location("Stazione Centrale", None).await;
        assert_eq!(info.details, DETAILS_FALLBACK);
        assert_eq!(info.maps_url.as_str(), "https://www.google.com/maps/search/?api=1&query=Stazione+Centrale");

        let tasks = vec![Task::new(TaskDraft::new("Train", "Stazione Centrale", Category::Work))];
        assert_eq!(offline.suggest_order(&tasks).await.as_deref(), Some(PLAN_FALLBACK));
    }

    #[tokio::test]
    async fn no_task_no_plan() {
        let offline = OfflineAssistant;
        assert_eq!(offline.suggest_order(&[]).await, None);
    }
}
