use std::io;

use async_trait::async_trait;

use crate::assistant::{Coordinates, LocationInfo};
use crate::error::CollaboratorError;
use crate::Task;

/// The single durable location that holds the serialized task collection
pub trait PersistenceSlot {
    /// Returns the stored content, or `None` in case nothing has been stored yet
    fn load(&self) -> io::Result<Option<String>>;
    /// Replace the stored content. Readers must never see a partially written content.
    fn save(&mut self, content: &str) -> io::Result<()>;
}

/// A generative-AI service that knows about places and travel.
///
/// Implementors only provide the fallible calls. Callers should rather use the provided methods
/// ([`Assistant::enrich_location`] and [`Assistant::suggest_order`]), that never fail.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Look up a place, optionally biased towards the user's current position
    async fn lookup_location(&self, location: &str, near: Option<Coordinates>) -> Result<LocationInfo, CollaboratorError>;

    /// Ask for advice on the order to visit the given tasks
    async fn plan_route(&self, tasks: &[Task]) -> Result<String, CollaboratorError>;

    /// Look up a place. In case of error, the answer is a plain maps search for it
    async fn enrich_location(&self, location: &str, near: Option<Coordinates>) -> LocationInfo {
        match self.lookup_location(location, near).await {
            Ok(info) => info,
            Err(err) => {
                log::warn!("Unable to look up location {:?}: {}", location, err);
                LocationInfo::fallback(location)
            },
        }
    }

    /// Ask for advice on the order to visit the given tasks.
    ///
    /// Returns `None` without calling the service if there is no task.
    /// In case of error, the answer is an apology string.
    async fn suggest_order(&self, tasks: &[Task]) -> Option<String> {
        if tasks.is_empty() {
            return None;
        }

        match self.plan_route(tasks).await {
            Ok(advice) => Some(advice),
            Err(err) => {
                log::warn!("Unable to get an optimized plan: {}", err);
                Some(crate::assistant::PLAN_FALLBACK.to_string())
            },
        }
    }
}
