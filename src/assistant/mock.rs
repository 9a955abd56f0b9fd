//! An assistant with scripted answers, so that tests can make it fail on purpose

use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use crate::assistant::{Coordinates, LocationInfo};
use crate::error::CollaboratorError;
use crate::traits::Assistant;
use crate::Task;

/// This stores some behaviour tweaks, that describe how a mocked assistant will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    pub lookup_location_behaviour: (u32, u32),
    pub plan_route_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            lookup_location_behaviour: (0, n_fails),
            plan_route_behaviour: (0, n_fails),
        }
    }

    pub fn can_lookup_location(&mut self) -> Result<(), CollaboratorError> {
        decrement(&mut self.lookup_location_behaviour, "lookup_location")
    }
    pub fn can_plan_route(&mut self) -> Result<(), CollaboratorError> {
        decrement(&mut self.plan_route_behaviour, "plan_route")
    }
}

/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), CollaboratorError> {
    if value.0 > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if value.1 > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(CollaboratorError::Scripted(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value)))
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}


/// Every call made to a [`MockAssistant`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallLog {
    /// Looked up locations, with the position they were biased towards
    pub lookups: Vec<(String, Option<Coordinates>)>,
    /// Titles of the tasks of every plan request
    pub plans: Vec<Vec<String>>,
}

/// An assistant that answers deterministically from its input
#[derive(Debug, Default)]
pub struct MockAssistant {
    behaviour: Mutex<MockBehaviour>,
    calls: Mutex<CallLog>,
}

impl MockAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour: Mutex::new(behaviour),
            calls: Mutex::new(CallLog::default()),
        }
    }

    /// Returns a copy of the calls that have been made so far
    pub fn calls(&self) -> CallLog {
        self.calls.lock().unwrap().clone()
    }

    /// The details this mock answers for a location
    pub fn details_for(location: &str) -> String {
        format!("{} is just around the corner", location)
    }

    /// The link this mock answers for a location
    pub fn maps_url_for(location: &str) -> Url {
        let mut url = Url::parse("https://maps.example.com/place").unwrap();
        url.query_pairs_mut().append_pair("q", location);
        url
    }
}

#[async_trait]
impl Assistant for MockAssistant {
    async fn lookup_location(&self, location: &str, near: Option<Coordinates>) -> Result<LocationInfo, CollaboratorError> {
        self.calls.lock().unwrap().lookups.push((location.to_string(), near));
        self.behaviour.lock().unwrap().can_lookup_location()?;

        Ok(LocationInfo {
            details: Self::details_for(location),
            maps_url: Self::maps_url_for(location),
        })
    }

    async fn plan_route(&self, tasks: &[Task]) -> Result<String, CollaboratorError> {
        let titles: Vec<String> = tasks.iter().map(|t| t.title().to_string()).collect();
        self.calls.lock().unwrap().plans.push(titles.clone());
        self.behaviour.lock().unwrap().can_plan_route()?;

        Ok(format!("Suggested order: {}", titles.join(" -> ")))
    }
}
