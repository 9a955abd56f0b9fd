//! Agenda tasks

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use chrono::{NaiveDate, NaiveTime};

use crate::category::Category;
use crate::assistant::LocationInfo;
use crate::error::ValidationError;


/// An opaque task identifier. It is never reused once a task has been deleted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId.
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}


/// What a user fills in when creating or editing a task
#[derive(Clone, Debug, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: Category,
    /// `HH:MM`, 24-hour, zero-padded
    pub time: Option<String>,
    /// `YYYY-MM-DD`, zero-padded
    pub date: Option<String>,
}

impl TaskDraft {
    pub fn new<S: ToString, T: ToString>(title: S, location: T, category: Category) -> Self {
        Self {
            title: title.to_string(),
            description: String::new(),
            location: location.to_string(),
            category,
            time: None,
            date: None,
        }
    }

    pub fn with_description<S: ToString>(mut self, description: S) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_date<S: ToString>(mut self, date: S) -> Self {
        self.date = non_empty(date.to_string());
        self
    }

    pub fn with_time<S: ToString>(mut self, time: S) -> Self {
        self.time = non_empty(time.to_string());
        self
    }

    /// Checks the task that would be built from this draft would be valid (see [`Task::validate`]).
    /// Blank dates and times count as absent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.location, self.date.as_deref(), self.time.as_deref())
    }
}


/// A schedulable item of the agenda
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    location: String,
    category: Category,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    date: Option<String>,

    /// Deep link cached from the last location lookup
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    maps_url: Option<String>,
    /// Descriptive text cached from the last location lookup
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_as_none")]
    maps_details: Option<String>,
}

impl Task {
    /// Create a brand new Task.
    /// This will pick a new (random) task ID.
    pub fn new(draft: TaskDraft) -> Self {
        Self::new_with_id(TaskId::random(), draft)
    }

    /// Create a Task with a given ID, with no cached location details
    pub fn new_with_id(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            category: draft.category,
            time: draft.time.and_then(non_empty),
            date: draft.date.and_then(non_empty),
            maps_url: None,
            maps_details: None,
        }
    }

    pub fn id(&self) -> &TaskId              { &self.id          }
    pub fn title(&self) -> &str              { &self.title       }
    pub fn description(&self) -> &str        { &self.description }
    pub fn location(&self) -> &str           { &self.location    }
    pub fn category(&self) -> Category       { self.category     }
    pub fn time(&self) -> Option<&str>       { self.time.as_deref() }
    pub fn date(&self) -> Option<&str>       { self.date.as_deref() }
    pub fn maps_url(&self) -> Option<&str>   { self.maps_url.as_deref() }
    pub fn maps_details(&self) -> Option<&str> { self.maps_details.as_deref() }

    /// Returns the cached maps link, or a maps search for this task's location if nothing has been cached
    pub fn maps_url_or_default(&self) -> String {
        match &self.maps_url {
            Some(url) => url.clone(),
            None => crate::maps::search_url(&self.location).to_string(),
        }
    }

    /// Returns the fields a user can edit
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            category: self.category,
            time: self.time.clone(),
            date: self.date.clone(),
        }
    }

    /// Overwrite every user-editable field. The ID and the cached location details are kept.
    pub fn apply_draft(&mut self, draft: TaskDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.location = draft.location;
        self.category = draft.category;
        self.time = draft.time.and_then(non_empty);
        self.date = draft.date.and_then(non_empty);
    }

    pub fn set_title(&mut self, title: String)             { self.title = title; }
    pub fn set_description(&mut self, description: String) { self.description = description; }
    pub fn set_location(&mut self, location: String)       { self.location = location; }
    pub fn set_category(&mut self, category: Category)     { self.category = category; }
    pub fn set_time(&mut self, time: Option<String>)       { self.time = time.and_then(non_empty); }
    pub fn set_date(&mut self, date: Option<String>)       { self.date = date.and_then(non_empty); }

    /// Cache the result of a location lookup
    pub fn set_location_info(&mut self, info: LocationInfo) {
        self.maps_url = Some(info.maps_url.to_string());
        self.maps_details = Some(info.details);
    }

    /// Checks every invariant a stored task must hold
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.location, self.date(), self.time())
    }
}


fn validate_fields(title: &str, location: &str, date: Option<&str>, time: Option<&str>) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if location.trim().is_empty() {
        return Err(ValidationError::EmptyLocation);
    }
    if let Some(date) = date.filter(|d| d.trim().is_empty() == false) {
        if is_valid_date(date) == false {
            return Err(ValidationError::InvalidDate(date.to_string()));
        }
    }
    if let Some(time) = time.filter(|t| t.trim().is_empty() == false) {
        if is_valid_time(time) == false {
            return Err(ValidationError::InvalidTime(time.to_string()));
        }
    }
    Ok(())
}

/// Dates are compared as strings, so they must be exactly `YYYY-MM-DD`, and still be a real day
pub fn is_valid_date(date: &str) -> bool {
    has_digits_and_separators(date, &[4, 7], b'-')
        && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// Times are compared as strings, so they must be exactly `HH:MM` on a 24-hour clock
pub fn is_valid_time(time: &str) -> bool {
    has_digits_and_separators(time, &[2], b':')
        && NaiveTime::parse_from_str(time, "%H:%M").is_ok()
}

fn has_digits_and_separators(s: &str, separator_positions: &[usize], separator: u8) -> bool {
    let expected_len = match separator_positions.last() {
        Some(last) => last + 3,
        None => return false,
    };
    if s.len() != expected_len {
        return false;
    }
    s.bytes().enumerate().all(|(i, b)| {
        if separator_positions.contains(&i) {
            b == separator
        } else {
            b.is_ascii_digit()
        }
    })
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Blank form fields used to be stored as empty strings
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(non_empty))
}
