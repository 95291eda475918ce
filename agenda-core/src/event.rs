//! Events: dated entries inside a calendar.
//!
//! An event is created against a calendar *name* but stores the calendar's
//! identifier, so renaming the calendar keeps the link while deleting it
//! leaves the event pointing at nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::{self, Calendar};
use crate::error::{AgendaError, AgendaResult};
use crate::repository::{Entity, Repository, to_document};
use crate::store::{CollectionStore, DeleteResult, InsertOneResult, UpdateResult};
use crate::validation::{require_non_empty, validate_date, validate_time};

/// A stored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// `DD/MM/YYYY`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub location: String,
    pub calendar_id: String,
}

impl Entity for Event {
    const COLLECTION: &'static str = "events";
    const KEY_FIELD: &'static str = "title";
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {} @ {}", self.date, self.time, self.title, self.location)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    /// Resolved to a calendar id on save; never stored.
    pub calendar_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventDocument {
    title: String,
    date: String,
    time: String,
    location: String,
    calendar_id: String,
}

impl NewEvent {
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        location: impl Into<String>,
        calendar_name: impl Into<String>,
    ) -> Self {
        NewEvent {
            title: title.into(),
            date: date.into(),
            time: time.into(),
            location: location.into(),
            calendar_name: calendar_name.into(),
        }
    }

    pub async fn save(&self, store: &dyn CollectionStore) -> AgendaResult<InsertOneResult> {
        let title = require_non_empty(&self.title, "title")?;
        let date = require_non_empty(&self.date, "date")?;
        let time = require_non_empty(&self.time, "time")?;
        let location = require_non_empty(&self.location, "location")?;
        let calendar_name = require_non_empty(&self.calendar_name, "calendarName")?;

        validate_date(&date)?;
        validate_time(&time)?;

        let Some(calendar) = calendar::find_by_name(store, &calendar_name).await? else {
            return Err(AgendaError::Reference(format!(
                "calendar not found: '{calendar_name}'"
            )));
        };

        let doc = to_document(&EventDocument {
            title,
            date,
            time,
            location,
            calendar_id: calendar.id,
        })?;
        Repository::<Event>::new(store).insert(doc).await
    }
}

/// Partial update. Formats are checked; the calendar link cannot be changed here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.date.is_none() && self.time.is_none() && self.location.is_none()
    }

    fn normalized(self) -> AgendaResult<Self> {
        let date = self.date.map(|d| require_non_empty(&d, "date")).transpose()?;
        if let Some(date) = &date {
            validate_date(date)?;
        }
        let time = self.time.map(|t| require_non_empty(&t, "time")).transpose()?;
        if let Some(time) = &time {
            validate_time(time)?;
        }

        Ok(EventPatch {
            title: self.title.map(|t| require_non_empty(&t, "title")).transpose()?,
            date,
            time,
            location: self
                .location
                .map(|l| require_non_empty(&l, "location"))
                .transpose()?,
        })
    }
}

pub async fn find_all(store: &dyn CollectionStore) -> AgendaResult<Vec<Event>> {
    Repository::<Event>::new(store).find_all().await
}

pub async fn find_by_title(store: &dyn CollectionStore, title: &str) -> AgendaResult<Option<Event>> {
    Repository::<Event>::new(store).find_by_key(title).await
}

/// Unlike users and calendars, an empty patch is rejected.
pub async fn update_by_title(
    store: &dyn CollectionStore,
    title: &str,
    patch: EventPatch,
) -> AgendaResult<UpdateResult> {
    if patch.is_empty() {
        return Err(AgendaError::Validation("no fields given to update".into()));
    }
    let set = to_document(&patch.normalized()?)?;
    Repository::<Event>::new(store).update_by_key(title, set).await
}

pub async fn delete_by_title(store: &dyn CollectionStore, title: &str) -> AgendaResult<DeleteResult> {
    Repository::<Event>::new(store).delete_by_key(title).await
}

/// The calendar an event points at, if it still exists.
pub async fn calendar_of(store: &dyn CollectionStore, event: &Event) -> AgendaResult<Option<Calendar>> {
    Repository::<Calendar>::new(store).find_by_id(&event.calendar_id).await
}
