//! Calendars: named containers owned by a user.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AgendaError, AgendaResult};
use crate::repository::{Entity, Repository, to_document};
use crate::store::{CollectionStore, DeleteResult, InsertOneResult, UpdateResult};
use crate::user::{self, User};
use crate::validation::require_non_empty;

/// A stored calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Identifier of the owning [`User`]. Checked on creation only.
    pub owner_id: String,
}

impl Entity for Calendar {
    const COLLECTION: &'static str = "calendars";
    const KEY_FIELD: &'static str = "name";
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCalendar {
    pub name: String,
    pub owner_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalendarDocument {
    name: String,
    owner_id: String,
}

impl NewCalendar {
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        NewCalendar {
            name: name.into(),
            owner_id: owner_id.into(),
        }
    }

    /// Insert the calendar once its owner is known to exist.
    ///
    /// The owner check and the insert are two separate store calls.
    pub async fn save(&self, store: &dyn CollectionStore) -> AgendaResult<InsertOneResult> {
        let name = require_non_empty(&self.name, "name")?;
        let owner_id = require_non_empty(&self.owner_id, "ownerId")?;

        if user::find_by_id(store, &owner_id).await?.is_none() {
            return Err(AgendaError::Reference(format!(
                "owner not found: no user with id '{owner_id}'"
            )));
        }

        let doc = to_document(&CalendarDocument { name, owner_id })?;
        Repository::<Calendar>::new(store).insert(doc).await
    }
}

/// Partial update. `owner_id` is stored as given; it is not checked against users.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl CalendarPatch {
    fn normalized(self) -> AgendaResult<Self> {
        Ok(CalendarPatch {
            name: self
                .name
                .map(|name| require_non_empty(&name, "name"))
                .transpose()?,
            owner_id: self
                .owner_id
                .map(|id| require_non_empty(&id, "ownerId"))
                .transpose()?,
        })
    }
}

pub async fn find_all(store: &dyn CollectionStore) -> AgendaResult<Vec<Calendar>> {
    Repository::<Calendar>::new(store).find_all().await
}

pub async fn find_by_name(
    store: &dyn CollectionStore,
    name: &str,
) -> AgendaResult<Option<Calendar>> {
    Repository::<Calendar>::new(store).find_by_key(name).await
}

pub async fn update_by_name(
    store: &dyn CollectionStore,
    name: &str,
    patch: CalendarPatch,
) -> AgendaResult<UpdateResult> {
    let set = to_document(&patch.normalized()?)?;
    Repository::<Calendar>::new(store).update_by_key(name, set).await
}

pub async fn delete_by_name(
    store: &dyn CollectionStore,
    name: &str,
) -> AgendaResult<DeleteResult> {
    Repository::<Calendar>::new(store).delete_by_key(name).await
}

/// Resolve a calendar's owner. `None` when the owner was deleted after creation.
pub async fn owner(store: &dyn CollectionStore, calendar: &Calendar) -> AgendaResult<Option<User>> {
    user::find_by_id(store, &calendar.owner_id).await
}
