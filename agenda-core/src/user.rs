//! Users: the owners of calendars.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AgendaResult;
use crate::repository::{Entity, Repository, to_document};
use crate::store::{CollectionStore, DeleteResult, InsertOneResult, UpdateResult};
use crate::validation::{require_non_empty, validate_email, validate_name};

/// A stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const KEY_FIELD: &'static str = "name";
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// A user that has not been saved yet. Nothing is validated until [`NewUser::save`].
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Caller-chosen identifier; the store generates one when absent.
    pub id: Option<String>,
}

#[derive(Serialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, id: Option<String>) -> Self {
        NewUser {
            name: name.into(),
            email: email.into(),
            id,
        }
    }

    pub async fn save(&self, store: &dyn CollectionStore) -> AgendaResult<InsertOneResult> {
        let name = require_non_empty(&self.name, "name")?;
        let email = require_non_empty(&self.email, "email")?;
        validate_name(&name)?;
        validate_email(&email)?;

        let doc = to_document(&UserDocument {
            id: self
                .id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            name,
            email,
        })?;

        Repository::<User>::new(store).insert(doc).await
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserPatch {
    fn normalized(self) -> AgendaResult<Self> {
        let name = match self.name {
            Some(name) => {
                validate_name(&name)?;
                Some(name.trim().to_string())
            }
            None => None,
        };
        let email = match self.email {
            Some(email) => {
                validate_email(&email)?;
                Some(email.trim().to_string())
            }
            None => None,
        };
        Ok(UserPatch { name, email })
    }
}

pub async fn find_all(store: &dyn CollectionStore) -> AgendaResult<Vec<User>> {
    Repository::<User>::new(store).find_all().await
}

pub async fn find_by_name(store: &dyn CollectionStore, name: &str) -> AgendaResult<Option<User>> {
    Repository::<User>::new(store).find_by_key(name).await
}

pub async fn find_by_id(store: &dyn CollectionStore, id: &str) -> AgendaResult<Option<User>> {
    Repository::<User>::new(store).find_by_id(id).await
}

pub async fn update_by_name(
    store: &dyn CollectionStore,
    name: &str,
    patch: UserPatch,
) -> AgendaResult<UpdateResult> {
    let set = to_document(&patch.normalized()?)?;
    Repository::<User>::new(store).update_by_key(name, set).await
}

pub async fn delete_by_name(store: &dyn CollectionStore, name: &str) -> AgendaResult<DeleteResult> {
    Repository::<User>::new(store).delete_by_key(name).await
}
