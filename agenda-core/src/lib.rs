//! Core of the agenda manager.
//!
//! - `user`, `calendar` and `event`: the three entities, their validation and
//!   the referential checks between them (event → calendar → user)
//! - `store`: the collection store contract plus memory and file backends
//! - `validation`: field rules shared by the entities
//! - `config`: on-disk configuration

pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod repository;
pub mod store;
pub mod user;
pub mod validation;

pub use error::{AgendaError, AgendaResult, StoreError};
