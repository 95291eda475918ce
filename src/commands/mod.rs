pub mod calendar;
pub mod config;
pub mod event;
pub mod user;

use agenda_core::store::{DeleteResult, UpdateResult};

/// Log the outcome of an update; zero matches is reported, not treated as a failure.
fn report_update(entity: &str, key: &str, result: UpdateResult) {
    tracing::info!("{}", update_message(entity, key, result));
}

fn report_delete(entity: &str, key: &str, result: DeleteResult) {
    tracing::info!("{}", delete_message(entity, key, result));
}

fn update_message(entity: &str, key: &str, result: UpdateResult) -> String {
    if result.matched_count == 0 {
        format!("{entity} not found: {key}")
    } else if result.modified_count == 0 {
        format!("{entity} unchanged: {key}")
    } else {
        format!("{entity} updated: {key}")
    }
}

fn delete_message(entity: &str, key: &str, result: DeleteResult) -> String {
    if result.deleted_count > 0 {
        format!("{entity} deleted: {key}")
    } else {
        format!("{entity} not found: {key}")
    }
}
