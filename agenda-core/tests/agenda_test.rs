//! End-to-end checks of the entity layer against both store backends.

use agenda_core::calendar::{self, CalendarPatch, NewCalendar};
use agenda_core::event::{self, EventPatch, NewEvent};
use agenda_core::store::{CollectionStore, FileStore, MemoryStore};
use agenda_core::user::{self, NewUser, UserPatch};
use agenda_core::AgendaError;
use tempfile::tempdir;

async fn full_lifecycle(store: &dyn CollectionStore) {
    // Users
    let alice = NewUser::new(" Alice ", " alice@example.com ", None)
        .save(store)
        .await
        .unwrap();
    let found = user::find_by_name(store, "Alice").await.unwrap().unwrap();
    assert_eq!(found.id, alice.inserted_id);
    assert_eq!(found.email, "alice@example.com");

    // Calendars
    let err = NewCalendar::new("Work", "no-such-user")
        .save(store)
        .await
        .unwrap_err();
    assert!(matches!(err, AgendaError::Reference(_)));
    assert!(calendar::find_all(store).await.unwrap().is_empty());

    let work = NewCalendar::new("Work", alice.inserted_id.clone())
        .save(store)
        .await
        .unwrap();

    // Events
    let err = NewEvent::new("Standup", "20/03/2025", "09:30", "Room 1", "Home")
        .save(store)
        .await
        .unwrap_err();
    assert!(matches!(err, AgendaError::Reference(_)));

    NewEvent::new("Standup", "20/03/2025", "09:30", "Room 1", "Work")
        .save(store)
        .await
        .unwrap();
    let standup = event::find_by_title(store, "Standup").await.unwrap().unwrap();
    assert_eq!(standup.calendar_id, work.inserted_id);

    // Updates
    let result = calendar::update_by_name(store, "Work", CalendarPatch::default())
        .await
        .unwrap();
    assert_eq!(result.modified_count, 0);

    let err = event::update_by_title(store, "Standup", EventPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AgendaError::Validation(_)));

    let patch = UserPatch {
        email: Some("alice@work.example".into()),
        ..Default::default()
    };
    assert_eq!(
        user::update_by_name(store, "Alice", patch).await.unwrap().modified_count,
        1
    );

    // Deletes
    assert_eq!(calendar::delete_by_name(store, "Nope").await.unwrap().deleted_count, 0);
    assert_eq!(calendar::delete_by_name(store, "Work").await.unwrap().deleted_count, 1);
    assert_eq!(event::find_all(store).await.unwrap().len(), 1);
    assert!(event::calendar_of(store, &standup).await.unwrap().is_none());
}

#[tokio::test]
async fn test_lifecycle_in_memory() {
    let store = MemoryStore::new();
    full_lifecycle(&store).await;
    store.close().await.unwrap();
}

#[tokio::test]
async fn test_lifecycle_on_disk() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path(), "agendaDB").unwrap();
    full_lifecycle(&store).await;
    store.close().await.unwrap();

    let store = FileStore::open(dir.path(), "agendaDB").unwrap();
    let users = user::find_all(&store).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "alice@work.example");
    store.close().await.unwrap();
}
