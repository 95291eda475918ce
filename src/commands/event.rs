use agenda_core::event::{self, EventPatch, NewEvent};
use agenda_core::store::CollectionStore;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::{report_delete, report_update};
use crate::render::{self, Render};

pub async fn create(
    store: &dyn CollectionStore,
    title: &str,
    date: &str,
    time: &str,
    location: &str,
    calendar_name: &str,
) -> Result<()> {
    NewEvent::new(title, date, time, location, calendar_name)
        .save(store)
        .await
        .with_context(|| format!("Could not create event '{}'", title.trim()))?;

    tracing::info!("Event created: {}", title.trim());
    Ok(())
}

pub async fn list(store: &dyn CollectionStore) -> Result<()> {
    let events = event::find_all(store).await?;
    println!("{}", render::table(&events, "No events found"));

    tracing::info!("Listing events");
    Ok(())
}

pub async fn show(store: &dyn CollectionStore, title: &str) -> Result<()> {
    let title = title.trim();
    match event::find_by_title(store, title).await? {
        Some(evt) => {
            println!("{}", evt.render());
            match event::calendar_of(store, &evt).await? {
                Some(cal) => println!("  {}", format!("in calendar {cal}").dimmed()),
                None => println!("  {}", "calendar no longer exists".yellow()),
            }
        }
        None => println!("  {}", "Event not found".dimmed()),
    }

    tracing::info!("Event lookup: {title}");
    Ok(())
}

pub async fn update(store: &dyn CollectionStore, title: &str, patch: EventPatch) -> Result<()> {
    let title = title.trim();
    let result = event::update_by_title(store, title, patch)
        .await
        .with_context(|| format!("Could not update event '{title}'"))?;

    report_update("Event", title, result);
    Ok(())
}

pub async fn delete(store: &dyn CollectionStore, title: &str) -> Result<()> {
    let title = title.trim();
    let result = event::delete_by_title(store, title).await?;

    report_delete("Event", title, result);
    Ok(())
}
