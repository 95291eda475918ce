use agenda_core::calendar::{self, CalendarPatch, NewCalendar};
use agenda_core::store::CollectionStore;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::{report_delete, report_update};
use crate::render::{self, Render};

pub async fn create(store: &dyn CollectionStore, name: &str, owner_id: &str) -> Result<()> {
    NewCalendar::new(name, owner_id)
        .save(store)
        .await
        .with_context(|| format!("Could not create calendar '{}'", name.trim()))?;

    tracing::info!("Calendar created: {}", name.trim());
    Ok(())
}

pub async fn list(store: &dyn CollectionStore) -> Result<()> {
    let calendars = calendar::find_all(store).await?;
    println!("{}", render::table(&calendars, "No calendars found"));

    tracing::info!("Listing calendars");
    Ok(())
}

pub async fn show(store: &dyn CollectionStore, name: &str) -> Result<()> {
    let name = name.trim();
    match calendar::find_by_name(store, name).await? {
        Some(cal) => {
            println!("{}", cal.render());
            match calendar::owner(store, &cal).await? {
                Some(owner) => println!("  {}", format!("owned by {owner}").dimmed()),
                None => println!("  {}", "owner no longer exists".yellow()),
            }
        }
        None => println!("  {}", "Calendar not found".dimmed()),
    }

    tracing::info!("Calendar lookup: {name}");
    Ok(())
}

pub async fn update(store: &dyn CollectionStore, name: &str, patch: CalendarPatch) -> Result<()> {
    let name = name.trim();
    let result = calendar::update_by_name(store, name, patch)
        .await
        .with_context(|| format!("Could not update calendar '{name}'"))?;

    report_update("Calendar", name, result);
    Ok(())
}

pub async fn delete(store: &dyn CollectionStore, name: &str) -> Result<()> {
    let name = name.trim();
    let result = calendar::delete_by_name(store, name).await?;

    report_delete("Calendar", name, result);
    Ok(())
}
