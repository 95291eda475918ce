use agenda_core::store::CollectionStore;
use agenda_core::user::{self, NewUser, UserPatch};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::{report_delete, report_update};
use crate::render::{self, Render};

pub async fn create(
    store: &dyn CollectionStore,
    name: &str,
    email: &str,
    id: Option<String>,
) -> Result<()> {
    let result = NewUser::new(name, email, id)
        .save(store)
        .await
        .with_context(|| format!("Could not create user '{}'", name.trim()))?;

    tracing::info!("User created: {} ({})", name.trim(), result.inserted_id);
    Ok(())
}

pub async fn list(store: &dyn CollectionStore) -> Result<()> {
    let users = user::find_all(store).await?;
    println!("{}", render::table(&users, "No users found"));

    tracing::info!("Listing users");
    Ok(())
}

pub async fn show(store: &dyn CollectionStore, name: &str) -> Result<()> {
    let name = name.trim();
    match user::find_by_name(store, name).await? {
        Some(user) => println!("{}", user.render()),
        None => println!("  {}", "User not found".dimmed()),
    }

    tracing::info!("User lookup: {name}");
    Ok(())
}

pub async fn update(store: &dyn CollectionStore, name: &str, patch: UserPatch) -> Result<()> {
    let name = name.trim();
    let result = user::update_by_name(store, name, patch)
        .await
        .with_context(|| format!("Could not update user '{name}'"))?;

    report_update("User", name, result);
    Ok(())
}

pub async fn delete(store: &dyn CollectionStore, name: &str) -> Result<()> {
    let name = name.trim();
    let result = user::delete_by_name(store, name).await?;

    report_delete("User", name, result);
    Ok(())
}
