//! Interactive menu.
//!
//! Prompts run on the blocking pool so the caller can still react to Ctrl-C
//! while the terminal is waiting for input.

use agenda_core::calendar::CalendarPatch;
use agenda_core::event::EventPatch;
use agenda_core::store::CollectionStore;
use agenda_core::user::UserPatch;
use agenda_core::validation::{require_non_empty, validate_email, validate_name, validate_time};
use anyhow::Result;
use dialoguer::{Input, Select};

use crate::commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    CreateUser,
    ListUsers,
    FindUser,
    UpdateUser,
    DeleteUser,
    CreateCalendar,
    ListCalendars,
    FindCalendar,
    UpdateCalendar,
    DeleteCalendar,
    CreateEvent,
    ListEvents,
    FindEvent,
    UpdateEvent,
    DeleteEvent,
    Exit,
}

impl Action {
    const ALL: [Action; 16] = [
        Action::CreateUser,
        Action::ListUsers,
        Action::FindUser,
        Action::UpdateUser,
        Action::DeleteUser,
        Action::CreateCalendar,
        Action::ListCalendars,
        Action::FindCalendar,
        Action::UpdateCalendar,
        Action::DeleteCalendar,
        Action::CreateEvent,
        Action::ListEvents,
        Action::FindEvent,
        Action::UpdateEvent,
        Action::DeleteEvent,
        Action::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            Action::CreateUser => "Create user",
            Action::ListUsers => "List users",
            Action::FindUser => "Find user by name",
            Action::UpdateUser => "Update user",
            Action::DeleteUser => "Delete user",
            Action::CreateCalendar => "Create calendar",
            Action::ListCalendars => "List calendars",
            Action::FindCalendar => "Find calendar by name",
            Action::UpdateCalendar => "Update calendar",
            Action::DeleteCalendar => "Delete calendar",
            Action::CreateEvent => "Create event",
            Action::ListEvents => "List events",
            Action::FindEvent => "Find event by title",
            Action::UpdateEvent => "Update event",
            Action::DeleteEvent => "Delete event",
            Action::Exit => "Exit",
        }
    }
}

/// Show the menu until the user exits. A failed action is logged and the menu comes back.
pub async fn run(store: &dyn CollectionStore) -> Result<()> {
    let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
    let mut last = 0;

    loop {
        println!();
        let items = labels.clone();
        let selection = tokio::task::spawn_blocking(move || {
            Select::new()
                .with_prompt("Agenda")
                .items(&items)
                .default(last)
                .interact()
        })
        .await??;
        last = selection;

        let action = Action::ALL[selection];
        if action == Action::Exit {
            tracing::info!("Exiting");
            return Ok(());
        }

        if let Err(err) = perform(action, store).await {
            tracing::error!("{err:#}");
        }
    }
}

async fn perform(action: Action, store: &dyn CollectionStore) -> Result<()> {
    match action {
        Action::CreateUser => {
            let id = ask("User id (leave empty to generate one)").await?;
            let name = ask("Name").await?;
            validate_name(&name)?;
            let email = ask("Email").await?;
            validate_email(&email)?;
            commands::user::create(store, &name, &email, optional(id)).await
        }
        Action::ListUsers => commands::user::list(store).await,
        Action::FindUser => {
            let name = ask("User name").await?;
            commands::user::show(store, &name).await
        }
        Action::UpdateUser => {
            let name = ask("Name of the user to update").await?;
            let email = ask("New email").await?;
            validate_email(&email)?;
            let patch = UserPatch {
                email: Some(email),
                ..Default::default()
            };
            commands::user::update(store, &name, patch).await
        }
        Action::DeleteUser => {
            let name = ask("Name of the user to delete").await?;
            commands::user::delete(store, &name).await
        }

        Action::CreateCalendar => {
            let name = ask("Calendar name").await?;
            require_non_empty(&name, "calendar name")?;
            let owner = ask("Owner id").await?;
            commands::calendar::create(store, &name, &owner).await
        }
        Action::ListCalendars => commands::calendar::list(store).await,
        Action::FindCalendar => {
            let name = ask("Calendar name").await?;
            commands::calendar::show(store, &name).await
        }
        Action::UpdateCalendar => {
            let name = ask("Name of the calendar to update").await?;
            let new_name = ask("New name").await?;
            require_non_empty(&new_name, "new name")?;
            let patch = CalendarPatch {
                name: Some(new_name),
                ..Default::default()
            };
            commands::calendar::update(store, &name, patch).await
        }
        Action::DeleteCalendar => {
            let name = ask("Name of the calendar to delete").await?;
            commands::calendar::delete(store, &name).await
        }

        Action::CreateEvent => {
            let title = ask("Title").await?;
            let date = ask("Date (DD/MM/YYYY)").await?;
            let time = ask("Time (HH:MM)").await?;
            let location = ask("Location").await?;
            let calendar = ask("Calendar name").await?;
            commands::event::create(store, &title, &date, &time, &location, &calendar).await
        }
        Action::ListEvents => commands::event::list(store).await,
        Action::FindEvent => {
            let title = ask("Event title").await?;
            commands::event::show(store, &title).await
        }
        Action::UpdateEvent => {
            let title = ask("Title of the event to update").await?;
            let time = ask("New time (HH:MM)").await?;
            validate_time(&time)?;
            let patch = EventPatch {
                time: Some(time),
                ..Default::default()
            };
            commands::event::update(store, &title, patch).await
        }
        Action::DeleteEvent => {
            let title = ask("Title of the event to delete").await?;
            commands::event::delete(store, &title).await
        }

        Action::Exit => Ok(()),
    }
}

async fn ask(prompt: &str) -> Result<String> {
    let prompt = format!("  {prompt}");
    let answer = tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    })
    .await??;

    Ok(answer)
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_action_has_a_distinct_label() {
        let labels: HashSet<_> = Action::ALL.iter().map(|a| a.label()).collect();
        assert_eq!(labels.len(), Action::ALL.len());
    }

    #[test]
    fn test_exit_is_last() {
        assert_eq!(Action::ALL.last(), Some(&Action::Exit));
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional("   ".into()), None);
        assert_eq!(optional(" u1 ".into()), Some("u1".to_string()));
    }
}
