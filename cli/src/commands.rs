use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use listo_core::{
    expand_id, join_words, short_id, Clock, Stats, StorageUsage, Task, TaskStore, TaskUpdate,
    TodoState,
};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use uuid::Uuid;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Todo")]
    text: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        let created: DateTime<Local> = DateTime::from(task.created_at);
        TaskRow {
            id: short_id(&task.id),
            done: if task.completed { "✔" } else { "" },
            text: task.text.clone(),
            created: created.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Turns the state's error slot into a command failure.
fn failure<S: TaskStore, C: Clock>(state: &TodoState<S, C>, fallback: &str) -> anyhow::Error {
    anyhow!("{}", state.error().unwrap_or(fallback))
}

pub fn resolve_id<S: TaskStore, C: Clock>(state: &TodoState<S, C>, input: &str) -> Result<Uuid> {
    let ids: Vec<Uuid> = state.tasks().iter().map(|t| t.id).collect();
    Ok(expand_id(input, &ids)?)
}

pub fn confirm(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn add<S: TaskStore, C: Clock>(
    state: &mut TodoState<S, C>,
    words: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let Some(task) = state.add_task(&join_words(words)) else {
        return Err(failure(state, "Failed to add todo"));
    };
    writeln!(out, "Added {} {}", short_id(&task.id), task.text)?;
    Ok(())
}

pub fn list<S: TaskStore, C: Clock>(state: &TodoState<S, C>, out: &mut impl Write) -> Result<()> {
    let tasks = state.display_tasks();
    if tasks.is_empty() {
        writeln!(out, "No todos yet. Add your first one with `listo add`.")?;
        return Ok(());
    }

    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));

    writeln!(out, "{table}")?;
    Ok(())
}

pub fn toggle<S: TaskStore, C: Clock>(
    state: &mut TodoState<S, C>,
    id: &str,
    out: &mut impl Write,
) -> Result<()> {
    let id = resolve_id(state, id)?;
    if !state.toggle_task(&id) {
        return Err(failure(state, "Failed to update todo"));
    }
    if let Some(task) = state.find(&id) {
        let mark = if task.completed { "Completed" } else { "Reopened" };
        writeln!(out, "{mark} {} {}", short_id(&task.id), task.text)?;
    }
    Ok(())
}

pub fn edit<S: TaskStore, C: Clock>(
    state: &mut TodoState<S, C>,
    id: &str,
    words: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let id = resolve_id(state, id)?;
    if !state.update_task(&id, TaskUpdate::text(join_words(words))) {
        return Err(failure(state, "Failed to update todo"));
    }
    if let Some(task) = state.find(&id) {
        writeln!(out, "Updated {} {}", short_id(&task.id), task.text)?;
    }
    Ok(())
}

pub fn remove<S: TaskStore, C: Clock>(
    state: &mut TodoState<S, C>,
    id: &str,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let id = resolve_id(state, id)?;
    if !yes && !confirm("Are you sure you want to delete this todo?", input, out)? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }
    if !state.delete_task(&id) {
        return Err(failure(state, "Failed to delete todo"));
    }
    writeln!(out, "Deleted {}", short_id(&id))?;
    Ok(())
}

pub fn clear_completed<S: TaskStore, C: Clock>(
    state: &mut TodoState<S, C>,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let completed = state.stats().completed;
    if completed == 0 {
        writeln!(out, "No completed todos to clear.")?;
        return Ok(());
    }

    let prompt = format!("Are you sure you want to remove {completed} completed todos?");
    if !yes && !confirm(&prompt, input, out)? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }

    let removed = state.clear_completed_tasks();
    if let Some(message) = state.error() {
        return Err(anyhow!("{message}"));
    }
    writeln!(out, "Removed {removed} completed todos.")?;
    Ok(())
}

pub fn stats<S: TaskStore, C: Clock>(
    state: &TodoState<S, C>,
    usage: StorageUsage,
    out: &mut impl Write,
) -> Result<()> {
    let Stats {
        total,
        completed,
        pending,
    } = state.stats();
    writeln!(out, "{total} total, {completed} completed, {pending} pending")?;
    if total > 0 {
        writeln!(out, "Progress: {}%", state.stats().progress_percent())?;
    }

    if usage.total == 0 {
        writeln!(out, "Storage: unavailable")?;
    } else {
        writeln!(
            out,
            "Storage: {} bytes ({:.2}% of {} MiB)",
            usage.used,
            usage.percentage,
            usage.total / (1024 * 1024)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use listo_core::{
        storage_usage, KeyValueTaskStore, MemoryStorage, SystemClock, TaskRepository,
    };

    type MemoryState<'a> = TodoState<KeyValueTaskStore<&'a MemoryStorage>, SystemClock>;

    fn state(storage: &MemoryStorage) -> MemoryState<'_> {
        TodoState::new(TaskRepository::new(KeyValueTaskStore::new(storage)))
    }

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_add_and_list() {
        let storage = MemoryStorage::new();
        let mut state = state(&storage);
        let mut out = Vec::new();

        add(&mut state, &words("Buy milk"), &mut out).unwrap();
        list(&state, &mut out).unwrap();

        let text = output(out);
        assert!(text.starts_with("Added "));
        assert!(text.contains("Buy milk"));
        assert!(text.contains("Created"));
    }

    #[test]
    fn test_add_blank_fails_with_validation_message() {
        let storage = MemoryStorage::new();
        let mut state = state(&storage);
        let err = add(&mut state, &[], &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Todo text cannot be empty");
    }

    #[test]
    fn test_list_empty() {
        let storage = MemoryStorage::new();
        let state = state(&storage);
        let mut out = Vec::new();
        list(&state, &mut out).unwrap();
        assert!(output(out).starts_with("No todos yet"));
    }

    #[test]
    fn test_toggle_and_edit_by_prefix() {
        let storage = MemoryStorage::new();
        let mut state = state(&storage);
        let task = state.add_task("draft").unwrap();
        let prefix = short_id(&task.id);

        toggle(&mut state, &prefix, &mut Vec::new()).unwrap();
        assert!(state.find(&task.id).unwrap().completed);

        edit(&mut state, &prefix, &words("final text"), &mut Vec::new()).unwrap();
        assert_eq!(state.find(&task.id).unwrap().text, "final text");
    }

    #[test]
    fn test_unknown_id_is_error() {
        let storage = MemoryStorage::new();
        let mut state = state(&storage);
        let err = toggle(&mut state, "deadbeef", &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Unknown id"));
    }

    #[test]
    fn test_remove_asks_for_confirmation() {
        let storage = MemoryStorage::new();
        let mut state = state(&storage);
        let task = state.add_task("maybe").unwrap();
        let prefix = short_id(&task.id);

        let mut out = Vec::new();
        remove(&mut state, &prefix, false, &mut "n\n".as_bytes(), &mut out).unwrap();
        assert_eq!(state.tasks().len(), 1);
        assert!(output(out).contains("Cancelled."));

        remove(&mut state, &prefix, false, &mut "y\n".as_bytes(), &mut Vec::new()).unwrap();
        assert!(state.tasks().is_empty());
    }

    #[test]
    fn test_clear_completed_with_yes_flag() {
        let storage = MemoryStorage::new();
        let mut state = state(&storage);
        for i in 0..5 {
            let task = state.add_task(&format!("t{i}")).unwrap();
            if i < 3 {
                state.toggle_task(&task.id);
            }
        }

        let mut out = Vec::new();
        clear_completed(&mut state, true, &mut "".as_bytes(), &mut out).unwrap();
        assert_eq!(state.tasks().len(), 2);
        assert!(output(out).contains("Removed 3 completed todos."));
    }

    #[test]
    fn test_clear_completed_nothing_to_do() {
        let storage = MemoryStorage::new();
        let mut state = state(&storage);
        state.add_task("pending").unwrap();
        let mut out = Vec::new();
        clear_completed(&mut state, false, &mut "".as_bytes(), &mut out).unwrap();
        assert!(output(out).contains("No completed todos"));
    }

    #[test]
    fn test_stats_output() {
        let storage = MemoryStorage::new();
        let mut state = state(&storage);
        let ids: Vec<Uuid> = (0..5)
            .map(|i| state.add_task(&format!("t{i}")).unwrap().id)
            .collect();
        state.toggle_task(&ids[0]);
        state.toggle_task(&ids[1]);

        let mut out = Vec::new();
        let usage = storage_usage(&storage);
        stats(&state, usage, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("5 total, 2 completed, 3 pending"));
        assert!(text.contains("Progress: 40%"));
        assert!(text.contains(&format!("Storage: {} bytes", usage.used)));
        assert!(text.contains("of 5 MiB)"));
    }

    #[test]
    fn test_stats_reports_unavailable_storage() {
        let storage = MemoryStorage::with_quota(0);
        let state = state(&storage);

        let mut out = Vec::new();
        stats(&state, storage_usage(&storage), &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("0 total, 0 completed, 0 pending"));
        assert!(!text.contains("Progress"));
        assert!(text.contains("Storage: unavailable"));
    }
}
