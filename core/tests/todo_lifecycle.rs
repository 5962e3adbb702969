use chrono::{Duration, TimeZone, Utc};
use listo_core::{
    open_file_state, FileStorage, KeyValueStorage, KeyValueTaskStore, ManualClock,
    MemoryStorage, Task, TaskRepository, TaskStore, TodoState, STORAGE_KEY,
};

fn clock() -> ManualClock {
    let start = Utc.with_ymd_and_hms(2025, 2, 3, 9, 0, 0).unwrap();
    ManualClock::stepping(start, Duration::seconds(1))
}

#[test]
fn buy_milk_lifecycle() {
    let storage = MemoryStorage::new();
    let repo = TaskRepository::with_clock(KeyValueTaskStore::new(&storage), clock());
    let mut state = TodoState::new(repo);

    let task = state.add_task("Buy milk").unwrap();
    assert!(!task.completed);
    assert!(!task.id.is_nil());
    assert_eq!(task.created_at, task.updated_at);

    assert!(state.toggle_task(&task.id));
    let toggled = state.find(&task.id).unwrap();
    assert!(toggled.completed);
    assert!(toggled.updated_at > toggled.created_at);

    assert!(state.delete_task(&task.id));
    assert!(state.tasks().is_empty());

    assert!(!state.toggle_task(&task.id));
    assert_eq!(state.error(), Some("Todo not found"));
}

#[test]
fn clear_completed_keeps_pending() {
    let storage = MemoryStorage::new();
    let repo = TaskRepository::with_clock(KeyValueTaskStore::new(&storage), clock());
    let mut state = TodoState::new(repo);

    let mut pending = Vec::new();
    for i in 0..5 {
        let task = state.add_task(&format!("task {i}")).unwrap();
        if i < 3 {
            assert!(state.toggle_task(&task.id));
        } else {
            pending.push(task.id);
        }
    }

    assert_eq!(state.clear_completed_tasks(), 3);
    let remaining: Vec<_> = state.tasks().iter().map(|t| t.id).collect();
    assert_eq!(remaining, pending);
    assert_eq!(state.repository().list().len(), 2);
    assert!(state.error().is_none());
}

#[test]
fn file_storage_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let created = {
        let mut state = open_file_state(dir.path()).unwrap();
        let a = state.add_task("first").unwrap();
        let b = state.add_task("second").unwrap();
        assert!(state.toggle_task(&a.id));
        vec![state.find(&a.id).unwrap().clone(), b]
    };

    let state = open_file_state(dir.path()).unwrap();
    assert_eq!(state.tasks(), created.as_slice());
    assert!(dir.path().join(format!("{STORAGE_KEY}.json")).exists());
}

#[test]
fn save_then_load_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let store = KeyValueTaskStore::new(FileStorage::new(dir.path()).unwrap());

    let mut tasks: Vec<Task> = (0..3)
        .map(|i| Task::new(format!("item {i}"), Utc::now() + Duration::milliseconds(i)))
        .collect();
    tasks[1].completed = true;

    store.save(&tasks).unwrap();
    assert_eq!(store.load(), tasks);
}

#[test]
fn corrupt_file_starts_empty_and_recovers_on_next_write() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path()).unwrap();
    storage.set_item(STORAGE_KEY, "[{\"id\": 42").unwrap();

    let mut state = open_file_state(dir.path()).unwrap();
    assert!(state.tasks().is_empty());
    assert!(state.error().is_none());

    state.add_task("fresh start").unwrap();
    let reopened = open_file_state(dir.path()).unwrap();
    assert_eq!(reopened.tasks().len(), 1);
}

#[test]
fn display_order_matches_expected_sequence() {
    let storage = MemoryStorage::new();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    let repo = TaskRepository::with_clock(KeyValueTaskStore::new(&storage), &clock);
    let mut state = TodoState::new(repo);

    let c = state.add_task("C").unwrap();
    clock.advance(Duration::seconds(1));
    state.add_task("A").unwrap();
    clock.advance(Duration::seconds(1));
    state.add_task("B").unwrap();
    clock.advance(Duration::seconds(1));
    let d = state.add_task("D").unwrap();

    state.toggle_task(&c.id);
    state.toggle_task(&d.id);

    let order: Vec<String> = state.display_tasks().into_iter().map(|t| t.text).collect();
    assert_eq!(order, vec!["B", "A", "C", "D"]);
}
