use std::cmp::Ordering;

use crate::model::task::Task;

/// Display order: pending before completed, pending newest first,
/// completed oldest first.
pub fn compare_for_display(a: &Task, b: &Task) -> Ordering {
    match (a.completed, b.completed) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => b.created_at.cmp(&a.created_at),
        (true, true) => a.created_at.cmp(&b.created_at),
    }
}

pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(compare_for_display);
}

/// Returns a display-ordered copy, leaving `tasks` untouched.
pub fn display_order(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sort_for_display(&mut sorted);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(text: &str, completed: bool, created: i64) -> Task {
        let mut t = Task::new(text.to_string(), Utc.timestamp_opt(created, 0).unwrap());
        t.completed = completed;
        t
    }

    #[test]
    fn test_pending_newest_first_then_completed_oldest_first() {
        let tasks = vec![
            task("A", false, 1),
            task("B", false, 2),
            task("C", true, 0),
            task("D", true, 3),
        ];
        let order: Vec<String> = display_order(&tasks).into_iter().map(|t| t.text).collect();
        assert_eq!(order, vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_display_order_does_not_mutate_input() {
        let tasks = vec![task("old", false, 1), task("new", false, 2)];
        let _ = display_order(&tasks);
        assert_eq!(tasks[0].text, "old");
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let tasks = vec![task("first", false, 5), task("second", false, 5)];
        let order: Vec<String> = display_order(&tasks).into_iter().map(|t| t.text).collect();
        assert_eq!(order, vec!["first", "second"]);
    }
}
