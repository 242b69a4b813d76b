//! Read-only dashboard projections over the document.

use crate::model::document::Document;

/// Counts shown on the overview screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub task_count: usize,
    pub completed_tasks: usize,
    /// Rounded percentage of completed tasks; 0 when there are no tasks.
    pub completion_rate: u8,
    pub habit_count: usize,
    pub habits_done_today: usize,
    pub goal_count: usize,
    pub goals_achieved: usize,
    pub note_count: usize,
}

impl DashboardSummary {
    pub fn from_document(document: &Document) -> Self {
        let task_count = document.tasks.len();
        let completed_tasks = document.tasks.iter().filter(|task| task.completed).count();

        Self {
            task_count,
            completed_tasks,
            completion_rate: completion_rate(completed_tasks, task_count),
            habit_count: document.habits.len(),
            habits_done_today: document
                .habits
                .iter()
                .filter(|habit| habit.completed_today)
                .count(),
            goal_count: document.goals.len(),
            goals_achieved: document.goals.iter().filter(|goal| goal.is_achieved()).count(),
            note_count: document.notes.len(),
        }
    }
}

/// Round-half-up percentage of `done` over `total`.
fn completion_rate(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total) as u128;
    let total = total as u128;
    // Integer form of round(done / total * 100); result is at most 100.
    ((done * 200 + total) / (total * 2)) as u8
}
