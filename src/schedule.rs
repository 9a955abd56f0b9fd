//! Chronological ordering of tasks
//!
//! Everything here is pure: functions borrow a collection of tasks and return views on it.
//!
//! Dates and times are compared as plain strings. This is correct only because stored dates are zero-padded
//! `YYYY-MM-DD` and stored times are zero-padded 24-hour `HH:MM` (see [`Task::validate`](crate::Task::validate)),
//! for which lexicographic order is chronological order.

use std::cmp::Ordering;

use crate::category::Category;
use crate::task::Task;

/// Tasks of a single category
#[derive(Clone, Debug, PartialEq)]
pub struct Column<'a> {
    pub category: Category,
    pub tasks: Vec<&'a Task>,
}

/// Split tasks into the four categories, in board order.
///
/// Every category is present, even when it has no task. Tasks keep their relative order.
pub fn group_by_category<'a>(tasks: &'a [Task]) -> Vec<Column<'a>> {
    Category::ALL.iter()
        .map(|&category| Column {
            category,
            tasks: tasks.iter().filter(|t| t.category() == category).collect(),
        })
        .collect()
}

/// Order tasks the way a column displays them:
/// dated tasks first, by ascending date; then, for equal (or missing) dates, timed tasks first, by ascending time.
/// Tasks that compare equal keep their relative order.
pub fn sort_within_category(tasks: &mut [&Task]) {
    tasks.sort_by(|a, b| column_order(a, b));
}

fn column_order(a: &Task, b: &Task) -> Ordering {
    present_first(a.date(), b.date())
        .then_with(|| present_first(a.time(), b.time()))
}

fn present_first(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The four columns, each one sorted with [`sort_within_category`]
pub fn board<'a>(tasks: &'a [Task]) -> Vec<Column<'a>> {
    let mut columns = group_by_category(tasks);
    for column in columns.iter_mut() {
        sort_within_category(&mut column.tasks);
    }
    columns
}

/// The locations to visit, in chronological order, across every category.
///
/// See [`global_itinerary_tasks`] for the ordering rule.
pub fn derive_global_itinerary(tasks: &[Task]) -> Vec<&str> {
    global_itinerary_tasks(tasks).into_iter()
        .map(|t| t.location())
        .collect()
}

/// Tasks that have a location, in chronological order, across every category.
///
/// Two tasks are compared by date when both have different dates, otherwise by time when both have one.
/// In every other case they keep their relative order: a task without a date is not pushed to either end.
///
/// This rule is not a total order (e.g. `[05-02, no date 08:00, 05-01 09:00]`), which `slice::sort_by` does not accept.
/// It is thus applied as a stable insertion sort, where a task only moves before another one that is strictly greater.
pub fn global_itinerary_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = Vec::with_capacity(tasks.len());
    for task in tasks.iter().filter(|t| t.location().trim().is_empty() == false) {
        let mut index = sorted.len();
        while index > 0 && itinerary_order(sorted[index - 1], task) == Ordering::Greater {
            index -= 1;
        }
        sorted.insert(index, task);
    }
    sorted
}

fn itinerary_order(a: &Task, b: &Task) -> Ordering {
    if let (Some(date_a), Some(date_b)) = (a.date(), b.date()) {
        if date_a != date_b {
            return date_a.cmp(date_b);
        }
    }
    if let (Some(time_a), Some(time_b)) = (a.time(), b.time()) {
        return time_a.cmp(time_b);
    }
    Ordering::Equal
}
