//! Some utility functions to display tasks

use crate::schedule::Column;
use crate::Task;

/// One line describing a task: when, what, where
pub fn format_task(task: &Task) -> String {
    let when = match (task.date(), task.time()) {
        (Some(date), Some(time)) => format!("{} {}", date, time),
        (Some(date), None) => format!("{}      ", date),
        (None, Some(time)) => format!("           {}", time),
        (None, None) => " ".repeat(16),
    };
    format!("{}  {} @ {}\t{}", when, task.title(), task.location(), task.id())
}

/// A debug utility that pretty-prints the board
pub fn format_board(columns: &[Column]) -> String {
    let mut out = String::new();
    for column in columns {
        out.push_str(&format!("{} ({})\n", column.category, column.tasks.len()));
        if column.tasks.is_empty() {
            out.push_str("    (nothing planned)\n");
        }
        for task in &column.tasks {
            out.push_str(&format!("    {}\n", format_task(task)));
            if task.description().is_empty() == false {
                out.push_str(&format!("        {}\n", task.description()));
            }
            if let Some(details) = task.maps_details() {
                out.push_str(&format!("        > {}\n", details.lines().next().unwrap_or_default()));
            }
        }
    }
    out
}

pub fn print_board(columns: &[Column]) {
    print!("{}", format_board(columns));
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, TaskDraft};

    #[test]
    fn board_lists_every_category() {
        let tasks = vec![
            Task::new(TaskDraft::new("Standup", "Office", Category::Work).with_date("2024-05-01").with_time("09:00")),
            Task::new(TaskDraft::new("Laundry", "Home", Category::Home).with_description("whites only")),
        ];
        let board = crate::schedule::board(&tasks);
        let text = format_board(&board);

        assert!(text.contains("Work (1)"));
        assert!(text.contains("2024-05-01 09:00  Standup @ Office"));
        assert!(text.contains("whites only"));
        assert!(text.contains("Courses (0)\n    (nothing planned)"));
        assert!(text.contains("Training (0)"));
    }
}
