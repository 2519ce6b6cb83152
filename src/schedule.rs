//! Date filtering and ordering for the agenda and overview views
//!
//! A task is on a day's agenda when its schedule covers that day:
//! - start and due set: the day falls between their dates, inclusive
//! - only due set: the day is the due date
//! - no due: never on the agenda

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};
use crate::model::Task;

/// Whether `task` belongs on the agenda for `date`
pub fn is_active_on(task: &Task, date: NaiveDate) -> bool {
    match (task.start_at, task.due_at) {
        (Some(start), Some(due)) => start.date() <= date && date <= due.date(),
        (None, Some(due)) => due.date() == date,
        _ => false,
    }
}

/// Missing due times sort after every real one
fn due_cmp(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn stable_tail(a: &Task, b: &Task) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Daily view order: pinned, priority, due, then creation
pub fn agenda_cmp(a: &Task, b: &Task) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
        .then_with(|| due_cmp(a.due_at, b.due_at))
        .then_with(|| stable_tail(a, b))
}

/// Overview order: due first, then priority
pub fn overview_cmp(a: &Task, b: &Task) -> Ordering {
    due_cmp(a.due_at, b.due_at)
        .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
        .then_with(|| stable_tail(a, b))
}

/// Creation order, used wherever no view-specific order applies
pub fn created_cmp(a: &Task, b: &Task) -> Ordering {
    stable_tail(a, b)
}

pub fn sort_agenda(tasks: &mut [Task]) {
    tasks.sort_by(agenda_cmp);
}

pub fn sort_overview(tasks: &mut [Task]) {
    tasks.sort_by(overview_cmp);
}

/// Short schedule suffix shown after a task description.
///
/// Empty when the task has no due time.
pub fn schedule_label(task: &Task) -> String {
    match (task.start_at, task.due_at) {
        (Some(start), Some(due)) if start.date() == due.date() => {
            format!(" ({} - {})", start.format("%H:%M"), due.format("%H:%M"))
        }
        (Some(start), Some(due)) => {
            format!(" ({} - {})", start.format("%b %d"), due.format("%b %d"))
        }
        (None, Some(due)) => format!(" (Due: {})", due.format("%b %d %H:%M")),
        _ => String::new(),
    }
}

/// One-line summary used by the daily view
pub fn task_line(task: &Task) -> String {
    let pin = if task.pinned { "* " } else { "" };
    format!(
        "{pin}{} - {}{}",
        task.status,
        task.description,
        schedule_label(task)
    )
}

/// Clock line with the ISO week number
pub fn week_header(now: NaiveDateTime) -> String {
    format!(
        "{} (Week {})",
        now.format("%A, %B %-d, %Y %I:%M:%S %P"),
        now.iso_week().week()
    )
}

/// Format used for due times in listings and alarm messages
pub fn format_due(due: Option<NaiveDateTime>) -> String {
    due.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Parse a date-time argument.
///
/// Accepts `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM[:SS]`, or a bare
/// `YYYY-MM-DD` meaning midnight.
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime> {
    let trimmed = input.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(value);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(value) = date.and_hms_opt(0, 0, 0) {
            return Ok(value);
        }
    }
    Err(Error::InvalidArgument(format!(
        "invalid date-time '{}': expected YYYY-MM-DD, YYYY-MM-DD HH:MM or YYYY-MM-DDTHH:MM[:SS]",
        input
    )))
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        Error::InvalidArgument(format!("invalid date '{}': expected YYYY-MM-DD", input))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskPriority;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn task(desc: &str, start: Option<NaiveDateTime>, due: Option<NaiveDateTime>) -> Task {
        let mut task = Task::new(desc, Some("list".to_string()));
        task.start_at = start;
        task.due_at = due;
        task
    }

    #[test]
    fn ranged_task_is_active_inclusive() {
        let t = task("range", Some(at(4, 9, 0)), Some(at(6, 17, 0)));
        assert!(!is_active_on(&t, day(3)));
        assert!(is_active_on(&t, day(4)));
        assert!(is_active_on(&t, day(5)));
        assert!(is_active_on(&t, day(6)));
        assert!(!is_active_on(&t, day(7)));
    }

    #[test]
    fn due_only_task_is_active_on_due_day() {
        let t = task("due", None, Some(at(5, 23, 59)));
        assert!(is_active_on(&t, day(5)));
        assert!(!is_active_on(&t, day(4)));
    }

    #[test]
    fn undated_tasks_never_active() {
        assert!(!is_active_on(&task("none", None, None), day(5)));
        assert!(!is_active_on(&task("start", Some(at(5, 9, 0)), None), day(5)));
    }

    #[test]
    fn agenda_orders_pinned_priority_due() {
        let mut low = task("low", None, Some(at(5, 8, 0)));
        low.priority = TaskPriority::Low;
        let mut high_late = task("high late", None, Some(at(5, 18, 0)));
        high_late.priority = TaskPriority::High;
        let mut high_early = task("high early", None, Some(at(5, 9, 0)));
        high_early.priority = TaskPriority::High;
        let mut pinned_low = task("pinned", None, Some(at(5, 20, 0)));
        pinned_low.priority = TaskPriority::Low;
        pinned_low.pinned = true;
        let medium_undated = task("medium", None, None);

        let mut tasks = vec![
            low,
            medium_undated,
            high_late,
            pinned_low,
            high_early,
        ];
        sort_agenda(&mut tasks);
        let order: Vec<_> = tasks.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["pinned", "high early", "high late", "medium", "low"]);
    }

    #[test]
    fn overview_orders_by_due_then_priority() {
        let mut a = task("a", None, Some(at(6, 9, 0)));
        a.priority = TaskPriority::High;
        let mut b = task("b", None, Some(at(5, 9, 0)));
        b.priority = TaskPriority::Low;
        let mut c = task("c", None, Some(at(5, 9, 0)));
        c.priority = TaskPriority::High;
        let d = task("d", None, None);

        let mut tasks = vec![d, a, b, c];
        sort_overview(&mut tasks);
        let order: Vec<_> = tasks.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn labels_follow_schedule_shape() {
        let same_day = task("x", Some(at(5, 9, 0)), Some(at(5, 10, 30)));
        assert_eq!(schedule_label(&same_day), " (09:00 - 10:30)");

        let multi_day = task("x", Some(at(5, 9, 0)), Some(at(8, 10, 30)));
        assert_eq!(schedule_label(&multi_day), " (Mar 05 - Mar 08)");

        let due_only = task("x", None, Some(at(5, 14, 0)));
        assert_eq!(schedule_label(&due_only), " (Due: Mar 05 14:00)");

        assert_eq!(schedule_label(&task("x", None, None)), "");
    }

    #[test]
    fn task_line_includes_status_and_label() {
        let mut t = task("Write report", None, Some(at(5, 14, 0)));
        assert_eq!(task_line(&t), "Pending - Write report (Due: Mar 05 14:00)");
        t.pinned = true;
        assert!(task_line(&t).starts_with("* Pending"));
    }

    #[test]
    fn week_header_uses_twelve_hour_clock_and_iso_week() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(15, 4, 5)
            .unwrap();
        assert_eq!(week_header(now), "Monday, January 1, 2024 03:04:05 pm (Week 1)");
    }

    #[test]
    fn parse_datetime_forms() {
        assert_eq!(parse_datetime("2024-03-05 14:30").unwrap(), at(5, 14, 30));
        assert_eq!(parse_datetime("2024-03-05T14:30").unwrap(), at(5, 14, 30));
        assert_eq!(parse_datetime("2024-03-05T14:30:00").unwrap(), at(5, 14, 30));
        assert_eq!(parse_datetime("2024-03-05").unwrap(), at(5, 0, 0));
        assert!(matches!(
            parse_datetime("tomorrow"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(parse_date("2024-03-05").unwrap(), day(5));
        assert!(parse_date("03/05/2024").is_err());
    }

    #[test]
    fn format_due_handles_missing() {
        assert_eq!(format_due(Some(at(5, 14, 0))), "2024-03-05 14:00");
        assert_eq!(format_due(None), "N/A");
    }
}
