use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::task::TaskStatus;

/// Deadline-urgency label shown on dashboards and used by the reports
/// endpoint. A completed task is COMPLETED no matter what its due date
/// says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DueBucket {
    Completed,
    NoDueDate,
    Overdue,
    DueThisWeek,
    Upcoming,
}

impl DueBucket {
    pub const ALL: [DueBucket; 5] = [
        DueBucket::Completed,
        DueBucket::NoDueDate,
        DueBucket::Overdue,
        DueBucket::DueThisWeek,
        DueBucket::Upcoming,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DueBucket::Completed => "COMPLETED",
            DueBucket::NoDueDate => "NO_DUE_DATE",
            DueBucket::Overdue => "OVERDUE",
            DueBucket::DueThisWeek => "DUE_THIS_WEEK",
            DueBucket::Upcoming => "UPCOMING",
        }
    }

    /// Classify a task by status and due date. The week window is
    /// inclusive: a task due exactly seven days from today still counts
    /// as DUE_THIS_WEEK.
    pub fn classify(status: TaskStatus, due_date: Option<NaiveDate>, today: NaiveDate) -> DueBucket {
        if status == TaskStatus::Completed {
            return DueBucket::Completed;
        }
        match due_date {
            None => DueBucket::NoDueDate,
            Some(due) if due < today => DueBucket::Overdue,
            Some(due) if due <= today + Duration::days(7) => DueBucket::DueThisWeek,
            Some(_) => DueBucket::Upcoming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn classify(status: TaskStatus, due: Option<NaiveDate>) -> DueBucket {
        DueBucket::classify(status, due, today())
    }

    #[test]
    fn completed_overrides_everything() {
        assert_eq!(classify(TaskStatus::Completed, None), DueBucket::Completed);
        let overdue = today() - Duration::days(30);
        assert_eq!(
            classify(TaskStatus::Completed, Some(overdue)),
            DueBucket::Completed
        );
        let far = today() + Duration::days(90);
        assert_eq!(
            classify(TaskStatus::Completed, Some(far)),
            DueBucket::Completed
        );
    }

    #[test]
    fn missing_due_date() {
        assert_eq!(classify(TaskStatus::NotStarted, None), DueBucket::NoDueDate);
        assert_eq!(classify(TaskStatus::AtRisk, None), DueBucket::NoDueDate);
    }

    #[test]
    fn due_yesterday_is_overdue() {
        let due = today() - Duration::days(1);
        assert_eq!(
            classify(TaskStatus::InProgress, Some(due)),
            DueBucket::Overdue
        );
    }

    #[test]
    fn due_today_is_this_week() {
        assert_eq!(
            classify(TaskStatus::InProgress, Some(today())),
            DueBucket::DueThisWeek
        );
    }

    #[test]
    fn due_in_seven_days_is_this_week() {
        let due = today() + Duration::days(7);
        assert_eq!(
            classify(TaskStatus::NotStarted, Some(due)),
            DueBucket::DueThisWeek
        );
    }

    #[test]
    fn due_in_eight_days_is_upcoming() {
        let due = today() + Duration::days(8);
        assert_eq!(
            classify(TaskStatus::NotStarted, Some(due)),
            DueBucket::Upcoming
        );
    }

    #[test]
    fn bucket_serializes_screaming_snake() {
        for bucket in DueBucket::ALL {
            let json = serde_json::to_string(&bucket).unwrap();
            assert_eq!(json, format!("\"{}\"", bucket.as_str()));
        }
    }
}
