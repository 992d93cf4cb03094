use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::due_bucket::DueBucket;
use crate::models::task::TaskStatus;

/// The slice of a task the summary needs.
#[derive(Debug, FromRow)]
pub struct ReportTaskRow {
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub area_id: Option<i32>,
    pub area_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    pub area_id: Option<i32>,
    pub area_name: String,
    pub total: i64,
    pub completed: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_tasks: i64,
    /// Count per status label; every label is present, zero included.
    pub by_status: BTreeMap<String, i64>,
    /// Count per due bucket; every bucket is present, zero included.
    pub by_bucket: BTreeMap<String, i64>,
    pub by_area: Vec<AreaSummary>,
}

/// Aggregate the dashboard summary. Pure so it can be tested without a
/// database; bucketing runs against the caller's notion of today.
pub fn summarize(rows: Vec<ReportTaskRow>, today: NaiveDate) -> SummaryResponse {
    let mut by_status: BTreeMap<String, i64> = TaskStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut by_bucket: BTreeMap<String, i64> = DueBucket::ALL
        .iter()
        .map(|b| (b.as_str().to_string(), 0))
        .collect();
    let mut areas: BTreeMap<Option<i32>, AreaSummary> = BTreeMap::new();

    let total_tasks = rows.len() as i64;

    for row in rows {
        let status = TaskStatus::parse_or_default(&row.status);
        let bucket = DueBucket::classify(status, row.due_date, today);

        *by_status.entry(status.as_str().to_string()).or_insert(0) += 1;
        *by_bucket.entry(bucket.as_str().to_string()).or_insert(0) += 1;

        let entry = areas.entry(row.area_id).or_insert_with(|| AreaSummary {
            area_id: row.area_id,
            area_name: row.area_name.unwrap_or_else(|| "Sin área".to_string()),
            total: 0,
            completed: 0,
        });
        entry.total += 1;
        if status == TaskStatus::Completed {
            entry.completed += 1;
        }
    }

    SummaryResponse {
        total_tasks,
        by_status,
        by_bucket,
        by_area: areas.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(status: &str, due: Option<NaiveDate>, area: Option<(i32, &str)>) -> ReportTaskRow {
        ReportTaskRow {
            status: status.to_string(),
            due_date: due,
            area_id: area.map(|(id, _)| id),
            area_name: area.map(|(_, name)| name.to_string()),
        }
    }

    #[test]
    fn empty_summary_still_lists_every_label() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let summary = summarize(Vec::new(), today);

        assert_eq!(summary.total_tasks, 0);
        assert_eq!(summary.by_status.len(), 4);
        assert_eq!(summary.by_bucket.len(), 5);
        assert!(summary.by_status.values().all(|&count| count == 0));
        assert!(summary.by_area.is_empty());
    }

    #[test]
    fn counts_by_status_bucket_and_area() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let rows = vec![
            row("Completada", Some(today - Duration::days(5)), Some((1, "Ventas"))),
            row("En progreso", Some(today - Duration::days(1)), Some((1, "Ventas"))),
            row("En riesgo", Some(today + Duration::days(3)), Some((2, "Finanzas"))),
            row("No iniciada", None, None),
            row("No iniciada", Some(today + Duration::days(30)), None),
        ];

        let summary = summarize(rows, today);

        assert_eq!(summary.total_tasks, 5);
        assert_eq!(summary.by_status["Completada"], 1);
        assert_eq!(summary.by_status["No iniciada"], 2);
        assert_eq!(summary.by_bucket["COMPLETED"], 1);
        assert_eq!(summary.by_bucket["OVERDUE"], 1);
        assert_eq!(summary.by_bucket["DUE_THIS_WEEK"], 1);
        assert_eq!(summary.by_bucket["NO_DUE_DATE"], 1);
        assert_eq!(summary.by_bucket["UPCOMING"], 1);

        assert_eq!(summary.by_area.len(), 3);
        let ventas = summary
            .by_area
            .iter()
            .find(|a| a.area_id == Some(1))
            .unwrap();
        assert_eq!(ventas.total, 2);
        assert_eq!(ventas.completed, 1);

        let no_area = summary.by_area.iter().find(|a| a.area_id.is_none()).unwrap();
        assert_eq!(no_area.area_name, "Sin área");
        assert_eq!(no_area.total, 2);
        assert_eq!(no_area.completed, 0);
    }
}
