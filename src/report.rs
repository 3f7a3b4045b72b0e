use crate::models::{ChartKind, Goal, ProgressPoint, ReportResponse, ReportSummary};
use chrono::{Local, NaiveDate};

pub fn build_report(goals: &[Goal], kind: ChartKind) -> ReportResponse {
    build_report_at(Local::now().date_naive(), goals, kind)
}

pub fn build_report_at(today: NaiveDate, goals: &[Goal], kind: ChartKind) -> ReportResponse {
    let points: Vec<ProgressPoint> = goals
        .iter()
        .map(|goal| ProgressPoint {
            goal_id: goal.id.clone(),
            title: goal.title.clone(),
            progress: goal.progress,
            due: goal.due,
            overdue: is_overdue(today, goal),
        })
        .collect();

    let total: u64 = points.iter().map(|point| u64::from(point.progress)).sum();
    let average_progress = if points.is_empty() {
        0.0
    } else {
        (total as f64 / points.len() as f64 * 10.0).round() / 10.0
    };

    let summary = ReportSummary {
        goal_count: points.len(),
        completed: points.iter().filter(|point| point.progress >= 100).count(),
        average_progress,
        overdue: points.iter().filter(|point| point.overdue).count(),
    };

    ReportResponse { kind, points, summary }
}

fn is_overdue(today: NaiveDate, goal: &Goal) -> bool {
    goal.progress < 100 && goal.due.is_some_and(|due| due < today)
}
