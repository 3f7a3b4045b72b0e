use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Everything the store persists, keyed by username.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Snapshot {
    pub users: BTreeMap<String, UserRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, rename = "submetas")]
    pub sub_goals: Vec<SubGoal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubGoal {
    pub id: String,
    pub title: String,
    #[serde(default = "default_points", deserialize_with = "deserialize_points")]
    pub points: u32,
    #[serde(default)]
    pub done: bool,
    pub due: Option<NaiveDate>,
}

/// Sub-goal weight: anything missing or below 1 counts as 1.
pub fn coerce_points(points: Option<i64>) -> u32 {
    match points {
        Some(points) if points >= 1 => u32::try_from(points).unwrap_or(u32::MAX),
        _ => 1,
    }
}

fn default_points() -> u32 {
    1
}

fn deserialize_points<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(coerce_points(Option::<i64>::deserialize(deserializer)?))
}

/// Standalone backup of one user's goal tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalExport {
    pub username: String,
    pub exported_at: DateTime<Utc>,
    pub goals: Vec<Goal>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct NewGoalRequest {
    pub title: String,
    #[serde(default)]
    pub due: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct NewSubGoalRequest {
    pub title: String,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub done: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
    Line,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub kind: Option<ChartKind>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub goal_id: String,
    pub title: String,
    pub progress: u8,
    pub due: Option<NaiveDate>,
    pub overdue: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportSummary {
    pub goal_count: usize,
    pub completed: usize,
    pub average_progress: f64,
    pub overdue: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub kind: ChartKind,
    pub points: Vec<ProgressPoint>,
    pub summary: ReportSummary,
}
