use crate::errors::{AppError, LedgerResult};
use crate::ledger;
use crate::models::{
    CredentialsRequest, Goal, GoalExport, NewGoalRequest, NewSubGoalRequest, ReportQuery, ReportResponse,
    Snapshot, ToggleRequest, UserResponse,
};
use crate::report::build_report;
use crate::session::Session;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Html,
    Json,
};
use chrono::Local;
use tracing::info;

pub async fn index() -> Html<String> {
    Html(render_index(&today_string()))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let username = payload.username.trim().to_string();
    let record = write_cycle(&state, None, |snapshot| {
        ledger::create_user(snapshot, &username, &payload.password)
    })
    .await?;
    info!(%username, "registered user");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            username,
            created_at: Some(record.created_at),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let session = Session::new(payload.username.trim(), payload.password);
    read_cycle(&state, &session, |_| Ok(())).await?;
    Ok(Json(UserResponse {
        username: session.username,
        created_at: None,
    }))
}

pub async fn list_goals(State(state): State<AppState>, session: Session) -> Result<Json<Vec<Goal>>, AppError> {
    let goals = read_cycle(&state, &session, |snapshot| {
        Ok(ledger::goals(snapshot, &session.username)?.to_vec())
    })
    .await?;
    Ok(Json(goals))
}

pub async fn create_goal(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<NewGoalRequest>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let goal = write_cycle(&state, Some(&session), |snapshot| {
        ledger::add_goal(snapshot, &session.username, &payload.title, payload.due)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    session: Session,
    Path(goal_id): Path<String>,
) -> Result<Json<Goal>, AppError> {
    let removed = write_cycle(&state, Some(&session), |snapshot| {
        ledger::delete_goal(snapshot, &session.username, &goal_id)
    })
    .await?;
    info!(goal_id = %removed.id, sub_goals = removed.sub_goals.len(), "deleted goal");
    Ok(Json(removed))
}

pub async fn create_subgoal(
    State(state): State<AppState>,
    session: Session,
    Path(goal_id): Path<String>,
    Json(payload): Json<NewSubGoalRequest>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let goal = write_cycle(&state, Some(&session), |snapshot| {
        ledger::add_subgoal(
            snapshot,
            &session.username,
            &goal_id,
            &payload.title,
            payload.points,
            payload.due,
        )
    })
    .await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn toggle_subgoal(
    State(state): State<AppState>,
    session: Session,
    Path((goal_id, subgoal_id)): Path<(String, String)>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<Goal>, AppError> {
    let goal = write_cycle(&state, Some(&session), |snapshot| {
        ledger::toggle_subgoal(snapshot, &session.username, &goal_id, &subgoal_id, payload.done)
    })
    .await?;
    Ok(Json(goal))
}

pub async fn delete_subgoal(
    State(state): State<AppState>,
    session: Session,
    Path((goal_id, subgoal_id)): Path<(String, String)>,
) -> Result<Json<Goal>, AppError> {
    let goal = write_cycle(&state, Some(&session), |snapshot| {
        ledger::delete_subgoal(snapshot, &session.username, &goal_id, &subgoal_id)
    })
    .await?;
    Ok(Json(goal))
}

pub async fn get_report(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, AppError> {
    let kind = query.kind.unwrap_or_default();
    let report = read_cycle(&state, &session, |snapshot| {
        Ok(build_report(ledger::goals(snapshot, &session.username)?, kind))
    })
    .await?;
    Ok(Json(report))
}

pub async fn export_goals(
    State(state): State<AppState>,
    session: Session,
) -> Result<([(header::HeaderName, String); 1], Json<GoalExport>), AppError> {
    let backup = read_cycle(&state, &session, |snapshot| {
        ledger::export_goals(snapshot, &session.username)
    })
    .await?;
    let disposition = format!(
        "attachment; filename=\"goals-{}-{}.json\"",
        backup.username,
        backup.exported_at.format("%Y%m%d")
    );
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(backup)))
}

pub async fn import_goals(
    State(state): State<AppState>,
    session: Session,
    Json(backup): Json<GoalExport>,
) -> Result<Json<Vec<Goal>>, AppError> {
    let goals = write_cycle(&state, Some(&session), |snapshot| {
        Ok(ledger::import_goals(snapshot, &session.username, backup)?.to_vec())
    })
    .await?;
    info!(username = %session.username, goals = goals.len(), "imported goal tree");
    Ok(Json(goals))
}

/// Loads a snapshot and authorizes the session against it.
async fn read_cycle<T>(
    state: &AppState,
    session: &Session,
    read: impl FnOnce(&Snapshot) -> LedgerResult<T>,
) -> Result<T, AppError> {
    let _guard = state.writer.lock().await;
    let snapshot = state.load().await?;
    session.authorize(&snapshot)?;
    Ok(read(&snapshot)?)
}

/// One load, one mutation, one save. Nothing is saved when the mutation fails.
async fn write_cycle<T>(
    state: &AppState,
    session: Option<&Session>,
    mutate: impl FnOnce(&mut Snapshot) -> LedgerResult<T>,
) -> Result<T, AppError> {
    let _guard = state.writer.lock().await;
    let mut snapshot = state.load().await?;
    if let Some(session) = session {
        session.authorize(&snapshot)?;
    }
    let value = mutate(&mut snapshot)?;
    state.save(snapshot).await?;
    Ok(value)
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}
