use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/users", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/api/goals/:goal_id", delete(handlers::delete_goal))
        .route("/api/goals/:goal_id/subgoals", post(handlers::create_subgoal))
        .route(
            "/api/goals/:goal_id/subgoals/:subgoal_id",
            put(handlers::toggle_subgoal).delete(handlers::delete_subgoal),
        )
        .route("/api/report", get(handlers::get_report))
        .route("/api/export", get(handlers::export_goals))
        .route("/api/import", post(handlers::import_goals))
        .with_state(state)
}
