use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::dashboard::{self, Dashboard};
use crate::AppState;

pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<Dashboard>> {
    let store = state.store.clone();
    let dashboard = tokio::task::spawn_blocking(move || dashboard::build(&store))
        .await
        .map_err(anyhow::Error::from)??;

    Ok(Json(dashboard))
}
