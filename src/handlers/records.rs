use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use validator::Validate;

use crate::dto::{CreateRecordRequest, RecordsQuery};
use crate::error::AppResult;
use crate::store::table::RowMap;
use crate::AppState;

pub async fn create_record(
    State(state): State<AppState>,
    Json(body): Json<CreateRecordRequest>,
) -> AppResult<(StatusCode, Json<RowMap>)> {
    body.validate()?;

    let record = body.into_record(Local::now().naive_local());
    let store = state.store.clone();
    let stored = tokio::task::spawn_blocking(move || store.append(&record))
        .await
        .map_err(anyhow::Error::from)??;

    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> AppResult<Json<Vec<RowMap>>> {
    let store = state.store.clone();
    let journal = tokio::task::spawn_blocking(move || store.load())
        .await
        .map_err(anyhow::Error::from)??;

    Ok(Json(journal.tail_rows(query.limit)))
}
