use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows", get(list_shows).post(add_show).delete(delete_show))
        .route("/seating", get(seating_info))
}

/* ---------- SHOWS ---------- */

// GET /api/shows?name=...&date=YYYY-MM-DD
#[derive(Debug, Deserialize)]
struct ListShowsQuery {
    name: Option<String>,
    date: Option<String>,
}

async fn list_shows(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListShowsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let shows = if let Some(name) = params.name {
        state.service.shows_by_name(&name).await
    } else if let Some(date) = params.date {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| (StatusCode::BAD_REQUEST, "date must be YYYY-MM-DD".to_string()))?;
        state.service.shows_by_date(date).await
    } else {
        state.service.shows().await
    };

    match shows {
        Ok(shows) => Ok((StatusCode::OK, Json(json!({ "shows": shows })))),
        Err(e) => {
            tracing::error!("list_shows failed: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "failed to list shows".to_string()))
        }
    }
}

// POST /api/shows
#[derive(Debug, Deserialize)]
struct AddShowRequest {
    show_time: NaiveDateTime,
    name: String,
}

async fn add_show(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddShowRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match state.service.add_show(req.show_time, &req.name).await {
        Ok(true) => Ok((StatusCode::CREATED, Json(json!({ "success": true })))),
        Ok(false) => Err((
            StatusCode::CONFLICT,
            "a show already exists at this time".to_string(),
        )),
        Err(e) => {
            tracing::error!("add_show failed: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "failed to add show".to_string()))
        }
    }
}

// DELETE /api/shows
#[derive(Debug, Deserialize)]
struct DeleteShowRequest {
    show_time: NaiveDateTime,
}

async fn delete_show(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteShowRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match state.service.delete_show(req.show_time).await {
        Ok(true) => Ok((StatusCode::OK, Json(json!({ "success": true })))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            "no show exists at this time".to_string(),
        )),
        Err(e) => {
            tracing::error!("delete_show failed: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "failed to delete show".to_string()))
        }
    }
}

/* ---------- SEATING ---------- */

// GET /api/seating?show_time=...
#[derive(Debug, Deserialize)]
struct SeatingQuery {
    show_time: NaiveDateTime,
}

async fn seating_info(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeatingQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match state.service.seating_info(params.show_time).await {
        Ok(seats) => Ok((StatusCode::OK, Json(json!({ "seats": seats })))),
        Err(e) => {
            tracing::error!("seating_info failed: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "failed to load seating".to_string()))
        }
    }
}
