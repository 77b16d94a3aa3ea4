use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reservations/name", get(reservation_name))
        .route("/reservations/reserve", patch(make_reservation))
        .route("/reservations/cancel", patch(cancel_reservation))
}

// GET /api/reservations/name?show_time=...&seat=N
#[derive(Debug, Deserialize)]
struct ReservationNameQuery {
    show_time: NaiveDateTime,
    seat: i32,
}

async fn reservation_name(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReservationNameQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if params.seat <= 0 {
        return Err((StatusCode::BAD_REQUEST, "seat must be > 0".to_string()));
    }

    match state
        .service
        .reservation_name(params.show_time, params.seat)
        .await
    {
        Ok(Some(client)) => Ok((StatusCode::OK, Json(json!({ "client": client })))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            "no reservation on this seat".to_string(),
        )),
        Err(e) => {
            tracing::error!("reservation_name failed: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "failed to look up reservation".to_string()))
        }
    }
}

// PATCH /api/reservations/reserve
#[derive(Debug, Deserialize)]
struct MakeReservationRequest {
    show_time: NaiveDateTime,
    seat: i32,
    client: String,
}

async fn make_reservation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MakeReservationRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.seat <= 0 {
        return Err((StatusCode::BAD_REQUEST, "seat must be > 0".to_string()));
    }

    match state
        .service
        .make_reservation(req.show_time, req.seat, &req.client)
        .await
    {
        Ok(true) => Ok((StatusCode::OK, Json(json!({ "success": true })))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            "no such show or seat".to_string(),
        )),
        Err(e) => {
            tracing::error!("make_reservation failed: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "failed to make reservation".to_string()))
        }
    }
}

// PATCH /api/reservations/cancel
#[derive(Debug, Deserialize)]
struct CancelReservationRequest {
    show_time: NaiveDateTime,
    seat: i32,
}

async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CancelReservationRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.seat <= 0 {
        return Err((StatusCode::BAD_REQUEST, "seat must be > 0".to_string()));
    }

    match state
        .service
        .cancel_reservation(req.show_time, req.seat)
        .await
    {
        Ok(true) => Ok((StatusCode::OK, Json(json!({ "success": true })))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            "no such show or seat".to_string(),
        )),
        Err(e) => {
            tracing::error!("cancel_reservation failed: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "failed to cancel reservation".to_string()))
        }
    }
}
