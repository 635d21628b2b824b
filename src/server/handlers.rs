use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::geo::Coordinate;
use crate::roster::{LocationUpdate, NearbySalesperson, RosterError, Salesperson, SalespersonStatus};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<RosterError> for ApiError {
    fn from(e: RosterError) -> Self {
        let status = match e {
            RosterError::NotFound(_) => StatusCode::NOT_FOUND,
            RosterError::InvalidCoordinate(_) => StatusCode::BAD_REQUEST,
            RosterError::DuplicateId(_) => StatusCode::CONFLICT,
            RosterError::Io { .. } | RosterError::Parse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        api_error(status, e.to_string())
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ─── GET / ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct Banner {
    message: &'static str,
    version: &'static str,
}

pub async fn index() -> Json<Banner> {
    tracing::info!("GET /");
    Json(Banner {
        message: "Lead Radar dispatch API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ─── GET /salespersons ───────────────────────────────────────────

pub async fn salespersons(State(state): State<Arc<AppState>>) -> Json<Vec<Salesperson>> {
    let start = Instant::now();
    let list = state.roster().list().to_vec();
    tracing::info!(results = list.len(), elapsed_ms = elapsed_ms(start), "GET /salespersons");
    Json(list)
}

// ─── GET /salespersons/nearby ────────────────────────────────────

#[derive(Deserialize)]
pub struct TargetQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl TargetQuery {
    fn coordinate(&self) -> Result<Coordinate, ApiError> {
        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            return Err(api_error(StatusCode::BAD_REQUEST, "Provide 'lat' and 'lng' parameters"));
        };
        Coordinate::checked(lat, lng).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
    }
}

pub async fn nearby(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TargetQuery>,
) -> Result<Json<Vec<NearbySalesperson>>, ApiError> {
    let start = Instant::now();
    let target = params.coordinate()?;

    let result = state.roster().nearby(target);

    tracing::info!(
        lat = target.lat,
        lng = target.lon,
        results = result.len(),
        elapsed_ms = elapsed_ms(start),
        "GET /salespersons/nearby"
    );
    Ok(Json(result))
}

// ─── GET /salespersons/nearest-available ─────────────────────────

pub async fn nearest_available(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TargetQuery>,
) -> Result<Json<NearbySalesperson>, ApiError> {
    let start = Instant::now();
    let target = params.coordinate()?;

    let best = state.roster().nearest_available(target);

    match best {
        Some(sp) => {
            tracing::info!(
                lat = target.lat,
                lng = target.lon,
                salesperson = sp.id,
                distance_km = sp.distance_km,
                elapsed_ms = elapsed_ms(start),
                "GET /salespersons/nearest-available"
            );
            Ok(Json(sp))
        }
        None => {
            tracing::info!(lat = target.lat, lng = target.lon, "GET /salespersons/nearest-available -> none");
            Err(api_error(StatusCode::NOT_FOUND, "No available salesperson with a known location"))
        }
    }
}

// ─── POST /salesperson/location ──────────────────────────────────

#[derive(Deserialize)]
pub struct LocationReport {
    pub salesperson_id: u64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize)]
pub struct LocationAck {
    pub message: &'static str,
    pub salesperson_id: u64,
    pub last_location_update: DateTime<Utc>,
}

pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Json(report): Json<LocationReport>,
) -> Result<Json<LocationAck>, ApiError> {
    let start = Instant::now();
    let now = Utc::now();
    let update = LocationUpdate {
        latitude: report.latitude,
        longitude: report.longitude,
    };

    let result = state.roster_mut().update_location(report.salesperson_id, update, now).map(|_| ());
    if let Err(e) = result {
        tracing::warn!(salesperson = report.salesperson_id, error = %e, "POST /salesperson/location rejected");
        return Err(e.into());
    }

    tracing::info!(
        salesperson = report.salesperson_id,
        lat = report.latitude,
        lng = report.longitude,
        elapsed_ms = elapsed_ms(start),
        "POST /salesperson/location"
    );
    Ok(Json(LocationAck {
        message: "Location updated successfully",
        salesperson_id: report.salesperson_id,
        last_location_update: now,
    }))
}

// ─── POST /assign ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AssignRequest {
    pub lead_id: u64,
    pub salesperson_id: u64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct AssignAck {
    pub lead_id: u64,
    pub salesperson_id: u64,
    pub salesperson_status: SalespersonStatus,
    pub assigned_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Hand a lead to a salesperson, taking them out of the available pool.
pub async fn assign(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssignRequest>,
) -> Result<Json<AssignAck>, ApiError> {
    let start = Instant::now();

    if let Err(e) = state.roster_mut().set_status(req.salesperson_id, SalespersonStatus::Busy) {
        tracing::warn!(lead = req.lead_id, salesperson = req.salesperson_id, error = %e, "POST /assign rejected");
        return Err(e.into());
    }

    tracing::info!(
        lead = req.lead_id,
        salesperson = req.salesperson_id,
        elapsed_ms = elapsed_ms(start),
        "POST /assign"
    );
    Ok(Json(AssignAck {
        lead_id: req.lead_id,
        salesperson_id: req.salesperson_id,
        salesperson_status: SalespersonStatus::Busy,
        assigned_at: Utc::now(),
        notes: req.notes,
    }))
}

// ─── POST /salesperson/status ────────────────────────────────────

#[derive(Deserialize)]
pub struct StatusChange {
    pub salesperson_id: u64,
    pub status: SalespersonStatus,
}

#[derive(Serialize)]
pub struct StatusAck {
    pub salesperson_id: u64,
    pub status: SalespersonStatus,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Json(change): Json<StatusChange>,
) -> Result<Json<StatusAck>, ApiError> {
    let start = Instant::now();

    if let Err(e) = state.roster_mut().set_status(change.salesperson_id, change.status) {
        tracing::warn!(salesperson = change.salesperson_id, error = %e, "POST /salesperson/status rejected");
        return Err(e.into());
    }

    tracing::info!(
        salesperson = change.salesperson_id,
        status = %change.status,
        elapsed_ms = elapsed_ms(start),
        "POST /salesperson/status"
    );
    Ok(Json(StatusAck {
        salesperson_id: change.salesperson_id,
        status: change.status,
    }))
}
