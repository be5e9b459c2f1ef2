//! JSON-over-HTTP rendition of the presentation interface.
//!
//! Every handler locks the shared [`ChurchApp`], so requests are applied one
//! at a time against the single writer.

mod error;

pub use error::{ApiError, ErrorResponse};

use crate::core::Value;
use crate::facade::{ChurchApp, Dashboard, FieldOptions, ReportFilter, today};
use crate::result::TableView;
use crate::schema::EntityType;
use crate::views::{DataPoint, UpcomingDate};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub type SharedApp = Arc<Mutex<ChurchApp>>;

#[derive(Clone)]
struct AppState {
    app: SharedApp,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DataPointResponse {
    pub label: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct UpcomingDateResponse {
    pub name: String,
    pub date: String,
    pub days_away: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub today: String,
    pub totals: Vec<DataPointResponse>,
    pub attendance: Vec<DataPointResponse>,
    pub upcoming_meeting_days: Vec<UpcomingDateResponse>,
    pub upcoming_birthdays: Vec<UpcomingDateResponse>,
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
pub struct FieldOptionsResponse {
    pub column: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub table: String,
    pub rows: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    filter: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoleQuery {
    role: String,
}

pub fn build_router(app: SharedApp) -> Router {
    let state = AppState { app };

    Router::new()
        .route("/health", get(health))
        .route("/api/dashboard", get(dashboard))
        .route("/api/chart/attendance", get(attendance_chart))
        .route("/api/reports", get(reports))
        .route("/api/staff/by-role", get(staff_by_role))
        .route("/api/{entity}", get(list_records).post(create_record))
        .route("/api/{entity}/summary", get(summary))
        .route("/api/{entity}/options", get(form_options))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, ApiError> {
    let app = state.app.lock().await;
    let dashboard = app.dashboard(today())?;
    Ok(Json(dashboard_to_response(dashboard)))
}

async fn attendance_chart(
    State(state): State<AppState>,
) -> Result<Json<Vec<DataPointResponse>>, ApiError> {
    let app = state.app.lock().await;
    Ok(Json(points_to_response(app.render_chart()?)))
}

async fn reports(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<DataPointResponse>>, ApiError> {
    let filter = match query.filter.as_deref() {
        Some(raw) => raw.parse::<ReportFilter>()?,
        None => ReportFilter::default(),
    };
    let app = state.app.lock().await;
    Ok(Json(points_to_response(app.report_summary(filter)?)))
}

async fn staff_by_role(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let app = state.app.lock().await;
    Ok(Json(app.staff_with_role(&query.role)?.options))
}

async fn summary(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<Vec<DataPointResponse>>, ApiError> {
    let entity: EntityType = entity.parse()?;
    let app = state.app.lock().await;
    Ok(Json(points_to_response(app.render_summary(entity)?)))
}

async fn form_options(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<Vec<FieldOptionsResponse>>, ApiError> {
    let entity: EntityType = entity.parse()?;
    let app = state.app.lock().await;
    let fields = app
        .form_options(entity)?
        .into_iter()
        .map(field_options_to_response)
        .collect();
    Ok(Json(fields))
}

async fn list_records(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<TableResponse>, ApiError> {
    let entity: EntityType = entity.parse()?;
    let app = state.app.lock().await;
    Ok(Json(table_to_response(app.render_table(entity)?)))
}

async fn create_record(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(payload): Json<CreateRecordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entity: EntityType = entity.parse()?;
    let mut app = state.app.lock().await;

    if entity == EntityType::MeetingDay
        && let Some(name) = payload.fields.first()
        && app.has_meeting_day(name)?
    {
        return Err(ApiError::conflict(format!(
            "meeting day '{}' already exists",
            name.trim()
        )));
    }

    app.submit_record(entity, &payload.fields)?;
    let stats = app.table_stats(entity)?;
    info!(table = %entity, rows = stats.row_count, "record created via api");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            table: stats.name,
            rows: stats.row_count,
        }),
    ))
}

fn points_to_response(points: Vec<DataPoint>) -> Vec<DataPointResponse> {
    points
        .into_iter()
        .map(|point| DataPointResponse {
            label: point.label,
            value: point.value.to_json(),
        })
        .collect()
}

fn dates_to_response(dates: Vec<UpcomingDate>) -> Vec<UpcomingDateResponse> {
    dates
        .into_iter()
        .map(|upcoming| UpcomingDateResponse {
            name: upcoming.name,
            date: Value::Date(upcoming.date).to_string(),
            days_away: upcoming.days_away,
        })
        .collect()
}

fn dashboard_to_response(dashboard: Dashboard) -> DashboardResponse {
    DashboardResponse {
        today: Value::Date(dashboard.today).to_string(),
        totals: points_to_response(dashboard.totals),
        attendance: points_to_response(dashboard.attendance),
        upcoming_meeting_days: dates_to_response(dashboard.upcoming_meeting_days),
        upcoming_birthdays: dates_to_response(dashboard.upcoming_birthdays),
    }
}

fn table_to_response(view: TableView) -> TableResponse {
    TableResponse {
        title: view.title,
        columns: view.columns,
        rows: view
            .rows
            .iter()
            .map(|row| row.iter().map(Value::to_json).collect())
            .collect(),
    }
}

fn field_options_to_response(field: FieldOptions) -> FieldOptionsResponse {
    FieldOptionsResponse {
        column: field.column,
        options: field.options.options,
    }
}
