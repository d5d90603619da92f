//! Report submission. Listing and moderation live under `/api/admin`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use services::NewReport;

use crate::dto::{CreateReportRequest, ReportResponse};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let report = state
        .reports
        .create(
            Some(&actor),
            NewReport {
                report_type: body.report_type,
                reason: body.reason,
                description: body.description,
                reported_item_id: body.reported_item_id,
            },
        )
        .await?;

    let report = ReportResponse::from(report);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Report submitted successfully", "report": report })),
    ))
}
