use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde_json::value::RawValue;
use uuid::Uuid;
use emi_catalog::{EmiPlan, EmiPlanInput};
use crate::{error::AppError, products::ApiResponse, state::AppState};

/// A single plan object or an array of them
#[derive(Debug)]
pub enum CreatePlansRequest {
    Many(Vec<EmiPlanInput>),
    One(EmiPlanInput),
}

impl CreatePlansRequest {
    /// Decodes the concrete shape so type errors keep their field path
    /// (`[1].tenureMonths: invalid type ...`).
    pub fn from_raw(raw: &RawValue) -> Result<Self, JsonRejection> {
        let json = raw.get();
        if json.trim_start().starts_with('[') {
            let Json(plans) = Json::<Vec<EmiPlanInput>>::from_bytes(json.as_bytes())?;
            Ok(CreatePlansRequest::Many(plans))
        } else {
            let Json(plan) = Json::<EmiPlanInput>::from_bytes(json.as_bytes())?;
            Ok(CreatePlansRequest::One(plan))
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products/{slug_or_id}/emi-plans",
            get(list_plans).post(create_plans),
        )
        .route(
            "/api/products/{slug_or_id}/emi-plans/{plan_id}",
            delete(delete_plan),
        )
}

/// GET /api/products/{slug_or_id}/emi-plans
async fn list_plans(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<EmiPlan>>>, AppError> {
    let plans = state.catalog.list_plans(&slug_or_id).await?;
    Ok(Json(ApiResponse::list(plans)))
}

/// POST /api/products/{slug_or_id}/emi-plans
/// Plans are appended to the product's `emiPlans` in request order
async fn create_plans(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    payload: Result<Json<Box<RawValue>>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(raw) = payload?;
    let request = CreatePlansRequest::from_raw(&raw)?;

    let response = match request {
        CreatePlansRequest::One(input) => {
            let mut plans = state.catalog.create_plans(&slug_or_id, vec![input]).await?;
            let plan = plans.pop().ok_or_else(|| {
                AppError::InternalServerError(anyhow::anyhow!("EMI plan was not created"))
            })?;
            (StatusCode::CREATED, Json(ApiResponse::data(plan))).into_response()
        }
        CreatePlansRequest::Many(inputs) => {
            let plans = state.catalog.create_plans(&slug_or_id, inputs).await?;
            (StatusCode::CREATED, Json(ApiResponse::list(plans))).into_response()
        }
    };

    Ok(response)
}

/// DELETE /api/products/{slug_or_id}/emi-plans/{plan_id}
async fn delete_plan(
    State(state): State<AppState>,
    path: Result<Path<(String, Uuid)>, PathRejection>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let Path((slug_or_id, plan_id)) = path?;
    state.catalog.delete_plan(&slug_or_id, plan_id).await?;
    Ok(Json(ApiResponse::data(serde_json::json!({}))))
}
