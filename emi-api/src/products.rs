use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use emi_catalog::{EmiPlan, ProductInput, Variants};
use emi_core::ProductDetails;
use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Success envelope shared by every catalog endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data,
        }
    }
}

/// Product with its EMI plans embedded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub base_variant: String,
    pub variants: Variants,
    pub mrp: f64,
    pub price: f64,
    pub image: String,
    pub images: Vec<String>,
    pub emi_plans: Vec<EmiPlan>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductDetails> for ProductResponse {
    fn from(details: ProductDetails) -> Self {
        let product = details.product;
        ProductResponse {
            id: product.id,
            name: product.name,
            slug: product.slug,
            base_variant: product.base_variant,
            variants: product.variants,
            mrp: product.mrp,
            price: product.price,
            image: product.image,
            images: product.images,
            emi_plans: details.plans,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{slug_or_id}",
            get(get_product)
                .put(replace_product)
                .patch(update_product)
                .delete(delete_product),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/products
async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductResponse>>>, AppError> {
    let products = state.catalog.list_products().await?;
    Ok(Json(ApiResponse::list(
        products.into_iter().map(ProductResponse::from).collect(),
    )))
}

/// POST /api/products
async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponse>>), AppError> {
    let Json(input) = payload?;
    let created = state.catalog.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(created.into()))))
}

/// GET /api/products/{slug_or_id}
async fn get_product(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> Result<Json<ApiResponse<ProductResponse>>, AppError> {
    let product = state.catalog.get_product(&slug_or_id).await?;
    Ok(Json(ApiResponse::data(product.into())))
}

/// PUT /api/products/{slug_or_id}
/// Replace the whole document; the EMI plan list is left alone
async fn replace_product(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<ApiResponse<ProductResponse>>, AppError> {
    let Json(input) = payload?;
    let product = state.catalog.replace_product(&slug_or_id, input).await?;
    Ok(Json(ApiResponse::data(product.into())))
}

/// PATCH /api/products/{slug_or_id}
async fn update_product(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<ApiResponse<ProductResponse>>, AppError> {
    let Json(input) = payload?;
    let product = state.catalog.update_product(&slug_or_id, input).await?;
    Ok(Json(ApiResponse::data(product.into())))
}

/// DELETE /api/products/{slug_or_id}
async fn delete_product(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    state.catalog.delete_product(&slug_or_id).await?;
    Ok(Json(ApiResponse::data(serde_json::json!({}))))
}
