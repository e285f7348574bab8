use std::any::Any;
use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Request, State},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use emi_catalog::ValidationError;
use emi_core::CoreError;
use crate::state::AppState;

#[derive(Debug)]
pub enum AppError {
    ValidationError(ValidationError),
    NotFoundError(String),
    /// An extractor refused the request; its status code is kept as-is
    Rejection { status: StatusCode, message: String },
    InternalServerError(anyhow::Error),
}

/// Wire shape of every failed request
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub stack: Option<String>,
}

/// Full error report stashed on the response for [`attach_diagnostics`].
#[derive(Debug, Clone)]
struct ErrorReport(ErrorBody);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFoundError(_) => StatusCode::NOT_FOUND,
            AppError::Rejection { status, .. } => *status,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, stack) = match self {
            AppError::ValidationError(err) => {
                let stack = format!("{:?}", err);
                (err.to_string(), stack)
            }
            AppError::NotFoundError(msg) => {
                let stack = format!("NotFound: {}", msg);
                (msg, stack)
            }
            AppError::Rejection { message, .. } => {
                let stack = format!("Rejection({}): {}", status, message);
                (message, stack)
            }
            AppError::InternalServerError(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                (err.to_string(), format!("{:?}", err))
            }
        };

        let body = ErrorBody {
            success: false,
            error: message,
            stack: None,
        };
        let report = ErrorReport(ErrorBody {
            stack: Some(stack),
            ..body.clone()
        });

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => AppError::ValidationError(v),
            CoreError::NotFound { .. } => AppError::NotFoundError(err.to_string()),
            CoreError::Storage(_) => AppError::InternalServerError(err.into()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // A well-formed body with a mistyped field is a field violation
        let status = match rejection {
            JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
            _ => rejection.status(),
        };
        AppError::Rejection {
            status,
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejection {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Re-renders error bodies with their `stack` when diagnostics are exposed.
pub async fn attach_diagnostics(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    match response.extensions_mut().remove::<ErrorReport>() {
        Some(ErrorReport(report)) if state.expose_diagnostics => {
            (response.status(), Json(report)).into_response()
        }
        _ => response,
    }
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFoundError(format!("Route not found: {}", uri.path()))
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::Rejection {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: format!("Method {} not allowed on {}", method, uri.path()),
    }
}

pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::InternalServerError(anyhow::anyhow!("Handler panicked: {}", detail)).into_response()
}
