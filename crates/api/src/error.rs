use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use taskboard_domain::TaskboardError;

use crate::response::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Taskboard(#[from] TaskboardError),

    #[error("验证错误: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("请求参数错误: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Taskboard(err) if err.is_not_found() => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Taskboard(TaskboardError::ValidationError(_)) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Taskboard(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, format_validation_errors(errors))
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, format!("请求参数错误: {msg}"))
            }
        };

        (status, ApiResponse::failure(message)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 把字段级校验错误压平成一条可读信息
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let details: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect();
    format!("请求参数验证失败: {}", details.join("; "))
}

/// `Json` 提取器的包装：请求体解析失败时同样走统一错误信封返回 400，
/// 而不是 axum 默认的纯文本 400/422
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}
