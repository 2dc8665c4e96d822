use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Success message paired with `status` 0.
const OK_MESSAGE: &str = "请求成功";

/// JSON envelope wrapping every API payload: `status` 0 means success,
/// non-zero values are the codes of [`ApiError`](crate::error::ApiError).
/// `data` is omitted when a handler has nothing to return.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: 0,
            message: OK_MESSAGE.to_owned(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn empty() -> Self {
        Self {
            status: 0,
            message: OK_MESSAGE.to_owned(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}
