use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Domain error taxonomy. Every variant carries a stable integer code and
/// travels inside the JSON envelope at HTTP 200; `Internal` is the one
/// exception and surfaces as a transport-level 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("用户已经存在")]
    UserExist,
    #[error("用户不存在")]
    UserNotExist,
    #[error("密码不合法")]
    PasswordInvalid,
    #[error("密码错误")]
    PasswordError,
    #[error("邮箱不合法")]
    EmailInvalid,
    #[error("邮箱不存在")]
    EmailNotExist,
    #[error("对象不存在")]
    ModelNotExist,
    #[error("对象已存在")]
    ModelExisted,
    #[error("密码错误")]
    AuthFail,
    #[error("验证码错误")]
    CodeFail,
    #[error("base64 decode 失败")]
    Base64DecodeError,
    #[error("出错了")]
    Custom,
    #[error("refreshToken 不存在")]
    RefreshTokenNotExist,
    #[error("微信接口请求失败")]
    WxRequestFail,
    #[error("微信数据解析失败")]
    WxDecodeFail,
    #[error("数据水印校验失败")]
    WxWatermarkMismatch,
    #[error("出错了")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Stable wire code carried in the envelope `status` field.
    pub fn code(&self) -> i32 {
        match self {
            Self::ModelNotExist => 25,
            Self::ModelExisted => 26,
            Self::AuthFail => 27,
            Self::CodeFail => 28,
            Self::Base64DecodeError => 30,
            Self::Custom | Self::Internal(_) => 31,
            Self::RefreshTokenNotExist => 32,
            Self::WxRequestFail => 33,
            Self::WxDecodeFail => 34,
            Self::WxWatermarkMismatch => 35,
            Self::UserExist => 1000,
            Self::UserNotExist => 1001,
            Self::PasswordInvalid => 1002,
            Self::PasswordError => 1003,
            Self::EmailInvalid => 1008,
            Self::EmailNotExist => 1009,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Domain errors ride the envelope at HTTP 200 so mobile clients
        // branch on `status` alone. Internal errors need the anyhow chain
        // logged so the root cause is traceable; tower-http TraceLayer
        // already records method/uri/status for every request.
        let status = match self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, "internal error");
        }
        let body = serde_json::json!({
            "status": self.code(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
