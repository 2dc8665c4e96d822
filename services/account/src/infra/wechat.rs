use crate::domain::repository::WxClient;
use crate::domain::types::WxSession;
use crate::error::ApiError;

/// reqwest-backed WeChat API client. `api_base` is configurable so tests
/// and private deployments can point it elsewhere.
#[derive(Clone)]
pub struct HttpWxClient {
    pub http: reqwest::Client,
    pub api_base: String,
    pub app_id: String,
    pub app_secret: String,
}

impl WxClient for HttpWxClient {
    async fn code_to_session(&self, code: &str) -> Result<WxSession, ApiError> {
        let url = format!(
            "{}/sns/jscode2session?appid={}&secret={}&js_code={}&grant_type=authorization_code",
            self.api_base, self.app_id, self.app_secret, code
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|_| ApiError::WxRequestFail)?;

        // WeChat reports errors as 200 + {errcode, errmsg}; that body has
        // no session_key, so it fails the decode below.
        response
            .json::<WxSession>()
            .await
            .map_err(|_| ApiError::WxDecodeFail)
    }
}
