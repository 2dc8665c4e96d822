/// Account service configuration loaded from environment variables.
///
/// Secrets (database, Redis, WeChat app credentials) are required and the
/// process refuses to start without them; everything else has a
/// development default.
#[derive(Debug)]
pub struct AccountConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (web session store).
    pub redis_url: String,
    /// Public origin used when building activation links
    /// (e.g. "https://example.com"). Env var: `PUBLIC_BASE_URL`.
    pub public_base_url: String,
    /// WeChat mini-program app id. Env var: `WECHAT_APP_ID`.
    pub wechat_app_id: String,
    /// WeChat mini-program app secret. Env var: `WECHAT_APP_SECRET`.
    pub wechat_app_secret: String,
    /// Base URL of the WeChat API. Env var: `WECHAT_API_BASE`.
    pub wechat_api_base: String,
    /// Access-token lifetime in seconds (default 3600).
    pub access_token_ttl_secs: i64,
    /// Refresh-token lifetime in seconds. Unset means refresh tokens
    /// never expire. Env var: `REFRESH_TOKEN_TTL_SECS`.
    pub refresh_token_ttl_secs: Option<i64>,
    /// Web session lifetime in seconds (default 7 days).
    pub session_ttl_secs: u64,
    /// TCP port to listen on (default 3100). Env var: `ACCOUNT_PORT`.
    pub account_port: u16,
}

impl AccountConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3100".to_owned()),
            wechat_app_id: std::env::var("WECHAT_APP_ID").expect("WECHAT_APP_ID"),
            wechat_app_secret: std::env::var("WECHAT_APP_SECRET").expect("WECHAT_APP_SECRET"),
            wechat_api_base: std::env::var("WECHAT_API_BASE")
                .unwrap_or_else(|_| "https://api.weixin.qq.com".to_owned()),
            access_token_ttl_secs: std::env::var("ACCESS_TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            refresh_token_ttl_secs: std::env::var("REFRESH_TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
            session_ttl_secs: std::env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(604_800),
            account_port: std::env::var("ACCOUNT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3100),
        }
    }
}
