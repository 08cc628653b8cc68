use radar_core::market::error::MarketError;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

// 伪装浏览器 UA，Yahoo 与 Wikipedia 都会拦截默认 UA
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// # Summary
/// 创建共享的 HTTP 客户端。
///
/// # Logic
/// 1. 设置请求超时。
/// 2. 设置浏览器 User-Agent 以减少被拦截风险。
///
/// # Arguments
/// * `timeout`: 单次请求超时。
///
/// # Returns
/// 成功返回 `Client`，构建失败返回 `MarketError::Network`。
pub fn build_client(timeout: Duration) -> Result<Client, MarketError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| MarketError::Network(format!("Failed to build HTTP client: {}", e)))
}

/// 将非 2xx 状态码映射为行情错误
pub(crate) fn status_error(status: StatusCode) -> MarketError {
    match status {
        StatusCode::NOT_FOUND => MarketError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => MarketError::RateLimited,
        other => MarketError::Network(format!("HTTP {}", other)),
    }
}
