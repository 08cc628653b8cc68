use crate::common::{Symbol, TimeFrame};
use crate::market::entity::RawCandle;
use crate::market::error::MarketError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// # Summary
/// 历史行情提供者接口（外部数据源）。
///
/// # Invariants
/// - 返回的 K 线可以乱序、可以缺字段，校验由调用方负责。
/// - 任何失败（网络、未知代码、限流）都以 `MarketError` 返回，不得 panic。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取特定证券在指定时间范围内的 K 线数据。
    ///
    /// # Logic
    /// 1. 构建数据源请求。
    /// 2. 执行网络请求并解析响应数据。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `timeframe`: K 线周期。
    /// * `start`: 开始时间。
    /// * `end`: 结束时间。
    ///
    /// # Returns
    /// 成功返回原始 K 线列表。
    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        timeframe: TimeFrame,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawCandle>, MarketError>;
}

/// # Summary
/// 指数成分股列表来源（例如 S&P 500）。
///
/// # Invariants
/// - 返回未经校验的原始代码字符串，规范化由 `UniverseResolver` 负责。
#[async_trait]
pub trait ConstituentSource: Send + Sync {
    /// # Summary
    /// 拉取成分股代码列表。
    ///
    /// # Returns
    /// 成功返回代码列表，失败返回 `MarketError`。
    async fn fetch_symbols(&self) -> Result<Vec<String>, MarketError>;
}
