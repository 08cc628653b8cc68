use crate::indicator::math::len_f64;
use chrono::Months;
use radar_core::analysis::error::AnalysisError;
use radar_core::common::time::TimeProvider;
use radar_core::common::{Symbol, TimeFrame};
use radar_core::config::HistoryConfig;
use radar_core::market::entity::{Candle, PriceSeries};
use radar_core::market::port::MarketDataProvider;
use std::sync::Arc;
use tracing::debug;

/// # Summary
/// 历史数据抓取器：按回溯窗口拉取单个标的的 OHLCV，并做完整性校验。
///
/// # Invariants
/// - 这是失败隔离边界：任何数据源错误都转换为 `AnalysisError::NoData`，不会中断扫描。
pub struct HistoryFetcher {
    // 原始行情数据源
    provider: Arc<dyn MarketDataProvider>,
    // 回溯窗口的终点时钟
    clock: Arc<dyn TimeProvider>,
    timeframe: TimeFrame,
    // 默认回溯月数
    lookback_months: u32,
    config: HistoryConfig,
}

impl HistoryFetcher {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        clock: Arc<dyn TimeProvider>,
        timeframe: TimeFrame,
        lookback_months: u32,
        config: HistoryConfig,
    ) -> Self {
        Self {
            provider,
            clock,
            timeframe,
            lookback_months,
            config,
        }
    }

    /// # Summary
    /// 使用默认回溯窗口抓取历史数据。
    pub async fn fetch(&self, symbol: &Symbol) -> Result<PriceSeries, AnalysisError> {
        self.fetch_window(symbol, self.lookback_months).await
    }

    /// # Summary
    /// 抓取最近 `lookback_months` 个月的历史数据。
    ///
    /// # Logic
    /// 1. 以时钟当前时间为终点，向前回溯指定月数作为起点。
    /// 2. 请求数据源；任何错误都记为无数据。
    /// 3. K 线根数少于 `min_bars` 时无数据。
    /// 4. 缺失字段总数超过 `max_missing_ratio * 根数` 时无数据。
    /// 5. 丢弃有缺失字段的 K 线，剩余根数再次检查下限。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `lookback_months`: 回溯月数。
    ///
    /// # Returns
    /// 成功返回时间有序的 `PriceSeries`，否则返回 `AnalysisError::NoData`。
    pub async fn fetch_window(
        &self,
        symbol: &Symbol,
        lookback_months: u32,
    ) -> Result<PriceSeries, AnalysisError> {
        let end = self.clock.now();
        let start = end
            .checked_sub_months(Months::new(lookback_months))
            .ok_or_else(|| {
                AnalysisError::NoData(format!("invalid lookback of {} months", lookback_months))
            })?;

        let raw = self
            .provider
            .fetch_candles(symbol, self.timeframe, start, end)
            .await
            .map_err(|e| AnalysisError::NoData(e.to_string()))?;

        let min_bars = self.config.min_bars;
        if raw.len() < min_bars {
            return Err(AnalysisError::NoData(format!(
                "{} bars, need at least {}",
                raw.len(),
                min_bars
            )));
        }

        let missing: usize = raw.iter().map(|c| c.missing_fields()).sum();
        let allowed = self.config.max_missing_ratio * len_f64(raw.len());
        if len_f64(missing) > allowed {
            return Err(AnalysisError::NoData(format!(
                "{} missing fields across {} bars",
                missing,
                raw.len()
            )));
        }

        // 残缺 K 线直接剔除，有缺口的序列上指标窗口会跨过缺口
        let candles: Vec<Candle> = raw.iter().filter_map(|c| c.complete()).collect();
        if candles.len() < min_bars {
            return Err(AnalysisError::NoData(format!(
                "{} complete bars, need at least {}",
                candles.len(),
                min_bars
            )));
        }

        debug!(
            bars = candles.len(),
            dropped = raw.len() - candles.len(),
            "History fetched"
        );
        Ok(PriceSeries::new(symbol.clone(), candles))
    }
}
