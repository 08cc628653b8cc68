//! 测试辅助：内存行情源、固定成分股来源与合成价格序列。

use crate::common::{Symbol, TimeFrame};
use crate::market::entity::{Candle, PriceSeries, RawCandle};
use crate::market::error::MarketError;
use crate::market::port::{ConstituentSource, MarketDataProvider};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// 合成序列的首根 K 线时间 (2026-01-01)
fn base_time() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + Duration::days(20_454)
}

/// # Summary
/// 按收盘价与成交量生成逐日的原始 K 线，OHLC 均取收盘价。
pub fn raw_candles(closes: &[f64], volumes: &[f64]) -> Vec<RawCandle> {
    candles(closes, volumes)
        .into_iter()
        .map(|c| RawCandle {
            time: c.time,
            open: Some(c.open),
            high: Some(c.high),
            low: Some(c.low),
            close: Some(c.close),
            volume: Some(c.volume),
        })
        .collect()
}

/// # Summary
/// 按收盘价与成交量生成逐日的完整 K 线。
pub fn candles(closes: &[f64], volumes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .zip(volumes)
        .zip(0i64..)
        .map(|((&close, &volume), day)| Candle {
            time: base_time() + Duration::days(day),
            open: close,
            high: close,
            low: close,
            close,
            volume,
        })
        .collect()
}

/// # Summary
/// 直接构造价格序列。
pub fn price_series(symbol: &Symbol, closes: &[f64], volumes: &[f64]) -> PriceSeries {
    PriceSeries::new(symbol.clone(), candles(closes, volumes))
}

/// # Summary
/// 匀速下跌 `decline_bars` 根（每根 -0.5），最后一根向上跳空到 `jump_to`。
///
/// 下跌段中 MACD 单调走低、始终位于信号线之下；跳空使 MACD 在最后一根上穿信号线。
pub fn decline_then_jump(decline_bars: usize, jump_to: f64) -> Vec<f64> {
    let mut closes: Vec<f64> = (0..decline_bars)
        .scan(100.0_f64, |price, _| {
            let current = *price;
            *price -= 0.5;
            Some(current)
        })
        .collect();
    closes.push(jump_to);
    closes
}

/// # Summary
/// 内存行情源：按代码预置 K 线或失败原因，并记录最近一次请求的时间窗口。
#[derive(Default)]
pub struct StaticMarketData {
    candles: DashMap<Symbol, Vec<RawCandle>>,
    failures: DashMap<Symbol, String>,
    requests: DashMap<Symbol, (DateTime<Utc>, DateTime<Utc>)>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置某代码返回的 K 线
    pub fn with_candles(self, symbol: &Symbol, candles: Vec<RawCandle>) -> Self {
        self.candles.insert(symbol.clone(), candles);
        self
    }

    /// 预置某代码请求失败
    pub fn with_failure(self, symbol: &Symbol, reason: &str) -> Self {
        self.failures.insert(symbol.clone(), reason.to_string());
        self
    }

    /// 最近一次请求的 (start, end)
    pub fn last_request(&self, symbol: &Symbol) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.requests.get(symbol).map(|r| *r.value())
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketData {
    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        _timeframe: TimeFrame,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawCandle>, MarketError> {
        self.requests.insert(symbol.clone(), (start, end));

        if let Some(reason) = self.failures.get(symbol) {
            return Err(MarketError::Network(reason.value().clone()));
        }
        self.candles
            .get(symbol)
            .map(|c| c.value().clone())
            .ok_or(MarketError::NotFound)
    }
}

/// # Summary
/// 固定成分股来源，可预置为失败。
pub struct StaticConstituents {
    result: Result<Vec<String>, String>,
}

impl StaticConstituents {
    pub fn new(symbols: &[&str]) -> Self {
        Self {
            result: Ok(symbols.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
        }
    }
}

#[async_trait]
impl ConstituentSource for StaticConstituents {
    async fn fetch_symbols(&self) -> Result<Vec<String>, MarketError> {
        self.result.clone().map_err(MarketError::Network)
    }
}
