use crate::common::Symbol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 行情源返回的原始 K 线，任何字段都可能缺失。
///
/// # Invariants
/// - 仅 `time` 保证存在；OHLCV 缺失以 `None` 表示，由 `HistoryFetcher` 统计缺失率。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandle {
    // K 线开始时间
    pub time: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawCandle {
    /// # Summary
    /// 统计缺失的必填字段数量。
    pub fn missing_fields(&self) -> usize {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .filter(|v| v.is_none())
            .count()
    }

    /// # Summary
    /// 若 OHLCV 齐全则转换为完整的 `Candle`。
    pub fn complete(&self) -> Option<Candle> {
        Some(Candle {
            time: self.time,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close: self.close?,
            volume: self.volume?,
        })
    }
}

/// # Summary
/// 单根完整 K 线。
///
/// # Invariants
/// - 所有 OHLCV 字段均已存在。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    // K 线开始时间
    pub time: DateTime<Utc>,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: f64,
}

/// # Summary
/// 单个标的在一次扫描中的价格序列。
///
/// # Invariants
/// - `candles` 按时间升序排列（构造时强制排序）。
/// - 由一次扫描中的一个标的独占，之后只被指标引擎读取。
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: Symbol,
    candles: Vec<Candle>,
}

impl PriceSeries {
    /// # Summary
    /// 构造价格序列。
    ///
    /// # Logic
    /// 1. 按 `time` 稳定排序，保证时间升序。
    ///
    /// # Arguments
    /// * `symbol`: 所属标的。
    /// * `candles`: 完整 K 线列表，顺序不限。
    ///
    /// # Returns
    /// 时间有序的 `PriceSeries`。
    pub fn new(symbol: Symbol, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.time);
        Self { symbol, candles }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 收盘价列
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// 成交量列
    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candle(day: u32, close: f64) -> Candle {
        Candle {
            time: Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn test_series_is_sorted_on_construction() {
        let symbol = Symbol::normalize("AAPL").unwrap();
        let series = PriceSeries::new(symbol, vec![candle(3, 3.0), candle(1, 1.0), candle(2, 2.0)]);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_raw_candle_missing_fields() {
        let raw = RawCandle {
            time: Utc::now(),
            open: Some(1.0),
            high: None,
            low: Some(1.0),
            close: None,
            volume: Some(10.0),
        };
        assert_eq!(raw.missing_fields(), 2);
        assert!(raw.complete().is_none());
    }
}
