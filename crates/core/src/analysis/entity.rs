use crate::analysis::error::AnalysisError;
use crate::common::Symbol;
use crate::market::entity::PriceSeries;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// # Summary
/// 指标列集合，每一列与价格序列逐根对齐。
///
/// # Invariants
/// - 每列长度等于源序列长度；回溯期不足的早期位置为 `None`。
#[derive(Debug, Clone, Default)]
pub struct IndicatorColumns {
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub bollinger_upper: Vec<Option<f64>>,
    pub bollinger_lower: Vec<Option<f64>>,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub volume_sma: Vec<Option<f64>>,
    // 近 N 根涨跌幅，百分比
    pub trend: Vec<Option<f64>>,
}

impl IndicatorColumns {
    /// 以 (列名, 列数据) 形式列出所有指标列
    pub fn named(&self) -> [(&'static str, &[Option<f64>]); 9] {
        [
            ("rsi", self.rsi.as_slice()),
            ("macd", self.macd.as_slice()),
            ("macd_signal", self.macd_signal.as_slice()),
            ("bollinger_upper", self.bollinger_upper.as_slice()),
            ("bollinger_lower", self.bollinger_lower.as_slice()),
            ("sma_short", self.sma_short.as_slice()),
            ("sma_long", self.sma_long.as_slice()),
            ("volume_sma", self.volume_sma.as_slice()),
            ("trend", self.trend.as_slice()),
        ]
    }
}

/// # Summary
/// 附加了技术指标列的价格序列。
///
/// # Invariants
/// - 指标列与 `series` 逐根对齐（构造时校验）。
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    series: PriceSeries,
    columns: IndicatorColumns,
}

impl IndicatorFrame {
    /// # Summary
    /// 组装指标帧。
    ///
    /// # Logic
    /// 1. 校验每一列的长度与源序列一致。
    ///
    /// # Arguments
    /// * `series`: 源价格序列。
    /// * `columns`: 已计算好的指标列。
    ///
    /// # Returns
    /// 对齐则返回 `IndicatorFrame`，否则返回 `AnalysisError::Compute`。
    pub fn new(series: PriceSeries, columns: IndicatorColumns) -> Result<Self, AnalysisError> {
        let expected = series.len();
        if let Some((name, col)) = columns
            .named()
            .into_iter()
            .find(|(_, col)| col.len() != expected)
        {
            return Err(AnalysisError::Compute(format!(
                "column {} has {} rows, series has {}",
                name,
                col.len(),
                expected
            )));
        }
        Ok(Self { series, columns })
    }

    pub fn symbol(&self) -> &Symbol {
        self.series.symbol()
    }

    pub fn columns(&self) -> &IndicatorColumns {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// # Summary
    /// 读取第 `index` 根 K 线的对齐快照。
    pub fn snapshot(&self, index: usize) -> Option<BarSnapshot> {
        let candle = self.series.candles().get(index)?;
        let c = &self.columns;
        Some(BarSnapshot {
            time: candle.time,
            close: candle.close,
            volume: candle.volume,
            rsi: c.rsi[index],
            macd: c.macd[index],
            macd_signal: c.macd_signal[index],
            bollinger_upper: c.bollinger_upper[index],
            bollinger_lower: c.bollinger_lower[index],
            sma_short: c.sma_short[index],
            sma_long: c.sma_long[index],
            volume_sma: c.volume_sma[index],
            trend: c.trend[index],
        })
    }

    /// # Summary
    /// 取最近 `N` 根 K 线的快照，按时间升序（最后一个元素为最新一根）。
    ///
    /// # Returns
    /// 序列长度不足 `N` 时返回 `None`。
    pub fn latest<const N: usize>(&self) -> Option<[BarSnapshot; N]> {
        let start = self.len().checked_sub(N)?;
        let snapshots: Vec<BarSnapshot> = (start..self.len())
            .filter_map(|i| self.snapshot(i))
            .collect();
        snapshots.try_into().ok()
    }
}

/// # Summary
/// 单根 K 线在某一时刻的全部数值。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSnapshot {
    pub time: DateTime<Utc>,
    pub close: f64,
    pub volume: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub volume_sma: Option<f64>,
    pub trend: Option<f64>,
}

/// # Summary
/// 一条被触发的信号：可读描述 + 计分权重。
///
/// # Invariants
/// - 信号可叠加，一个标的可以同时触发多条。
/// - 序列化时只输出描述文本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Signal {
    pub description: String,
    pub weight: i32,
}

impl Signal {
    pub fn new(description: impl Into<String>, weight: i32) -> Self {
        Self {
            description: description.into(),
            weight,
        }
    }
}

impl From<Signal> for String {
    fn from(signal: Signal) -> Self {
        signal.description
    }
}

/// # Summary
/// 扫描产出的机会记录。
///
/// # Invariants
/// - 只有在至少触发一条信号且 `score` 达到最低阈值时才会生成。
/// - 生成后不可变；`score` 等于 `signals` 权重之和。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub symbol: Symbol,
    pub signals: Vec<Signal>,
    pub score: i32,
    pub current_price: Decimal,
    pub rsi: Decimal,
    pub volume_ratio: Decimal,
    pub trend_20d: Decimal,
}

impl Opportunity {
    /// 判断是否包含某条描述的信号
    pub fn has_signal(&self, description: &str) -> bool {
        self.signals.iter().any(|s| s.description == description)
    }
}
