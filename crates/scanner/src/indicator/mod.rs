pub mod math;

use radar_core::analysis::entity::{IndicatorColumns, IndicatorFrame};
use radar_core::analysis::error::AnalysisError;
use radar_core::config::IndicatorConfig;
use radar_core::market::entity::PriceSeries;
use tracing::debug;

/// # Summary
/// 指标引擎：在收盘价与成交量上计算全部技术指标列。
///
/// # Invariants
/// - 输出要么是完整的指标帧，要么是错误；不返回部分指标集。
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    /// # Summary
    /// 为价格序列附加指标列。
    ///
    /// # Logic
    /// 1. 计算 RSI、MACD 及信号线、布林带上下轨、短/长期 SMA、均量、近期涨跌幅。
    /// 2. 任意一列在整段序列上全为空（回溯期不足）即视为计算失败。
    /// 3. 组装并校验对齐的 `IndicatorFrame`。
    ///
    /// # Arguments
    /// * `series`: 已通过校验的价格序列。
    ///
    /// # Returns
    /// 成功返回 `IndicatorFrame`，失败返回 `AnalysisError::Compute`。
    pub fn augment(&self, series: PriceSeries) -> Result<IndicatorFrame, AnalysisError> {
        let cfg = &self.config;
        let closes = series.closes();
        let volumes = series.volumes();

        let (macd, macd_signal) =
            math::macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal);
        let (bollinger_upper, bollinger_lower) =
            math::bollinger(&closes, cfg.bollinger_period, cfg.bollinger_std_dev);

        let columns = IndicatorColumns {
            rsi: math::rsi(&closes, cfg.rsi_period),
            macd,
            macd_signal,
            bollinger_upper,
            bollinger_lower,
            sma_short: math::sma(&closes, cfg.sma_short),
            sma_long: math::sma(&closes, cfg.sma_long),
            volume_sma: math::sma(&volumes, cfg.volume_period),
            trend: math::percent_change(&closes, cfg.trend_period),
        };

        if let Some((name, _)) = columns
            .named()
            .into_iter()
            .find(|(_, col)| col.iter().all(Option::is_none))
        {
            return Err(AnalysisError::Compute(format!(
                "{} undefined over {} bars",
                name,
                series.len()
            )));
        }

        debug!(bars = series.len(), "Indicators computed");
        IndicatorFrame::new(series, columns)
    }
}
