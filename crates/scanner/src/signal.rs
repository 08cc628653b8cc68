use radar_core::analysis::entity::{BarSnapshot, IndicatorFrame, Opportunity, Signal};
use radar_core::analysis::error::AnalysisError;
use radar_core::config::SignalConfig;
use rust_decimal::Decimal;
use tracing::debug;

pub const OVERSOLD: &str = "RSI en zona de sobreventa";
pub const APPROACHING_OVERSOLD: &str = "RSI aproximándose a sobreventa";
pub const MACD_BULLISH_CROSS: &str = "Cruce MACD alcista";
pub const BELOW_LOWER_BAND: &str = "Precio por debajo de banda inferior de Bollinger";
pub const MA_BULLISH_CROSS: &str = "Cruce alcista de medias móviles";

/// 放量信号的描述，倍数保留一位小数
pub fn volume_spike_description(ratio: f64) -> String {
    format!("Volumen {:.1}x sobre la media", ratio)
}

/// # Summary
/// 判断 a 是否在本根上穿 b：`curr_a > curr_b` 且 `prev_a <= prev_b`。
///
/// 任一输入未定义时不触发。
fn crossed_above(
    prev_a: Option<f64>,
    prev_b: Option<f64>,
    curr_a: Option<f64>,
    curr_b: Option<f64>,
) -> bool {
    match (prev_a, prev_b, curr_a, curr_b) {
        (Some(pa), Some(pb), Some(ca), Some(cb)) => ca > cb && pa <= pb,
        _ => false,
    }
}

fn to_decimal(name: &str, value: Option<f64>) -> Result<Decimal, AnalysisError> {
    value
        .and_then(Decimal::from_f64_retain)
        .ok_or_else(|| AnalysisError::Compute(format!("{} is undefined", name)))
}

/// 单次评估的中间结果
struct Assessment {
    signals: Vec<Signal>,
    current: BarSnapshot,
    volume_ratio: f64,
}

/// # Summary
/// 信号评估器：对最近两根 K 线应用计分规则。
///
/// # Invariants
/// - 只读取最新一根与前一根的快照。
/// - 各规则独立叠加计分；RSI 的两个区间互斥，只取第一个命中的区间。
pub struct SignalEvaluator {
    config: SignalConfig,
}

impl SignalEvaluator {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// # Summary
    /// 评估指标帧，达到阈值时产出机会。
    ///
    /// # Logic
    /// 1. 检测全部信号并计算总分。
    /// 2. 至少一条信号且总分不低于 `min_score` 时生成 `Opportunity`。
    /// 3. 机会中的价格、RSI、量比、涨跌幅必须有定义，否则视为计算失败。
    ///
    /// # Arguments
    /// * `frame`: 单个标的的指标帧。
    ///
    /// # Returns
    /// * `Ok(Some(_))` - 产出机会。
    /// * `Ok(None)` - 未达到阈值。
    /// * `Err(_)` - 数据不足或计算失败。
    pub fn evaluate(&self, frame: &IndicatorFrame) -> Result<Option<Opportunity>, AnalysisError> {
        let Assessment {
            signals,
            current,
            volume_ratio,
        } = self.assess(frame)?;

        let score: i32 = signals.iter().map(|s| s.weight).sum();
        debug!(score, signals = signals.len(), "Signals evaluated");
        if signals.is_empty() || score < self.config.min_score {
            return Ok(None);
        }

        Ok(Some(Opportunity {
            symbol: frame.symbol().clone(),
            signals,
            score,
            current_price: to_decimal("current_price", Some(current.close))?,
            rsi: to_decimal("rsi", current.rsi)?,
            volume_ratio: to_decimal("volume_ratio", Some(volume_ratio))?,
            trend_20d: to_decimal("trend_20d", current.trend)?,
        }))
    }

    /// # Summary
    /// 仅返回触发的信号列表（不应用分数阈值）。
    pub fn signals(&self, frame: &IndicatorFrame) -> Result<Vec<Signal>, AnalysisError> {
        self.assess(frame).map(|a| a.signals)
    }

    /// # Summary
    /// 对最近两根快照逐条应用规则。
    ///
    /// # Logic
    /// 1. 根数不足 `min_bars` 视为无数据。
    /// 2. 计算量比；均量未定义、为 0 或结果非有限视为计算失败。
    /// 3. 依次检查 RSI 区间、MACD 金叉、跌破布林下轨、均线金叉、放量。
    fn assess(&self, frame: &IndicatorFrame) -> Result<Assessment, AnalysisError> {
        let cfg = &self.config;
        if frame.len() < cfg.min_bars {
            return Err(AnalysisError::NoData(format!(
                "{} bars, need at least {} to evaluate",
                frame.len(),
                cfg.min_bars
            )));
        }
        let [prev, curr] = frame
            .latest::<2>()
            .ok_or_else(|| AnalysisError::NoData("fewer than two bars".into()))?;

        let volume_avg = curr
            .volume_sma
            .ok_or_else(|| AnalysisError::Compute("volume average is undefined".into()))?;
        if volume_avg == 0.0 {
            return Err(AnalysisError::Compute("volume average is zero".into()));
        }
        let volume_ratio = curr.volume / volume_avg;
        if !volume_ratio.is_finite() {
            return Err(AnalysisError::Compute(format!(
                "volume ratio is not finite: {}",
                volume_ratio
            )));
        }

        let weights = &cfg.weights;
        let mut signals = Vec::new();

        if let Some(rsi) = curr.rsi {
            if (cfg.oversold_low..=cfg.oversold_high).contains(&rsi) {
                signals.push(Signal::new(OVERSOLD, weights.oversold));
            } else if rsi > cfg.oversold_high && rsi <= cfg.approaching_high {
                signals.push(Signal::new(APPROACHING_OVERSOLD, weights.approaching_oversold));
            }
        }

        if crossed_above(prev.macd, prev.macd_signal, curr.macd, curr.macd_signal) {
            signals.push(Signal::new(MACD_BULLISH_CROSS, weights.macd_cross));
        }

        if curr.bollinger_lower.is_some_and(|lower| curr.close < lower) {
            signals.push(Signal::new(BELOW_LOWER_BAND, weights.below_lower_band));
        }

        if crossed_above(prev.sma_short, prev.sma_long, curr.sma_short, curr.sma_long) {
            signals.push(Signal::new(MA_BULLISH_CROSS, weights.ma_cross));
        }

        if volume_ratio > cfg.volume_spike_ratio {
            signals.push(Signal::new(
                volume_spike_description(volume_ratio),
                weights.volume_spike,
            ));
        }

        Ok(Assessment {
            signals,
            current: curr,
            volume_ratio,
        })
    }
}
