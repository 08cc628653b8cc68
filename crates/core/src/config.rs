use crate::common::TimeFrame;
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub history: HistoryConfig,
    pub indicators: IndicatorConfig,
    pub signals: SignalConfig,
    pub universe: UniverseConfig,
    pub feed: FeedConfig,
    pub log: LogConfig,
}

/// 扫描编排参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    // 并发工作者数量上限
    pub concurrency: usize,
    // 历史回溯月数
    pub lookback_months: u32,
    pub timeframe: TimeFrame,
    // 只扫描前 N 个标的，None 表示全部
    pub max_symbols: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            lookback_months: 3,
            timeframe: TimeFrame::Day1,
            max_symbols: None,
        }
    }
}

/// 历史数据校验参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    // 可参与计算的最少 K 线根数
    pub min_bars: usize,
    // 缺失字段总数上限 = ratio * K 线根数
    pub max_missing_ratio: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            min_bars: 20,
            max_missing_ratio: 0.1,
        }
    }
}

/// 指标周期参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub sma_short: usize,
    pub sma_long: usize,
    pub volume_period: usize,
    pub trend_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            sma_short: 20,
            sma_long: 50,
            volume_period: 20,
            trend_period: 20,
        }
    }
}

/// 信号规则的阈值与权重
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    // 参与评估的最少 K 线根数
    pub min_bars: usize,
    // 产出机会所需的最低总分
    pub min_score: i32,
    // 超卖区间 [oversold_low, oversold_high]
    pub oversold_low: f64,
    pub oversold_high: f64,
    // 接近超卖区间 (oversold_high, approaching_high]
    pub approaching_high: f64,
    // 成交量 / 均量 超过该倍数视为放量
    pub volume_spike_ratio: f64,
    pub weights: SignalWeights,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_bars: 50,
            min_score: 2,
            oversold_low: 20.0,
            oversold_high: 30.0,
            approaching_high: 40.0,
            volume_spike_ratio: 2.0,
            weights: SignalWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub oversold: i32,
    pub approaching_oversold: i32,
    pub macd_cross: i32,
    pub below_lower_band: i32,
    pub ma_cross: i32,
    pub volume_spike: i32,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            oversold: 3,
            approaching_oversold: 1,
            macd_cross: 2,
            below_lower_band: 2,
            ma_cross: 2,
            volume_spike: 1,
        }
    }
}

/// 标的池来源
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    // 固定种子列表（高流动性标的）
    pub seed_symbols: Vec<String>,
    // 指数成分股页面
    pub constituents_url: String,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        let seeds = [
            "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "TSLA", "JPM", "V", "WMT", "PG", "MA",
            "HD", "BAC", "DIS", "CSCO", "VZ", "KO",
        ];
        Self {
            seed_symbols: seeds.iter().map(|s| s.to_string()).collect(),
            constituents_url: "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    // 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // 默认日志级别，可被 RUST_LOG 覆盖
    pub level: String,
    // 日志文件目录，None 时只输出到 stderr
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "radar.log".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scan.concurrency, 5);
        assert_eq!(config.scan.lookback_months, 3);
        assert_eq!(config.scan.timeframe, TimeFrame::Day1);
        assert_eq!(config.history.min_bars, 20);
        assert_eq!(config.signals.min_bars, 50);
        assert_eq!(config.signals.min_score, 2);
        assert_eq!(config.signals.weights.oversold, 3);
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(config.universe.seed_symbols.len(), 18);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"scan": {"concurrency": 8}, "signals": {"min_score": 3}}"#)
                .unwrap();
        assert_eq!(config.scan.concurrency, 8);
        assert_eq!(config.scan.lookback_months, 3);
        assert_eq!(config.signals.min_score, 3);
        assert_eq!(config.signals.weights.macd_cross, 2);
    }
}
