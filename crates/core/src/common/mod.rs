pub mod symbol;
pub mod time;

pub use symbol::{Symbol, SymbolError};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// K 线周期枚举，决定向行情源请求的数据粒度。
///
/// # Invariants
/// - 扫描默认使用日线 (`Day1`)，指标的周期参数均以"根"为单位。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    // 1小时
    #[serde(alias = "1h", alias = "hour1")]
    Hour1,
    // 1日
    #[default]
    #[serde(alias = "1d", alias = "day1")]
    Day1,
    // 1周
    #[serde(alias = "1wk", alias = "week1")]
    Week1,
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1h" | "hour1" => Ok(TimeFrame::Hour1),
            "1d" | "day1" => Ok(TimeFrame::Day1),
            "1wk" | "week1" => Ok(TimeFrame::Week1),
            _ => Err(format!("Unknown TimeFrame: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeFrame::Hour1 => write!(f, "1h"),
            TimeFrame::Day1 => write!(f, "1d"),
            TimeFrame::Week1 => write!(f, "1wk"),
        }
    }
}
