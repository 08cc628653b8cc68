use crate::http::status_error;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use radar_core::common::{Symbol, TimeFrame};
use radar_core::market::entity::RawCandle;
use radar_core::market::error::MarketError;
use radar_core::market::port::MarketDataProvider;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// # Summary
/// Yahoo Finance 历史行情提供者。
///
/// # Invariants
/// - 只做协议转换：缺失字段原样保留为 `None`，完整性校验交给调用方。
#[derive(Clone)]
pub struct YahooProvider {
    /// 共享的 HTTP 客户端
    client: Client,
}

impl YahooProvider {
    /// # Summary
    /// 使用给定客户端创建提供者。
    ///
    /// # Arguments
    /// * `client`: 由 `http::build_client` 构建的客户端。
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn interval(timeframe: TimeFrame) -> &'static str {
    match timeframe {
        TimeFrame::Hour1 => "60m",
        TimeFrame::Day1 => "1d",
        TimeFrame::Week1 => "1wk",
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
pub(crate) struct YahooResponse {
    chart: YahooChart,
}

#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Deserialize, Debug)]
struct YahooError {
    code: String,
    description: String,
}

/// # Summary
/// Yahoo API 单个时间序列结果。
///
/// 无成交的区间会整体省略 `timestamp`。
#[derive(Deserialize, Debug)]
struct YahooResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// # Summary
/// Yahoo API 原始报价数据，各列与 `timestamp` 按下标对齐。
#[derive(Deserialize, Debug)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

/// # Summary
/// 将 chart 响应转换为原始 K 线。
///
/// # Logic
/// 1. `chart.error` 非空：代码为 "Not Found" 时返回 `NotFound`，否则返回 `Unknown`。
/// 2. 取第一个结果与第一组报价；缺失则为 `NotFound` 或 `Parse`。
/// 3. 按时间戳逐根组装，列缺失或为 null 的字段保留为 `None`。
///
/// # Arguments
/// * `response`: 反序列化后的响应体。
///
/// # Returns
/// 成功返回原始 K 线列表（保持接口返回的顺序）。
pub(crate) fn parse_chart(response: YahooResponse) -> Result<Vec<RawCandle>, MarketError> {
    if let Some(err) = response.chart.error {
        return Err(if err.code.eq_ignore_ascii_case("not found") {
            MarketError::NotFound
        } else {
            MarketError::Unknown(err.description)
        });
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or(MarketError::NotFound)?;
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| MarketError::Parse("No quote data".into()))?;

    result
        .timestamp
        .iter()
        .enumerate()
        .map(|(i, &ts)| {
            let time = Utc
                .timestamp_opt(ts, 0)
                .single()
                .ok_or_else(|| MarketError::Parse(format!("Invalid timestamp: {}", ts)))?;
            Ok(RawCandle {
                time,
                open: column(&quote.open, i),
                high: column(&quote.high, i),
                low: column(&quote.low, i),
                close: column(&quote.close, i),
                volume: column(&quote.volume, i),
            })
        })
        .collect()
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取 K 线历史数据。
    ///
    /// # Logic
    /// 1. 映射 TimeFrame 为 Yahoo 识别的 interval。
    /// 2. 以 period1 / period2 指定时间窗口发起请求。
    /// 3. 404 → `NotFound`，429 → `RateLimited`，其他非 2xx → `Network`。
    /// 4. 解析 JSON 并转换为原始 K 线。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `timeframe`: 周期。
    /// * `start`: 开始时间。
    /// * `end`: 结束时间。
    ///
    /// # Returns
    /// 成功返回原始 K 线列表，失败返回 MarketError。
    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        timeframe: TimeFrame,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawCandle>, MarketError> {
        let url = format!("{}/{}", CHART_BASE_URL, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string().as_str()),
                ("period2", end.timestamp().to_string().as_str()),
                ("interval", interval(timeframe)),
                ("includePrePost", "false"),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        let candles = parse_chart(json)?;
        debug!(symbol = %symbol, bars = candles.len(), "Yahoo chart fetched");
        Ok(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<Vec<RawCandle>, MarketError> {
        parse_chart(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_parse_keeps_null_fields_as_missing() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL"},
                    "timestamp": [1767225600, 1767312000, 1767398400],
                    "indicators": {
                        "quote": [{
                            "open":   [10.0, null, 12.0],
                            "high":   [11.0, 11.5, 12.5],
                            "low":    [9.5, 10.5, 11.5],
                            "close":  [10.5, 11.0, null],
                            "volume": [1000, 1200, 900]
                        }],
                        "adjclose": [{"adjclose": [10.4, 10.9, null]}]
                    }
                }],
                "error": null
            }
        }"#;

        let candles = parse(body).unwrap();
        assert_eq!(candles.len(), 3);
        assert_eq!(candles[0].close, Some(10.5));
        assert_eq!(candles[0].volume, Some(1000.0));
        assert_eq!(candles[1].open, None);
        assert_eq!(candles[1].missing_fields(), 1);
        assert_eq!(candles[2].close, None);
        assert_eq!(candles[0].time, Utc.timestamp_opt(1767225600, 0).unwrap());
    }

    #[test]
    fn test_parse_short_columns_pad_with_missing() {
        let body = r#"{"chart": {"result": [{
            "timestamp": [1767225600, 1767312000],
            "indicators": {"quote": [{"open": [1.0], "high": [1.0], "low": [1.0], "close": [1.0]}]}
        }], "error": null}}"#;

        let candles = parse(body).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].volume, None);
        assert_eq!(candles[1].missing_fields(), 5);
    }

    #[test]
    fn test_parse_chart_error() {
        let not_found = r#"{"chart": {"result": null,
            "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        assert!(matches!(parse(not_found), Err(MarketError::NotFound)));

        let bad_request = r#"{"chart": {"result": null,
            "error": {"code": "Bad Request", "description": "Invalid input - start date cannot be after end date"}}}"#;
        assert!(matches!(
            parse(bad_request),
            Err(MarketError::Unknown(ref d)) if d.starts_with("Invalid input")
        ));
    }

    #[test]
    fn test_parse_empty_range_has_no_candles() {
        let body = r#"{"chart": {"result": [{"indicators": {"quote": [{}]}}], "error": null}}"#;
        assert!(parse(body).unwrap().is_empty());
    }

    #[test]
    fn test_interval_mapping() {
        assert_eq!(interval(TimeFrame::Day1), "1d");
        assert_eq!(interval(TimeFrame::Week1), "1wk");
        assert_eq!(interval(TimeFrame::Hour1), "60m");
    }
}
