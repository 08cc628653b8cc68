use chrono::{TimeZone, Utc};
use radar_core::analysis::error::AnalysisError;
use radar_core::common::time::FixedClock;
use radar_core::common::{Symbol, TimeFrame};
use radar_core::config::HistoryConfig;
use radar_core::test_utils::{StaticMarketData, raw_candles};
use radar_scanner::history::HistoryFetcher;
use std::sync::Arc;

fn sym(s: &str) -> Symbol {
    Symbol::normalize(s).unwrap()
}

fn fetcher(provider: Arc<StaticMarketData>) -> HistoryFetcher {
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 4, 15, 21, 0, 0).unwrap());
    HistoryFetcher::new(
        provider,
        Arc::new(clock),
        TimeFrame::Day1,
        3,
        HistoryConfig::default(),
    )
}

/// # Summary
/// 回溯窗口以时钟为终点，向前推 3 个月。
#[tokio::test]
async fn test_fetch_requests_lookback_window() -> anyhow::Result<()> {
    let aapl = sym("AAPL");
    let provider = Arc::new(
        StaticMarketData::new().with_candles(&aapl, raw_candles(&[10.0; 30], &[1000.0; 30])),
    );
    let series = fetcher(provider.clone()).fetch(&aapl).await?;

    assert_eq!(series.len(), 30);
    assert_eq!(series.symbol(), &aapl);
    let (start, end) = provider.last_request(&aapl).unwrap();
    assert_eq!(end, Utc.with_ymd_and_hms(2026, 4, 15, 21, 0, 0).unwrap());
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 1, 15, 21, 0, 0).unwrap());
    Ok(())
}

#[tokio::test]
async fn test_fetch_window_overrides_lookback() -> anyhow::Result<()> {
    let aapl = sym("AAPL");
    let provider = Arc::new(
        StaticMarketData::new().with_candles(&aapl, raw_candles(&[10.0; 30], &[1000.0; 30])),
    );
    fetcher(provider.clone()).fetch_window(&aapl, 6).await?;

    let (start, _) = provider.last_request(&aapl).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2025, 10, 15, 21, 0, 0).unwrap());
    Ok(())
}

/// # Summary
/// 数据源报错或查无此代码都转换为无数据，不向上传播。
#[tokio::test]
async fn test_provider_errors_become_no_data() {
    let bad = sym("BAD");
    let provider = Arc::new(StaticMarketData::new().with_failure(&bad, "connection reset"));
    let fetcher = fetcher(provider);

    let err = fetcher.fetch(&bad).await.unwrap_err();
    assert!(matches!(err, AnalysisError::NoData(ref reason) if reason.contains("connection reset")));

    let err = fetcher.fetch(&sym("NOPE")).await.unwrap_err();
    assert!(matches!(err, AnalysisError::NoData(_)));
}

#[tokio::test]
async fn test_short_history_is_no_data() {
    let short = sym("SHRT");
    let provider = Arc::new(
        StaticMarketData::new().with_candles(&short, raw_candles(&[10.0; 15], &[1000.0; 15])),
    );

    let err = fetcher(provider).fetch(&short).await.unwrap_err();
    assert!(matches!(err, AnalysisError::NoData(_)));
}

/// # Summary
/// 缺失字段的容忍度为根数的 10%，超过则拒绝，未超过则丢弃残缺 K 线。
///
/// # Logic
/// 1. 30 根 K 线中 3 根缺收盘价：恰好等于上限，接受并丢弃这 3 根。
/// 2. 30 根 K 线中 4 根缺收盘价：超过上限，无数据。
#[tokio::test]
async fn test_missing_field_tolerance() -> anyhow::Result<()> {
    let ok = sym("OK");
    let holes = sym("HOLES");

    let mut tolerable = raw_candles(&[10.0; 30], &[1000.0; 30]);
    for c in tolerable.iter_mut().take(3) {
        c.close = None;
    }
    let mut too_sparse = raw_candles(&[10.0; 30], &[1000.0; 30]);
    for c in too_sparse.iter_mut().take(4) {
        c.close = None;
    }

    let provider = Arc::new(
        StaticMarketData::new()
            .with_candles(&ok, tolerable)
            .with_candles(&holes, too_sparse),
    );
    let fetcher = fetcher(provider);

    let series = fetcher.fetch(&ok).await?;
    assert_eq!(series.len(), 27);

    let err = fetcher.fetch(&holes).await.unwrap_err();
    assert!(matches!(err, AnalysisError::NoData(_)));
    Ok(())
}

/// # Summary
/// 中间缺一根收盘价：该根被剔除，前后两根在序列中直接相邻。
#[tokio::test]
async fn test_incomplete_bar_is_dropped_without_filling() -> anyhow::Result<()> {
    let gap = sym("GAP");
    let mut raw = raw_candles(&[10.0; 30], &[1000.0; 30]);
    raw[10].close = None;
    let before = raw[9].time;
    let after = raw[11].time;

    let provider = Arc::new(StaticMarketData::new().with_candles(&gap, raw));
    let series = fetcher(provider).fetch(&gap).await?;

    assert_eq!(series.len(), 29);
    assert_eq!(series.candles()[9].time, before);
    assert_eq!(series.candles()[10].time, after);
    Ok(())
}
